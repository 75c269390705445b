//! Exercise catalog: the read-only templates a plan is drawn from.
//!
//! The generator works on [`ExerciseTemplate`] snapshots rather than database
//! rows. Catalogs are loaded into the database from TOML, either a user file
//! (`fitcoach exercise import`) or the built-in library embedded from
//! `exercises.toml`.

mod import;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use fitcoach_db::models::{BodyRegion, Exercise};
use fitcoach_db::queries::exercises::{self as exercise_queries, NewExercise};

pub use import::{CatalogParseError, parse_catalog_toml};

/// Equipment label used when a catalog entry records none.
pub const NO_EQUIPMENT: &str = "None";

/// An immutable catalog entry as seen by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseTemplate {
    pub region: BodyRegion,
    pub name: String,
    /// Base set count (positive).
    pub sets: i32,
    /// Base rep count (positive).
    pub reps: i32,
    pub equipment: Option<String>,
}

impl ExerciseTemplate {
    pub fn new(region: BodyRegion, name: impl Into<String>, sets: i32, reps: i32) -> Self {
        Self {
            region,
            name: name.into(),
            sets,
            reps,
            equipment: None,
        }
    }

    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.equipment = Some(equipment.into());
        self
    }

    /// Equipment label, [`NO_EQUIPMENT`] when absent or blank.
    pub fn equipment_label(&self) -> &str {
        match self.equipment.as_deref().map(str::trim) {
            Some(e) if !e.is_empty() => e,
            _ => NO_EQUIPMENT,
        }
    }
}

impl From<Exercise> for ExerciseTemplate {
    fn from(e: Exercise) -> Self {
        Self {
            region: e.region,
            name: e.name,
            sets: e.sets,
            reps: e.reps,
            equipment: e.equipment,
        }
    }
}

impl From<&NewExercise> for ExerciseTemplate {
    fn from(e: &NewExercise) -> Self {
        Self {
            region: e.region,
            name: e.name.clone(),
            sets: e.sets,
            reps: e.reps,
            equipment: e.equipment.clone(),
        }
    }
}

/// The embedded default catalog TOML.
static DEFAULT_CATALOG_TOML: &str = include_str!("exercises.toml");

/// Parse the built-in exercise library.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. It is covered by a unit test,
/// so a released binary always carries a valid library.
pub fn default_catalog() -> Vec<NewExercise> {
    parse_catalog_toml(DEFAULT_CATALOG_TOML).expect("embedded exercises.toml is invalid")
}

/// Snapshot the stored catalog for one generation call.
pub async fn load_catalog(pool: &PgPool) -> Result<Vec<ExerciseTemplate>> {
    let rows = exercise_queries::list_exercises(pool).await?;
    Ok(rows.into_iter().map(ExerciseTemplate::from).collect())
}

/// Insert or refresh every entry inside one transaction.
///
/// Entries are keyed by (name, region); re-importing a catalog updates
/// defaults in place. Returns the number of entries written.
pub async fn import_catalog(pool: &PgPool, entries: &[NewExercise]) -> Result<usize> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    for entry in entries {
        exercise_queries::upsert_exercise(&mut *tx, entry).await?;
    }

    tx.commit().await.context("failed to commit catalog import")?;

    info!(exercises = entries.len(), "catalog imported");
    Ok(entries.len())
}
