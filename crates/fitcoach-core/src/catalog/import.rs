//! Catalog TOML parser with validation.
//!
//! ```toml
//! [[exercises]]
//! name = "Back Squat"
//! region = "legs"
//! sets = 4
//! reps = 8
//! equipment = "Barbell"   # optional
//! ```

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use fitcoach_db::models::BodyRegion;
use fitcoach_db::queries::exercises::NewExercise;

/// Errors that can occur while parsing a catalog file.
#[derive(Debug, Error)]
pub enum CatalogParseError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("catalog must contain at least one exercise")]
    Empty,

    #[error("exercise #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("invalid region {value:?} on exercise {exercise:?} (expected one of chest, shoulders, biceps, forearms, triceps, back, legs)")]
    InvalidRegion { exercise: String, value: String },

    #[error("exercise {exercise:?} must have positive sets and reps (got {sets}x{reps})")]
    NonPositiveVolume {
        exercise: String,
        sets: i32,
        reps: i32,
    },

    #[error("duplicate exercise {name:?} in region {region}")]
    Duplicate { name: String, region: BodyRegion },
}

#[derive(Debug, Deserialize)]
struct CatalogToml {
    #[serde(default)]
    exercises: Vec<ExerciseToml>,
}

#[derive(Debug, Deserialize)]
struct ExerciseToml {
    name: String,
    region: String,
    sets: i32,
    reps: i32,
    equipment: Option<String>,
}

/// Parse and validate a catalog TOML document.
pub fn parse_catalog_toml(content: &str) -> Result<Vec<NewExercise>, CatalogParseError> {
    let doc: CatalogToml = toml::from_str(content)?;
    if doc.exercises.is_empty() {
        return Err(CatalogParseError::Empty);
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(doc.exercises.len());

    for (index, raw) in doc.exercises.into_iter().enumerate() {
        let name = raw.name.trim().to_owned();
        if name.is_empty() {
            return Err(CatalogParseError::EmptyName { index: index + 1 });
        }

        let region = raw
            .region
            .parse::<BodyRegion>()
            .map_err(|_| CatalogParseError::InvalidRegion {
                exercise: name.clone(),
                value: raw.region.clone(),
            })?;

        if raw.sets <= 0 || raw.reps <= 0 {
            return Err(CatalogParseError::NonPositiveVolume {
                exercise: name,
                sets: raw.sets,
                reps: raw.reps,
            });
        }

        // Same key as the (name, region) unique index: case-sensitive.
        if !seen.insert((name.clone(), region)) {
            return Err(CatalogParseError::Duplicate { name, region });
        }

        let equipment = raw
            .equipment
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());

        entries.push(NewExercise {
            name,
            region,
            sets: raw.sets,
            reps: raw.reps,
            equipment,
        });
    }

    Ok(entries)
}
