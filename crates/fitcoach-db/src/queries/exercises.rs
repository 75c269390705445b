//! Database query functions for the `exercises` catalog.

use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{BodyRegion, Exercise};

/// Parameters for inserting a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub name: String,
    pub region: BodyRegion,
    pub sets: i32,
    pub reps: i32,
    pub equipment: Option<String>,
}

/// Insert a catalog entry. A duplicate (name, region) pair is rejected.
pub async fn insert_exercise(pool: &PgPool, new: &NewExercise) -> Result<Exercise> {
    let exercise = sqlx::query_as::<_, Exercise>(
        "INSERT INTO exercises (name, region, sets, reps, equipment) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(&new.name)
    .bind(new.region)
    .bind(new.sets)
    .bind(new.reps)
    .bind(&new.equipment)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to insert exercise {:?}", new.name))?;

    Ok(exercise)
}

/// Insert a catalog entry, or refresh the defaults of the existing entry
/// with the same (name, region).
pub async fn upsert_exercise<'e, E>(executor: E, new: &NewExercise) -> Result<Exercise>
where
    E: PgExecutor<'e>,
{
    let exercise = sqlx::query_as::<_, Exercise>(
        "INSERT INTO exercises (name, region, sets, reps, equipment) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (name, region) DO UPDATE \
         SET sets = EXCLUDED.sets, reps = EXCLUDED.reps, equipment = EXCLUDED.equipment \
         RETURNING *",
    )
    .bind(&new.name)
    .bind(new.region)
    .bind(new.sets)
    .bind(new.reps)
    .bind(&new.equipment)
    .fetch_one(executor)
    .await
    .with_context(|| format!("failed to upsert exercise {:?}", new.name))?;

    Ok(exercise)
}

/// Fetch a catalog entry by ID.
pub async fn get_exercise(pool: &PgPool, id: Uuid) -> Result<Option<Exercise>> {
    let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch exercise")?;

    Ok(exercise)
}

/// Snapshot the whole catalog, ordered by region then name.
pub async fn list_exercises(pool: &PgPool) -> Result<Vec<Exercise>> {
    let exercises =
        sqlx::query_as::<_, Exercise>("SELECT * FROM exercises ORDER BY region, name")
            .fetch_all(pool)
            .await
            .context("failed to list exercises")?;

    Ok(exercises)
}

/// List catalog entries for one region, ordered by name.
pub async fn list_exercises_for_region(
    pool: &PgPool,
    region: BodyRegion,
) -> Result<Vec<Exercise>> {
    let exercises = sqlx::query_as::<_, Exercise>(
        "SELECT * FROM exercises WHERE region = $1 ORDER BY name",
    )
    .bind(region)
    .fetch_all(pool)
    .await
    .with_context(|| format!("failed to list exercises for region {region}"))?;

    Ok(exercises)
}
