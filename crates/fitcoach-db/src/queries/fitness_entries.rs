//! Database query functions for the `fitness_entries` history table.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::FitnessEntry;

/// Parameters for recording one history entry.
#[derive(Debug, Clone)]
pub struct NewFitnessEntry<'a> {
    pub user_id: Uuid,
    pub performed_on: NaiveDate,
    pub exercise_name: &'a str,
    pub weight: f64,
    pub sets: i32,
    pub reps: i32,
}

/// Record one history entry.
pub async fn insert_fitness_entry<'e, E>(executor: E, new: &NewFitnessEntry<'_>) -> Result<FitnessEntry>
where
    E: PgExecutor<'e>,
{
    let entry = sqlx::query_as::<_, FitnessEntry>(
        "INSERT INTO fitness_entries (user_id, performed_on, exercise_name, weight, sets, reps) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(new.performed_on)
    .bind(new.exercise_name)
    .bind(new.weight)
    .bind(new.sets)
    .bind(new.reps)
    .fetch_one(executor)
    .await
    .with_context(|| {
        format!(
            "failed to record {:?} for user {}",
            new.exercise_name, new.user_id
        )
    })?;

    Ok(entry)
}

/// List a user's history for one exercise, oldest first.
pub async fn list_entries_for_exercise(
    pool: &PgPool,
    user_id: Uuid,
    exercise_name: &str,
) -> Result<Vec<FitnessEntry>> {
    let entries = sqlx::query_as::<_, FitnessEntry>(
        "SELECT * FROM fitness_entries \
         WHERE user_id = $1 AND exercise_name = $2 \
         ORDER BY performed_on, recorded_at, id",
    )
    .bind(user_id)
    .bind(exercise_name)
    .fetch_all(pool)
    .await
    .with_context(|| format!("failed to list history for {exercise_name:?}"))?;

    Ok(entries)
}

/// Count all history entries for a user.
pub async fn count_entries_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM fitness_entries WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .context("failed to count fitness entries")?;

    Ok(count)
}
