//! Database query functions for the `workout_plans` table.
//!
//! Plans are append-only: every generation inserts a new row and the newest
//! row is the user's current plan.

use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::WorkoutPlanRecord;

/// Store a generated plan for a user.
pub async fn insert_workout_plan<'e, E>(
    executor: E,
    user_id: Uuid,
    days: i32,
    plan: &serde_json::Value,
) -> Result<WorkoutPlanRecord>
where
    E: PgExecutor<'e>,
{
    let record = sqlx::query_as::<_, WorkoutPlanRecord>(
        "INSERT INTO workout_plans (user_id, days, plan) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(user_id)
    .bind(days)
    .bind(plan)
    .fetch_one(executor)
    .await
    .with_context(|| format!("failed to insert workout plan for user {user_id}"))?;

    Ok(record)
}

/// List every stored plan for a user, newest first.
pub async fn list_plans_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<WorkoutPlanRecord>> {
    let plans = sqlx::query_as::<_, WorkoutPlanRecord>(
        "SELECT * FROM workout_plans WHERE user_id = $1 ORDER BY created_at DESC, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("failed to list workout plans")?;

    Ok(plans)
}

/// Fetch the most recently stored plan for a user.
pub async fn latest_plan_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<WorkoutPlanRecord>> {
    let plan = sqlx::query_as::<_, WorkoutPlanRecord>(
        "SELECT * FROM workout_plans WHERE user_id = $1 \
         ORDER BY created_at DESC, id LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("failed to fetch latest workout plan")?;

    Ok(plan)
}
