//! Query functions, one module per table.

pub mod coaches;
pub mod exercises;
pub mod fitness_entries;
pub mod users;
pub mod workout_plans;

/// True when `err` wraps a PostgreSQL unique-constraint violation (23505).
///
/// Query functions attach context with `anyhow`, so the `sqlx::Error` is
/// found by downcasting through the context layers.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}
