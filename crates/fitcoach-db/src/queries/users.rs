//! Database query functions for the `users` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{FitnessLevel, User};

/// Parameters for inserting a new user row.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub password: &'a str,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    pub fitness_level: FitnessLevel,
    pub daily_calories: Option<i32>,
    pub goal: Option<&'a str>,
}

/// Measurements written by a profile update.
#[derive(Debug, Clone, Copy)]
pub struct Measurements {
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
}

/// Insert a new user. Names are unique; a duplicate is rejected by the
/// UNIQUE constraint and surfaces as an error.
pub async fn insert_user(pool: &PgPool, new: &NewUser<'_>) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, password, age, weight, height, bmi, fitness_level, \
         daily_calories, goal) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING *",
    )
    .bind(new.name)
    .bind(new.password)
    .bind(new.age)
    .bind(new.weight)
    .bind(new.height)
    .bind(new.bmi)
    .bind(new.fitness_level)
    .bind(new.daily_calories)
    .bind(new.goal)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to insert user {:?}", new.name))?;

    Ok(user)
}

/// Fetch a user by ID.
pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user")?;

    Ok(user)
}

/// Fetch a user by unique name.
pub async fn get_user_by_name(pool: &PgPool, name: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("failed to fetch user by name {name:?}"))?;

    Ok(user)
}

/// Fetch the user whose name and password both match.
///
/// Passwords are compared as stored.
pub async fn find_user_by_credentials(
    pool: &PgPool,
    name: &str,
    password: &str,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE name = $1 AND password = $2")
        .bind(name)
        .bind(password)
        .fetch_optional(pool)
        .await
        .context("failed to look up user credentials")?;

    Ok(user)
}

/// List all users, ordered by name.
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name")
        .fetch_all(pool)
        .await
        .context("failed to list users")?;

    Ok(users)
}

/// List the users assigned to a coach, ordered by name.
pub async fn list_users_for_coach(pool: &PgPool, coach_id: Uuid) -> Result<Vec<User>> {
    let users =
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE coach_id = $1 ORDER BY name")
            .bind(coach_id)
            .fetch_all(pool)
            .await
            .context("failed to list users for coach")?;

    Ok(users)
}

/// Overwrite a user's measurements and, when given, fitness level.
///
/// Returns `None` if the user does not exist.
pub async fn update_measurements(
    pool: &PgPool,
    id: Uuid,
    measurements: Measurements,
    fitness_level: Option<FitnessLevel>,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users \
         SET age = $2, weight = $3, height = $4, bmi = $5, \
             fitness_level = COALESCE($6, fitness_level) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(id)
    .bind(measurements.age)
    .bind(measurements.weight)
    .bind(measurements.height)
    .bind(measurements.bmi)
    .bind(fitness_level)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("failed to update measurements for user {id}"))?;

    Ok(user)
}

/// Point a user at a coach. Returns `None` if the user does not exist.
pub async fn set_coach(pool: &PgPool, user_id: Uuid, coach_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET coach_id = $2 WHERE id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(coach_id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("failed to assign coach {coach_id} to user {user_id}"))?;

    Ok(user)
}
