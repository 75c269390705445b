//! Database query functions for the `coaches` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Coach;

/// Parameters for inserting a new coach row.
#[derive(Debug, Clone, Default)]
pub struct NewCoach<'a> {
    pub name: &'a str,
    pub password: &'a str,
    pub specialization: Option<&'a str>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub experience_level: Option<i32>,
}

/// Insert a new coach. Names are unique.
pub async fn insert_coach(pool: &PgPool, new: &NewCoach<'_>) -> Result<Coach> {
    let coach = sqlx::query_as::<_, Coach>(
        "INSERT INTO coaches (name, password, specialization, age, weight, height, \
         experience_level) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING *",
    )
    .bind(new.name)
    .bind(new.password)
    .bind(new.specialization)
    .bind(new.age)
    .bind(new.weight)
    .bind(new.height)
    .bind(new.experience_level)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to insert coach {:?}", new.name))?;

    Ok(coach)
}

/// Fetch a coach by ID.
pub async fn get_coach(pool: &PgPool, id: Uuid) -> Result<Option<Coach>> {
    let coach = sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch coach")?;

    Ok(coach)
}

/// Fetch a coach by unique name.
pub async fn get_coach_by_name(pool: &PgPool, name: &str) -> Result<Option<Coach>> {
    let coach = sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("failed to fetch coach by name {name:?}"))?;

    Ok(coach)
}

/// Fetch the coach whose name and password both match.
pub async fn find_coach_by_credentials(
    pool: &PgPool,
    name: &str,
    password: &str,
) -> Result<Option<Coach>> {
    let coach =
        sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE name = $1 AND password = $2")
            .bind(name)
            .bind(password)
            .fetch_optional(pool)
            .await
            .context("failed to look up coach credentials")?;

    Ok(coach)
}

/// List all coaches, ordered by name.
pub async fn list_coaches(pool: &PgPool) -> Result<Vec<Coach>> {
    let coaches = sqlx::query_as::<_, Coach>("SELECT * FROM coaches ORDER BY name")
        .fetch_all(pool)
        .await
        .context("failed to list coaches")?;

    Ok(coaches)
}
