//! Account resolution for CLI arguments.
//!
//! Commands accept either a UUID or a unique name wherever they take a user
//! or coach.

use anyhow::{Result, bail};
use sqlx::PgPool;
use uuid::Uuid;

use fitcoach_db::models::{Coach, User};
use fitcoach_db::queries::{coaches as coach_queries, users as user_queries};

/// Look up a user by UUID, falling back to name.
pub async fn resolve_user(pool: &PgPool, input: &str) -> Result<User> {
    let found = match Uuid::parse_str(input) {
        Ok(id) => user_queries::get_user(pool, id).await?,
        Err(_) => user_queries::get_user_by_name(pool, input).await?,
    };
    match found {
        Some(user) => Ok(user),
        None => bail!("no user matches {input:?} (expected a user ID or name)"),
    }
}

/// Look up a coach by UUID, falling back to name.
pub async fn resolve_coach(pool: &PgPool, input: &str) -> Result<Coach> {
    let found = match Uuid::parse_str(input) {
        Ok(id) => coach_queries::get_coach(pool, id).await?,
        Err(_) => coach_queries::get_coach_by_name(pool, input).await?,
    };
    match found {
        Some(coach) => Ok(coach),
        None => bail!("no coach matches {input:?} (expected a coach ID or name)"),
    }
}

/// A fresh RNG for one command: seeded when requested, else from the OS.
pub fn rng_for(seed: Option<u64>) -> rand::rngs::StdRng {
    use rand::SeedableRng;
    match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_os_rng(),
    }
}

/// Reject day counts outside `1..=365`.
pub fn check_days(days: u32) -> Result<u32> {
    if !(1..=MAX_DAYS).contains(&days) {
        bail!("days must be between 1 and {MAX_DAYS} (got {days})");
    }
    Ok(days)
}

/// Upper bound on plan length accepted from the CLI and HTTP API.
pub const MAX_DAYS: u32 = 365;
