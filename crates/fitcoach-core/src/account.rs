//! User and coach accounts: signup, login, coach assignment.
//!
//! Credentials are stored and compared as given; there is no session
//! mechanism. A successful login only tells the caller who logged in.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use fitcoach_db::models::{Coach, FitnessLevel, User};
use fitcoach_db::queries::coaches::{self as coach_queries, NewCoach};
use fitcoach_db::queries::is_unique_violation;
use fitcoach_db::queries::users::{self as user_queries, NewUser};

use crate::plan::profile::{ProfileError, body_mass_index, validate_measurements};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error("coach {0} not found")]
    CoachNotFound(Uuid),

    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error(transparent)]
    InvalidProfile(#[from] ProfileError),

    #[error("name {0:?} is already taken")]
    NameTaken(String),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// Which table a login matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Coach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSignup {
    pub name: String,
    pub password: String,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    pub daily_calories: Option<i32>,
    pub goal: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoachSignup {
    pub name: String,
    pub password: String,
    pub specialization: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub experience_level: Option<i32>,
}

fn require_credentials(name: &str, password: &str) -> Result<(), AccountError> {
    if name.trim().is_empty() {
        return Err(AccountError::MissingField("name"));
    }
    if password.is_empty() {
        return Err(AccountError::MissingField("password"));
    }
    Ok(())
}

/// A concurrent signup can pass the name pre-check and still lose the insert.
fn name_conflict(err: anyhow::Error, name: &str) -> AccountError {
    if is_unique_violation(&err) {
        AccountError::NameTaken(name.to_owned())
    } else {
        AccountError::Database(err)
    }
}

/// Register a user. BMI is derived from the given weight and height.
pub async fn create_user(pool: &PgPool, signup: &UserSignup) -> Result<User, AccountError> {
    let name = signup.name.trim();
    require_credentials(name, &signup.password)?;
    validate_measurements(signup.age, signup.weight, signup.height)?;

    if user_queries::get_user_by_name(pool, name).await?.is_some() {
        return Err(AccountError::NameTaken(name.to_owned()));
    }

    let user = user_queries::insert_user(
        pool,
        &NewUser {
            name,
            password: &signup.password,
            age: signup.age,
            weight: signup.weight,
            height: signup.height,
            bmi: body_mass_index(signup.weight, signup.height),
            fitness_level: signup.fitness_level,
            daily_calories: signup.daily_calories,
            goal: signup.goal.as_deref(),
        },
    )
    .await
    .map_err(|e| name_conflict(e, name))?;

    info!(user_id = %user.id, name = %user.name, "user created");
    Ok(user)
}

/// Register a coach. Optional measurements must be positive when present.
pub async fn create_coach(pool: &PgPool, signup: &CoachSignup) -> Result<Coach, AccountError> {
    let name = signup.name.trim();
    require_credentials(name, &signup.password)?;

    if let Some(age) = signup.age.filter(|a| *a <= 0) {
        return Err(ProfileError {
            field: "age",
            value: f64::from(age),
        }
        .into());
    }
    for (field, value) in [("weight", signup.weight), ("height", signup.height)] {
        if let Some(value) = value.filter(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ProfileError { field, value }.into());
        }
    }

    if coach_queries::get_coach_by_name(pool, name).await?.is_some() {
        return Err(AccountError::NameTaken(name.to_owned()));
    }

    let coach = coach_queries::insert_coach(
        pool,
        &NewCoach {
            name,
            password: &signup.password,
            specialization: signup.specialization.as_deref(),
            age: signup.age,
            weight: signup.weight,
            height: signup.height,
            experience_level: signup.experience_level,
        },
    )
    .await
    .map_err(|e| name_conflict(e, name))?;

    info!(coach_id = %coach.id, name = %coach.name, "coach created");
    Ok(coach)
}

/// Check credentials against users first, then coaches.
///
/// Returns `None` when neither table matches.
pub async fn login(
    pool: &PgPool,
    name: &str,
    password: &str,
) -> Result<Option<LoginOutcome>, AccountError> {
    if let Some(user) = user_queries::find_user_by_credentials(pool, name, password).await? {
        return Ok(Some(LoginOutcome {
            id: user.id,
            role: Role::User,
        }));
    }

    if let Some(coach) = coach_queries::find_coach_by_credentials(pool, name, password).await? {
        return Ok(Some(LoginOutcome {
            id: coach.id,
            role: Role::Coach,
        }));
    }

    Ok(None)
}

/// Assign a coach to a user. Both must exist.
pub async fn assign_coach(
    pool: &PgPool,
    user_id: Uuid,
    coach_id: Uuid,
) -> Result<User, AccountError> {
    if coach_queries::get_coach(pool, coach_id).await?.is_none() {
        return Err(AccountError::CoachNotFound(coach_id));
    }

    let user = user_queries::set_coach(pool, user_id, coach_id)
        .await?
        .ok_or(AccountError::UserNotFound(user_id))?;

    info!(user_id = %user.id, coach_id = %coach_id, "coach assigned");
    Ok(user)
}

/// Users assigned to a coach. The coach must exist; the list may be empty.
pub async fn students_of(pool: &PgPool, coach_id: Uuid) -> Result<Vec<User>, AccountError> {
    if coach_queries::get_coach(pool, coach_id).await?.is_none() {
        return Err(AccountError::CoachNotFound(coach_id));
    }
    Ok(user_queries::list_users_for_coach(pool, coach_id).await?)
}
