//! Plan service layer.
//!
//! Ties the pure generator to the database: loads the user and a catalog
//! snapshot, generates, and persists the plan row together with the
//! prescribed history entries inside a single transaction.

use anyhow::Context;
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use fitcoach_db::models::{FitnessLevel, User, WorkoutPlanRecord};
use fitcoach_db::queries::fitness_entries::{self as entry_queries, NewFitnessEntry};
use fitcoach_db::queries::users::{self as user_queries, Measurements};
use fitcoach_db::queries::workout_plans as plan_queries;

use crate::catalog;

use super::export::{ExportError, serialize_plan};
use super::generate::{self, GenerateError, GeneratorOptions, WorkoutPlan};
use super::profile::{ProfileError, UserProfile, body_mass_index, validate_measurements};

#[derive(Debug, Error)]
pub enum PlanServiceError {
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error(transparent)]
    InvalidProfile(#[from] ProfileError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// A persisted plan alongside its decoded contents.
#[derive(Debug, Clone, Serialize)]
pub struct StoredPlan {
    #[serde(flatten)]
    pub record: WorkoutPlanRecord,
    #[serde(skip)]
    pub plan: WorkoutPlan,
}

impl TryFrom<WorkoutPlanRecord> for StoredPlan {
    type Error = anyhow::Error;

    fn try_from(record: WorkoutPlanRecord) -> anyhow::Result<Self> {
        let plan = serde_json::from_value(record.plan.clone())
            .with_context(|| format!("stored plan {} is not a valid workout plan", record.id))?;
        Ok(Self { record, plan })
    }
}

async fn require_user(pool: &PgPool, user_id: Uuid) -> Result<User, PlanServiceError> {
    user_queries::get_user(pool, user_id)
        .await?
        .ok_or(PlanServiceError::UserNotFound(user_id))
}

async fn generate_from_snapshot<R>(
    pool: &PgPool,
    user: &User,
    days: u32,
    options: &GeneratorOptions,
    rng: &mut R,
) -> Result<WorkoutPlan, PlanServiceError>
where
    R: Rng + ?Sized,
{
    let profile = UserProfile::from(user);
    let catalog = catalog::load_catalog(pool).await?;
    debug!(
        user_id = %user.id,
        days,
        catalog = catalog.len(),
        "generating workout plan"
    );
    Ok(generate::generate(&profile, days, &catalog, options, rng)?)
}

/// Overwrite a user's measurements and recompute BMI.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    age: i32,
    weight_kg: f64,
    height_cm: f64,
    fitness_level: Option<FitnessLevel>,
) -> Result<User, PlanServiceError> {
    validate_measurements(age, weight_kg, height_cm)?;

    let measurements = Measurements {
        age,
        weight: weight_kg,
        height: height_cm,
        bmi: body_mass_index(weight_kg, height_cm),
    };

    let user = user_queries::update_measurements(pool, user_id, measurements, fitness_level)
        .await?
        .ok_or(PlanServiceError::UserNotFound(user_id))?;

    info!(user_id = %user.id, bmi = user.bmi, "profile updated");
    Ok(user)
}

/// Generate a plan for a stored user and persist it.
///
/// The plan row and one history entry per prescribed exercise (weight 0,
/// dated today) are written in one transaction.
pub async fn generate_for_user<R>(
    pool: &PgPool,
    user_id: Uuid,
    days: u32,
    options: &GeneratorOptions,
    rng: &mut R,
) -> Result<StoredPlan, PlanServiceError>
where
    R: Rng + ?Sized,
{
    let user = require_user(pool, user_id).await?;
    let plan = generate_from_snapshot(pool, &user, days, options, rng).await?;

    let blob = serde_json::to_value(&plan).context("failed to serialize workout plan")?;
    let day_count = i32::try_from(days).context("day count does not fit in a database integer")?;
    let today = Utc::now().date_naive();

    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let record = plan_queries::insert_workout_plan(&mut *tx, user.id, day_count, &blob).await?;

    for exercise in plan.exercises() {
        entry_queries::insert_fitness_entry(
            &mut *tx,
            &NewFitnessEntry {
                user_id: user.id,
                performed_on: today,
                exercise_name: &exercise.name,
                weight: 0.0,
                sets: exercise.sets,
                reps: exercise.reps,
            },
        )
        .await?;
    }

    tx.commit().await.context("failed to commit workout plan")?;

    info!(
        user_id = %user.id,
        plan_id = %record.id,
        days,
        exercises = plan.exercises().count(),
        "workout plan stored"
    );

    Ok(StoredPlan { record, plan })
}

/// Generate a plan for a stored user and render it as xlsx bytes.
///
/// Nothing is persisted.
pub async fn export_for_user<R>(
    pool: &PgPool,
    user_id: Uuid,
    days: u32,
    options: &GeneratorOptions,
    rng: &mut R,
) -> Result<Vec<u8>, PlanServiceError>
where
    R: Rng + ?Sized,
{
    let user = require_user(pool, user_id).await?;
    let plan = generate_from_snapshot(pool, &user, days, options, rng).await?;
    let bytes = serialize_plan(&plan).to_xlsx()?;

    info!(user_id = %user.id, days, bytes = bytes.len(), "workout plan exported");
    Ok(bytes)
}

/// Every stored plan for a user, newest first.
pub async fn list_plans(pool: &PgPool, user_id: Uuid) -> Result<Vec<StoredPlan>, PlanServiceError> {
    require_user(pool, user_id).await?;
    let records = plan_queries::list_plans_for_user(pool, user_id).await?;
    let plans = records
        .into_iter()
        .map(StoredPlan::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(plans)
}

/// The user's current plan, if one has been generated.
pub async fn latest_plan(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<StoredPlan>, PlanServiceError> {
    require_user(pool, user_id).await?;
    match plan_queries::latest_plan_for_user(pool, user_id).await? {
        Some(record) => Ok(Some(StoredPlan::try_from(record)?)),
        None => Ok(None),
    }
}
