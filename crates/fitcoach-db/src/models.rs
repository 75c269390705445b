use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Coarse skill tier of a user; scales prescribed volume.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

impl FromStr for FitnessLevel {
    type Err = FitnessLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(FitnessLevelParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`FitnessLevel`] string.
#[derive(Debug, Clone)]
pub struct FitnessLevelParseError(pub String);

impl fmt::Display for FitnessLevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid fitness level: {:?} (expected beginner, intermediate, or advanced)",
            self.0
        )
    }
}

impl std::error::Error for FitnessLevelParseError {}

// ---------------------------------------------------------------------------

/// Muscle-group tag used to group catalog exercises.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    Chest,
    Shoulders,
    Biceps,
    Forearms,
    Triceps,
    Back,
    Legs,
}

impl BodyRegion {
    /// Every region, in catalog display order.
    pub const ALL: [BodyRegion; 7] = [
        Self::Chest,
        Self::Shoulders,
        Self::Biceps,
        Self::Forearms,
        Self::Triceps,
        Self::Back,
        Self::Legs,
    ];

    /// Human-readable label used in exports and API responses.
    pub fn label(self) -> &'static str {
        match self {
            Self::Chest => "Chest",
            Self::Shoulders => "Shoulders",
            Self::Biceps => "Biceps",
            Self::Forearms => "Forearms",
            Self::Triceps => "Triceps",
            Self::Back => "Back",
            Self::Legs => "Legs",
        }
    }
}

impl fmt::Display for BodyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Chest => "chest",
            Self::Shoulders => "shoulders",
            Self::Biceps => "biceps",
            Self::Forearms => "forearms",
            Self::Triceps => "triceps",
            Self::Back => "back",
            Self::Legs => "legs",
        };
        f.write_str(s)
    }
}

impl FromStr for BodyRegion {
    type Err = BodyRegionParseError;

    /// Accepts the stored snake_case form as well as the display label
    /// (`"Legs"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chest" => Ok(Self::Chest),
            "shoulders" => Ok(Self::Shoulders),
            "biceps" => Ok(Self::Biceps),
            "forearms" => Ok(Self::Forearms),
            "triceps" => Ok(Self::Triceps),
            "back" => Ok(Self::Back),
            "legs" => Ok(Self::Legs),
            _ => Err(BodyRegionParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`BodyRegion`] string.
#[derive(Debug, Clone)]
pub struct BodyRegionParseError(pub String);

impl fmt::Display for BodyRegionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid body region: {:?}", self.0)
    }
}

impl std::error::Error for BodyRegionParseError {}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A coach account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coach {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub specialization: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub experience_level: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// A trainee account with the body measurements plans are scaled by.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub age: i32,
    /// Kilograms.
    pub weight: f64,
    /// Centimetres.
    pub height: f64,
    pub bmi: f64,
    pub fitness_level: FitnessLevel,
    pub coach_id: Option<Uuid>,
    pub daily_calories: Option<i32>,
    pub goal: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A catalog exercise with its default volume.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub region: BodyRegion,
    pub sets: i32,
    pub reps: i32,
    pub equipment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A stored, generated workout plan. `plan` holds the serialized plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutPlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub days: i32,
    pub plan: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// One performed (or prescribed) exercise in a user's history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FitnessEntry {
    pub id: i64,
    pub user_id: Uuid,
    pub performed_on: NaiveDate,
    pub exercise_name: String,
    pub weight: f64,
    pub sets: i32,
    pub reps: i32,
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
