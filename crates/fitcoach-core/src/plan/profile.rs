//! User profile snapshot fed to the generator, with BMI bucketing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fitcoach_db::models::{FitnessLevel, User};

/// A measurement that must be strictly positive was not.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} must be a positive number (got {value})")]
pub struct ProfileError {
    pub field: &'static str,
    pub value: f64,
}

/// Check that age, weight, and height are all strictly positive and finite.
pub fn validate_measurements(age: i32, weight_kg: f64, height_cm: f64) -> Result<(), ProfileError> {
    if age <= 0 {
        return Err(ProfileError {
            field: "age",
            value: f64::from(age),
        });
    }
    for (field, value) in [("weight", weight_kg), ("height", height_cm)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ProfileError { field, value });
        }
    }
    Ok(())
}

/// Body-mass index in kg/m² from kilograms and centimetres.
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Clinical BMI classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiBucket {
    /// Below 18.5.
    Underweight,
    /// 18.5 up to 25.
    Normal,
    /// 25 up to 30.
    Overweight,
    /// 30 and above.
    Obese,
}

impl BmiBucket {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

/// Per-call snapshot of the measurements a plan is scaled by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Years.
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub fitness_level: FitnessLevel,
}

impl UserProfile {
    pub fn new(age: i32, weight_kg: f64, height_cm: f64, fitness_level: FitnessLevel) -> Self {
        Self {
            age,
            weight_kg,
            height_cm,
            fitness_level,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        validate_measurements(self.age, self.weight_kg, self.height_cm)
    }

    pub fn bmi(&self) -> f64 {
        body_mass_index(self.weight_kg, self.height_cm)
    }

    pub fn bmi_bucket(&self) -> BmiBucket {
        BmiBucket::from_bmi(self.bmi())
    }
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self::new(user.age, user.weight, user.height, user.fitness_level)
    }
}
