//! Workout plans: profile snapshot, day templates, generation, spreadsheet
//! export, and the service layer.

pub mod export;
pub mod generate;
pub mod profile;
pub mod service;
pub mod template;

pub use export::{Cell, ExportError, PlanDocument, Sheet, serialize_plan};
pub use generate::{
    DayPlan, GenerateError, GeneratorOptions, PrescribedExercise, ScalingPolicy, WorkoutPlan,
    day_label, generate,
};
pub use profile::{BmiBucket, ProfileError, UserProfile, body_mass_index};
pub use service::{
    PlanServiceError, StoredPlan, export_for_user, generate_for_user, latest_plan, list_plans,
    update_profile,
};
pub use template::DayFallback;
