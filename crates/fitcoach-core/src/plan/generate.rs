//! Workout plan generation.
//!
//! A pure function of (profile, day count, catalog snapshot, randomness
//! source). Each day resolves a region menu from the day templates, samples
//! catalog entries per region without replacement, and resolves set/rep
//! counts through the configured [`ScalingPolicy`]. No I/O happens here;
//! callers own the randomness source, so concurrent generations never share
//! one.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fitcoach_db::models::{BodyRegion, FitnessLevel};

use crate::catalog::ExerciseTemplate;

use super::profile::{BmiBucket, ProfileError, UserProfile};
use super::template::{self, DayFallback};

/// Resolved sets never drop below this.
pub const MIN_SETS: i32 = 1;
/// Resolved reps never drop below this.
pub const MIN_REPS: i32 = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Errors that abort generation before any day is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("day count must be at least 1 (got {0})")]
    InvalidDayCount(u32),
}

/// How base catalog volume turns into prescribed volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingPolicy {
    /// Adjust by fitness level, then by BMI bucket, then apply the floors.
    #[default]
    Profile,
    /// Use catalog defaults, only applying the floors.
    Catalog,
}

/// Generator knobs, read from the `[generator]` config section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub fallback: DayFallback,
    pub scaling: ScalingPolicy,
}

/// One exercise as prescribed for a specific day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescribedExercise {
    pub region: BodyRegion,
    pub name: String,
    pub sets: i32,
    pub reps: i32,
    pub equipment: String,
}

/// The exercises for one day. An empty day is a rest day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    #[serde(rename = "day")]
    pub label: String,
    pub exercises: Vec<PrescribedExercise>,
}

impl DayPlan {
    pub fn is_rest(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// Canonical label for a 1-based day index.
pub fn day_label(day: u32) -> String {
    format!("Day {day}")
}

/// A generated plan: exactly one [`DayPlan`] per requested day, in order.
///
/// Serializes as the JSON array `[{"day": "Day 1", "exercises": [...]}, ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutPlan {
    pub days: Vec<DayPlan>,
}

impl WorkoutPlan {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Look up a day by its label (e.g. `"Day 3"`).
    pub fn get(&self, label: &str) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.label == label)
    }

    /// Every prescribed exercise across all days, in plan order.
    pub fn exercises(&self) -> impl Iterator<Item = &PrescribedExercise> {
        self.days.iter().flat_map(|d| d.exercises.iter())
    }
}

// ---------------------------------------------------------------------------
// Volume scaling
// ---------------------------------------------------------------------------

/// Scale base sets/reps by fitness level and BMI bucket.
///
/// Overweight and obese adjustments are capped at (6, 15) and (8, 20). The
/// floors ([`MIN_SETS`], [`MIN_REPS`]) are applied last, unconditionally.
pub fn scale_volume(
    base_sets: i32,
    base_reps: i32,
    level: FitnessLevel,
    bucket: BmiBucket,
) -> (i32, i32) {
    let (mut sets, mut reps) = match level {
        FitnessLevel::Beginner => (base_sets - 1, base_reps - 2),
        FitnessLevel::Intermediate => (base_sets, base_reps),
        FitnessLevel::Advanced => (base_sets + 1, base_reps + 2),
    };

    match bucket {
        BmiBucket::Underweight => {
            sets -= 1;
            reps -= 2;
        }
        BmiBucket::Normal => {}
        BmiBucket::Overweight => {
            sets = (sets + 1).min(6);
            reps = (reps + 2).min(15);
        }
        BmiBucket::Obese => {
            sets = (sets + 2).min(8);
            reps = (reps + 3).min(20);
        }
    }

    (sets.max(MIN_SETS), reps.max(MIN_REPS))
}

fn prescribe(
    template: &ExerciseTemplate,
    profile: &UserProfile,
    scaling: ScalingPolicy,
) -> PrescribedExercise {
    let (sets, reps) = match scaling {
        ScalingPolicy::Profile => scale_volume(
            template.sets,
            template.reps,
            profile.fitness_level,
            profile.bmi_bucket(),
        ),
        ScalingPolicy::Catalog => (template.sets.max(MIN_SETS), template.reps.max(MIN_REPS)),
    };

    PrescribedExercise {
        region: template.region,
        name: template.name.clone(),
        sets,
        reps,
        equipment: template.equipment_label().to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a `days`-day plan for `profile` from `catalog`.
///
/// Fails fast with [`GenerateError::InvalidProfile`] for non-positive
/// measurements. An empty catalog, a region with no entries, or an
/// untemplated day all degrade to empty contributions. With a seeded `rng`
/// the output is fully reproducible.
pub fn generate<R>(
    profile: &UserProfile,
    days: u32,
    catalog: &[ExerciseTemplate],
    options: &GeneratorOptions,
    rng: &mut R,
) -> Result<WorkoutPlan, GenerateError>
where
    R: Rng + ?Sized,
{
    profile.validate()?;
    if days == 0 {
        return Err(GenerateError::InvalidDayCount(days));
    }

    // Catalog order is preserved within each region so a fixed seed always
    // indexes the same entries.
    let mut by_region: HashMap<BodyRegion, Vec<&ExerciseTemplate>> = HashMap::new();
    for entry in catalog {
        by_region.entry(entry.region).or_default().push(entry);
    }

    let mut plan_days = Vec::with_capacity(days as usize);
    for day in 1..=days {
        let menu = template::day_menu(day, days, profile, options.fallback, rng);

        let mut exercises = Vec::new();
        for slot in menu {
            let candidates = by_region.get(&slot.region).map_or(&[][..], Vec::as_slice);
            let amount = slot.count.min(candidates.len());
            if amount == 0 {
                continue;
            }
            for idx in rand::seq::index::sample(rng, candidates.len(), amount).into_iter() {
                exercises.push(prescribe(candidates[idx], profile, options.scaling));
            }
        }

        plan_days.push(DayPlan {
            label: day_label(day),
            exercises,
        });
    }

    Ok(WorkoutPlan { days: plan_days })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    /// Height 180 cm; weight picks the BMI.
    fn profile_with_bmi(level: FitnessLevel, bmi: f64) -> UserProfile {
        UserProfile::new(25, bmi * 1.8 * 1.8, 180.0, level)
    }

    fn squat_only() -> Vec<ExerciseTemplate> {
        vec![ExerciseTemplate::new(BodyRegion::Legs, "Squat", 3, 10).with_equipment("Barbell")]
    }

    fn full_catalog() -> Vec<ExerciseTemplate> {
        crate::catalog::default_catalog()
            .iter()
            .map(ExerciseTemplate::from)
            .collect()
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn returns_exactly_the_requested_days() {
        let catalog = full_catalog();
        let profile = profile_with_bmi(FitnessLevel::Intermediate, 22.0);
        for days in [1, 3, 5, 7, 10, 30] {
            for fallback in [DayFallback::Empty, DayFallback::Repeat, DayFallback::Random] {
                let options = GeneratorOptions {
                    fallback,
                    ..Default::default()
                };
                let plan = generate(&profile, days, &catalog, &options, &mut rng(7)).unwrap();
                assert_eq!(plan.len(), days as usize);
                assert_eq!(plan.days[0].label, "Day 1");
                assert_eq!(plan.days.last().unwrap().label, day_label(days));
            }
        }
    }

    #[test]
    fn floors_hold_for_every_level_and_bucket() {
        let catalog = vec![
            ExerciseTemplate::new(BodyRegion::Legs, "Pistol Squat", 1, 1),
            ExerciseTemplate::new(BodyRegion::Legs, "Box Jump", 1, 5),
            ExerciseTemplate::new(BodyRegion::Chest, "Push-Up", 2, 6),
        ];
        for level in [
            FitnessLevel::Beginner,
            FitnessLevel::Intermediate,
            FitnessLevel::Advanced,
        ] {
            for bmi in [16.0, 22.0, 27.0, 35.0] {
                let profile = profile_with_bmi(level, bmi);
                let plan = generate(
                    &profile,
                    7,
                    &catalog,
                    &GeneratorOptions::default(),
                    &mut rng(3),
                )
                .unwrap();
                for e in plan.exercises() {
                    assert!(e.sets >= MIN_SETS, "{level} bmi {bmi}: {e:?}");
                    assert!(e.reps >= MIN_REPS, "{level} bmi {bmi}: {e:?}");
                }
            }
        }
    }

    #[test]
    fn no_duplicates_within_a_region_on_one_day() {
        let catalog = full_catalog();
        let profile = profile_with_bmi(FitnessLevel::Advanced, 23.0);
        for seed in 0..25 {
            let plan = generate(
                &profile,
                7,
                &catalog,
                &GeneratorOptions::default(),
                &mut rng(seed),
            )
            .unwrap();
            for day in &plan.days {
                let mut seen = HashSet::new();
                for e in &day.exercises {
                    assert!(
                        seen.insert((e.region, e.name.clone())),
                        "seed {seed}: {} repeated on {}",
                        e.name,
                        day.label
                    );
                }
            }
        }
    }

    #[test]
    fn empty_catalog_gives_empty_days() {
        let profile = profile_with_bmi(FitnessLevel::Beginner, 20.0);
        let plan = generate(&profile, 7, &[], &GeneratorOptions::default(), &mut rng(1)).unwrap();
        assert_eq!(plan.len(), 7);
        assert!(plan.days.iter().all(DayPlan::is_rest));
    }

    #[test]
    fn same_seed_same_plan() {
        let catalog = full_catalog();
        let profile = profile_with_bmi(FitnessLevel::Intermediate, 26.0);
        let options = GeneratorOptions {
            fallback: DayFallback::Random,
            scaling: ScalingPolicy::Profile,
        };
        let a = generate(&profile, 10, &catalog, &options, &mut rng(42)).unwrap();
        let b = generate(&profile, 10, &catalog, &options, &mut rng(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn invalid_profiles_are_rejected() {
        let catalog = full_catalog();
        let options = GeneratorOptions::default();
        let bad = [
            UserProfile::new(0, 70.0, 175.0, FitnessLevel::Beginner),
            UserProfile::new(30, -5.0, 175.0, FitnessLevel::Beginner),
            UserProfile::new(30, 70.0, 0.0, FitnessLevel::Beginner),
        ];
        for profile in &bad {
            let err = generate(profile, 7, &catalog, &options, &mut rng(1)).unwrap_err();
            assert!(matches!(err, GenerateError::InvalidProfile(_)), "{err}");
        }

        let good = UserProfile::new(30, 70.0, 175.0, FitnessLevel::Beginner);
        assert!(generate(&good, 7, &catalog, &options, &mut rng(1)).is_ok());
    }

    #[test]
    fn zero_days_is_rejected() {
        let profile = profile_with_bmi(FitnessLevel::Intermediate, 22.0);
        let err = generate(&profile, 0, &[], &GeneratorOptions::default(), &mut rng(1)).unwrap_err();
        assert_eq!(err, GenerateError::InvalidDayCount(0));
    }

    #[test]
    fn sampling_is_capped_by_catalog_size() {
        let profile = profile_with_bmi(FitnessLevel::Intermediate, 22.0);
        let plan = generate(
            &profile,
            1,
            &squat_only(),
            &GeneratorOptions::default(),
            &mut rng(5),
        )
        .unwrap();

        assert_eq!(
            plan.days[0].exercises,
            vec![PrescribedExercise {
                region: BodyRegion::Legs,
                name: "Squat".into(),
                sets: 3,
                reps: 10,
                equipment: "Barbell".into(),
            }]
        );
    }

    #[test]
    fn advanced_obese_scaling() {
        let profile = profile_with_bmi(FitnessLevel::Advanced, 31.0);
        assert_eq!(profile.bmi_bucket(), BmiBucket::Obese);

        let plan = generate(
            &profile,
            1,
            &squat_only(),
            &GeneratorOptions::default(),
            &mut rng(5),
        )
        .unwrap();
        let squat = &plan.days[0].exercises[0];
        assert_eq!((squat.sets, squat.reps), (6, 15));
    }

    #[test]
    fn catalog_scaling_keeps_base_volume() {
        let profile = profile_with_bmi(FitnessLevel::Advanced, 31.0);
        let options = GeneratorOptions {
            scaling: ScalingPolicy::Catalog,
            ..Default::default()
        };
        let plan = generate(&profile, 1, &squat_only(), &options, &mut rng(5)).unwrap();
        let squat = &plan.days[0].exercises[0];
        assert_eq!((squat.sets, squat.reps), (3, 10));
    }

    #[test]
    fn scale_volume_table() {
        use BmiBucket::*;
        use FitnessLevel::*;

        assert_eq!(scale_volume(3, 10, Intermediate, Normal), (3, 10));
        assert_eq!(scale_volume(3, 10, Beginner, Normal), (2, 8));
        assert_eq!(scale_volume(3, 10, Advanced, Normal), (4, 12));
        assert_eq!(scale_volume(3, 10, Beginner, Underweight), (1, 6));
        assert_eq!(scale_volume(1, 5, Beginner, Underweight), (1, 5));
        assert_eq!(scale_volume(3, 10, Intermediate, Overweight), (4, 12));
        assert_eq!(scale_volume(6, 14, Advanced, Overweight), (6, 15));
        assert_eq!(scale_volume(3, 10, Intermediate, Obese), (5, 13));
        assert_eq!(scale_volume(7, 19, Advanced, Obese), (8, 20));
    }

    #[test]
    fn seven_day_week_rests_on_day_five() {
        let profile = profile_with_bmi(FitnessLevel::Intermediate, 22.0);
        let plan = generate(
            &profile,
            7,
            &full_catalog(),
            &GeneratorOptions::default(),
            &mut rng(9),
        )
        .unwrap();
        let day5 = plan.get("Day 5").expect("day 5 exists");
        assert!(day5.is_rest());
        let day4 = plan.get("Day 4").unwrap();
        assert_eq!(day4.exercises.len(), 5);
        assert!(day4.exercises.iter().all(|e| e.region == BodyRegion::Legs));
    }

    #[test]
    fn regions_come_from_the_catalog() {
        let catalog = vec![
            ExerciseTemplate::new(BodyRegion::Chest, "Push-Up", 3, 12),
            ExerciseTemplate::new(BodyRegion::Chest, "Bench Press", 4, 8),
            ExerciseTemplate::new(BodyRegion::Chest, "Cable Fly", 3, 12),
        ];
        let profile = profile_with_bmi(FitnessLevel::Intermediate, 22.0);
        let plan = generate(
            &profile,
            5,
            &catalog,
            &GeneratorOptions::default(),
            &mut rng(11),
        )
        .unwrap();
        assert!(plan.exercises().all(|e| e.region == BodyRegion::Chest));
        // Days 1-3 each ask for chest work; days 4-5 do not.
        assert_eq!(plan.days[0].exercises.len(), 2);
        assert_eq!(plan.days[2].exercises.len(), 3);
        assert!(plan.days[3].is_rest());
        assert!(plan.days[4].is_rest());
    }

    #[test]
    fn plan_json_shape() {
        let profile = profile_with_bmi(FitnessLevel::Intermediate, 22.0);
        let plan = generate(
            &profile,
            2,
            &squat_only(),
            &GeneratorOptions::default(),
            &mut rng(1),
        )
        .unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json[0]["day"], "Day 1");
        assert_eq!(json[0]["exercises"][0]["region"], "legs");
        assert_eq!(json[0]["exercises"][0]["equipment"], "Barbell");
        assert_eq!(json[1]["exercises"], serde_json::json!([]));

        let back: WorkoutPlan = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan);
    }
}
