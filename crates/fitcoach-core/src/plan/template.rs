//! Day templates: which body regions each training day draws from.
//!
//! The split is a fixed table keyed by (day index, total days), not a
//! formula. Day indices without a template go through a [`DayFallback`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use fitcoach_db::models::BodyRegion;
use fitcoach_db::models::BodyRegion::{Back, Biceps, Chest, Forearms, Legs, Shoulders, Triceps};

use super::profile::UserProfile;

/// A request for `count` distinct exercises from one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSlot {
    pub region: BodyRegion,
    pub count: usize,
}

const fn slot(region: BodyRegion, count: usize) -> RegionSlot {
    RegionSlot { region, count }
}

const DAY_1: &[RegionSlot] = &[
    slot(Chest, 2),
    slot(Shoulders, 2),
    slot(Biceps, 1),
    slot(Forearms, 1),
    slot(Triceps, 1),
    slot(Back, 2),
    slot(Legs, 2),
];

const DAY_2: &[RegionSlot] = &[
    slot(Chest, 2),
    slot(Shoulders, 2),
    slot(Biceps, 1),
    slot(Forearms, 1),
    slot(Triceps, 1),
    slot(Back, 2),
];

const DAY_3: &[RegionSlot] = &[slot(Chest, 3), slot(Shoulders, 3), slot(Triceps, 2)];

const DAY_4: &[RegionSlot] = &[slot(Legs, 5)];

const DAY_6: &[RegionSlot] = &[slot(Triceps, 3), slot(Biceps, 3), slot(Forearms, 3)];

const DAY_7: &[RegionSlot] = &[slot(Legs, 4), slot(Triceps, 3), slot(Biceps, 3)];

/// Length of the repeating split.
pub const CYCLE_LENGTH: u32 = 7;

/// The scheduled rest day, reserved only when a full cycle is requested.
pub const REST_DAY: u32 = 5;

/// What a day index is templated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTemplate {
    Rest,
    Train(&'static [RegionSlot]),
}

/// Look up the template for `day` (1-based) in a plan of `total_days`.
///
/// Returns `None` for day indices the table does not cover.
pub fn lookup(day: u32, total_days: u32) -> Option<DayTemplate> {
    match day {
        1 => Some(DayTemplate::Train(DAY_1)),
        2 => Some(DayTemplate::Train(DAY_2)),
        3 => Some(DayTemplate::Train(DAY_3)),
        4 => Some(DayTemplate::Train(DAY_4)),
        REST_DAY if total_days == CYCLE_LENGTH => Some(DayTemplate::Rest),
        6 => Some(DayTemplate::Train(DAY_6)),
        7 => Some(DayTemplate::Train(DAY_7)),
        _ => None,
    }
}

/// Policy for day indices that have no template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayFallback {
    /// The day is empty.
    #[default]
    Empty,
    /// Reuse the 7-day split, so day 8 trains like day 1 and day 12 rests.
    Repeat,
    /// Two or three random regions, with per-region counts drawn from the
    /// profile's [`ExerciseCountRange`].
    Random,
}

/// Regions eligible for a randomized day.
const RANDOM_DAY_REGIONS: [BodyRegion; 6] = [Chest, Shoulders, Biceps, Triceps, Back, Legs];

/// Inclusive bounds on how many exercises a randomized region contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseCountRange {
    pub min: usize,
    pub max: usize,
}

impl ExerciseCountRange {
    /// Younger users get more volume; very heavy or very light users are
    /// pulled toward the middle of the range.
    pub fn for_profile(profile: &UserProfile) -> Self {
        let (mut min, mut max) = match profile.age {
            ..30 => (4, 7),
            30..=50 => (3, 6),
            _ => (2, 5),
        };

        if profile.weight_kg > 100.0 {
            min = min.max(3);
            max = max.min(5);
        } else if profile.weight_kg < 60.0 {
            min = min.max(4);
            max = max.min(7);
        }

        Self { min, max }
    }
}

/// Resolve the region menu for one day, applying `fallback` when the table
/// has no entry. Only [`DayFallback::Random`] consumes randomness here.
pub fn day_menu<R>(
    day: u32,
    total_days: u32,
    profile: &UserProfile,
    fallback: DayFallback,
    rng: &mut R,
) -> Vec<RegionSlot>
where
    R: Rng + ?Sized,
{
    match lookup(day, total_days) {
        Some(DayTemplate::Train(slots)) => slots.to_vec(),
        Some(DayTemplate::Rest) => Vec::new(),
        None => match fallback {
            DayFallback::Empty => Vec::new(),
            DayFallback::Repeat => {
                let cycle_day = day.saturating_sub(1) % CYCLE_LENGTH + 1;
                match lookup(cycle_day, CYCLE_LENGTH) {
                    Some(DayTemplate::Train(slots)) => slots.to_vec(),
                    _ => Vec::new(),
                }
            }
            DayFallback::Random => random_menu(profile, rng),
        },
    }
}

fn random_menu<R>(profile: &UserProfile, rng: &mut R) -> Vec<RegionSlot>
where
    R: Rng + ?Sized,
{
    let range = ExerciseCountRange::for_profile(profile);
    let region_count = rng.random_range(2..=3);

    rand::seq::index::sample(rng, RANDOM_DAY_REGIONS.len(), region_count)
        .into_vec()
        .into_iter()
        .map(|i| slot(RANDOM_DAY_REGIONS[i], rng.random_range(range.min..=range.max)))
        .collect()
}
