//! CLI handlers for `fitcoach exercise` subcommands.
//!
//! - `fitcoach exercise list [--region ..]`
//! - `fitcoach exercise add <name> --region .. --sets .. --reps .. [--equipment ..]`
//! - `fitcoach exercise import <file>` -- upsert a catalog TOML file
//! - `fitcoach exercise seed`          -- upsert the built-in library

use anyhow::{Context, Result, bail};
use sqlx::PgPool;

use fitcoach_core::catalog::{self, NO_EQUIPMENT};
use fitcoach_db::models::Exercise;
use fitcoach_db::queries::exercises::{self as exercise_queries, NewExercise};

use crate::ExerciseCommands;

pub async fn run_exercise_command(command: ExerciseCommands, pool: &PgPool) -> Result<()> {
    match command {
        ExerciseCommands::List { region } => {
            let exercises = match region {
                Some(r) => exercise_queries::list_exercises_for_region(pool, r).await?,
                None => exercise_queries::list_exercises(pool).await?,
            };
            print_table(&exercises);
            Ok(())
        }
        ExerciseCommands::Add {
            name,
            region,
            sets,
            reps,
            equipment,
        } => {
            if sets <= 0 || reps <= 0 {
                bail!("sets and reps must be positive (got {sets}x{reps})");
            }
            let exercise = exercise_queries::insert_exercise(
                pool,
                &NewExercise {
                    name,
                    region,
                    sets,
                    reps,
                    equipment,
                },
            )
            .await?;
            println!(
                "Added {} ({}) {}x{}.",
                exercise.name, exercise.region, exercise.sets, exercise.reps
            );
            Ok(())
        }
        ExerciseCommands::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read catalog file: {file}"))?;
            let entries = catalog::parse_catalog_toml(&content)
                .with_context(|| format!("failed to parse catalog file: {file}"))?;
            let count = catalog::import_catalog(pool, &entries).await?;
            println!("Imported {count} exercises from {file}.");
            Ok(())
        }
        ExerciseCommands::Seed => {
            let count = catalog::import_catalog(pool, &catalog::default_catalog()).await?;
            println!("Seeded {count} exercises from the built-in library.");
            Ok(())
        }
    }
}

fn print_table(exercises: &[Exercise]) {
    if exercises.is_empty() {
        println!("No exercises found. Use `fitcoach exercise seed` to load the built-in library.");
        return;
    }

    let name_w = exercises.iter().map(|e| e.name.len()).max().unwrap_or(4).max(4);
    println!("{:<10}  {:<name_w$}  {:>4}  {:>4}  EQUIPMENT", "REGION", "NAME", "SETS", "REPS");
    for e in exercises {
        println!(
            "{:<10}  {:<name_w$}  {:>4}  {:>4}  {}",
            e.region.label(),
            e.name,
            e.sets,
            e.reps,
            e.equipment.as_deref().unwrap_or(NO_EQUIPMENT)
        );
    }
}
