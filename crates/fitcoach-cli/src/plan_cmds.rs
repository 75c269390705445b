//! CLI handlers for `fitcoach plan` subcommands.
//!
//! - `fitcoach plan generate <user> --days N [--seed S]` -- generate and store
//! - `fitcoach plan show <user>`                        -- print the latest plan
//! - `fitcoach plan export <user> --days N --output f.xlsx [--seed S]`

use anyhow::{Context, Result};
use sqlx::PgPool;

use fitcoach_core::plan::{self, GeneratorOptions, WorkoutPlan};

use crate::PlanCommands;
use crate::resolve::{check_days, resolve_user, rng_for};

pub async fn run_plan_command(
    command: PlanCommands,
    pool: &PgPool,
    options: &GeneratorOptions,
) -> Result<()> {
    match command {
        PlanCommands::Generate { user, days, seed } => {
            let days = check_days(days)?;
            let user = resolve_user(pool, &user).await?;
            let mut rng = rng_for(seed);
            let stored = plan::generate_for_user(pool, user.id, days, options, &mut rng).await?;

            println!("Plan {} stored for {}.", stored.record.id, user.name);
            println!();
            print_plan(&stored.plan);
            Ok(())
        }
        PlanCommands::Show { user } => {
            let user = resolve_user(pool, &user).await?;
            match plan::latest_plan(pool, user.id).await? {
                Some(stored) => {
                    println!(
                        "Plan {} ({} days, generated {})",
                        stored.record.id,
                        stored.record.days,
                        stored.record.created_at.format("%Y-%m-%d %H:%M")
                    );
                    println!();
                    print_plan(&stored.plan);
                }
                None => println!(
                    "{} has no workout plan yet. Use `fitcoach plan generate` to create one.",
                    user.name
                ),
            }
            Ok(())
        }
        PlanCommands::Export {
            user,
            days,
            output,
            seed,
        } => {
            let days = check_days(days)?;
            let user = resolve_user(pool, &user).await?;
            let mut rng = rng_for(seed);
            let bytes = plan::export_for_user(pool, user.id, days, options, &mut rng).await?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("failed to write {output}"))?;
            println!("Exported {days}-day plan for {} to {output}.", user.name);
            Ok(())
        }
    }
}

fn print_plan(plan: &WorkoutPlan) {
    for day in &plan.days {
        println!("{}", day.label);
        if day.is_rest() {
            println!("  Rest Day");
            continue;
        }
        for e in &day.exercises {
            println!(
                "  {:<10} {:<28} {:>2} x {:<3} {}",
                e.region.label(),
                e.name,
                e.sets,
                e.reps,
                e.equipment
            );
        }
    }
}
