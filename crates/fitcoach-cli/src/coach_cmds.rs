//! CLI handlers for `fitcoach coach` subcommands.

use anyhow::Result;
use sqlx::PgPool;

use fitcoach_core::account::{self, CoachSignup};
use fitcoach_db::queries::coaches as coach_queries;

use crate::CoachCommands;
use crate::resolve::resolve_coach;

pub async fn run_coach_command(command: CoachCommands, pool: &PgPool) -> Result<()> {
    match command {
        CoachCommands::Create {
            name,
            password,
            specialization,
            age,
            weight,
            height,
            experience,
        } => {
            let signup = CoachSignup {
                name,
                password,
                specialization,
                age,
                weight,
                height,
                experience_level: experience,
            };
            let coach = account::create_coach(pool, &signup).await?;
            println!("Coach created.");
            println!();
            println!("  ID:   {}", coach.id);
            println!("  Name: {}", coach.name);
            if let Some(ref s) = coach.specialization {
                println!("  Specialization: {s}");
            }
            Ok(())
        }
        CoachCommands::List => {
            let coaches = coach_queries::list_coaches(pool).await?;
            if coaches.is_empty() {
                println!("No coaches found.");
                return Ok(());
            }
            let name_w = coaches.iter().map(|c| c.name.len()).max().unwrap_or(4).max(4);
            println!("{:<36}  {:<name_w$}  SPECIALIZATION", "ID", "NAME");
            for c in &coaches {
                println!(
                    "{:<36}  {:<name_w$}  {}",
                    c.id,
                    c.name,
                    c.specialization.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
        CoachCommands::Students { coach } => {
            let coach = resolve_coach(pool, &coach).await?;
            let students = account::students_of(pool, coach.id).await?;
            if students.is_empty() {
                println!("{} has no students.", coach.name);
                return Ok(());
            }
            println!("Students of {}:", coach.name);
            for s in &students {
                println!("  {}  {} ({})", s.id, s.name, s.fitness_level);
            }
            Ok(())
        }
    }
}
