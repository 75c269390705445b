//! CLI handlers for `fitcoach user` subcommands.
//!
//! - `fitcoach user create <name> --password .. --age .. --weight .. --height ..`
//! - `fitcoach user show [user]`   -- show one user or list all
//! - `fitcoach user update <user> --age .. --weight .. --height .. [--level ..]`
//! - `fitcoach user assign-coach <user> <coach>`

use anyhow::Result;
use sqlx::PgPool;

use fitcoach_core::account::{self, UserSignup};
use fitcoach_core::plan;
use fitcoach_db::models::User;
use fitcoach_db::queries::users as user_queries;

use crate::UserCommands;
use crate::resolve::{resolve_coach, resolve_user};

pub async fn run_user_command(command: UserCommands, pool: &PgPool) -> Result<()> {
    match command {
        UserCommands::Create {
            name,
            password,
            age,
            weight,
            height,
            level,
            calories,
            goal,
        } => {
            let signup = UserSignup {
                name,
                password,
                age,
                weight,
                height,
                fitness_level: level,
                daily_calories: calories,
                goal,
            };
            let user = account::create_user(pool, &signup).await?;
            println!("User created.");
            println!();
            print_user(&user);
            Ok(())
        }
        UserCommands::Show { user } => match user {
            Some(input) => {
                let user = resolve_user(pool, &input).await?;
                print_user(&user);
                Ok(())
            }
            None => cmd_list(pool).await,
        },
        UserCommands::Update {
            user,
            age,
            weight,
            height,
            level,
        } => {
            let existing = resolve_user(pool, &user).await?;
            let updated =
                plan::update_profile(pool, existing.id, age, weight, height, level).await?;
            println!("User data updated.");
            println!();
            print_user(&updated);
            Ok(())
        }
        UserCommands::AssignCoach { user, coach } => {
            let user = resolve_user(pool, &user).await?;
            let coach = resolve_coach(pool, &coach).await?;
            account::assign_coach(pool, user.id, coach.id).await?;
            println!("Coach {} assigned to {}.", coach.name, user.name);
            Ok(())
        }
    }
}

async fn cmd_list(pool: &PgPool) -> Result<()> {
    let users = user_queries::list_users(pool).await?;
    if users.is_empty() {
        println!("No users found. Use `fitcoach user create` to add one.");
        return Ok(());
    }

    let name_w = users.iter().map(|u| u.name.len()).max().unwrap_or(4).max(4);
    println!(
        "{:<36}  {:<name_w$}  {:>4}  {:>6}  {:>6}  {:>5}  LEVEL",
        "ID", "NAME", "AGE", "KG", "CM", "BMI"
    );
    for u in &users {
        println!(
            "{:<36}  {:<name_w$}  {:>4}  {:>6.1}  {:>6.1}  {:>5.1}  {}",
            u.id, u.name, u.age, u.weight, u.height, u.bmi, u.fitness_level
        );
    }
    Ok(())
}

pub(crate) fn print_user(user: &User) {
    println!("  ID:             {}", user.id);
    println!("  Name:           {}", user.name);
    println!("  Age:            {}", user.age);
    println!("  Weight:         {:.1} kg", user.weight);
    println!("  Height:         {:.1} cm", user.height);
    println!("  BMI:            {:.1}", user.bmi);
    println!("  Fitness level:  {}", user.fitness_level);
    if let Some(coach_id) = user.coach_id {
        println!("  Coach:          {coach_id}");
    }
    if let Some(calories) = user.daily_calories {
        println!("  Daily calories: {calories}");
    }
    if let Some(ref goal) = user.goal {
        println!("  Goal:           {goal}");
    }
}
