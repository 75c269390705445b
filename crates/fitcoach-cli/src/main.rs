mod coach_cmds;
mod config;
mod exercise_cmds;
mod plan_cmds;
mod resolve;
mod serve_cmd;
mod user_cmds;

#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use fitcoach_core::catalog;
use fitcoach_db::config::DbConfig;
use fitcoach_db::models::{BodyRegion, FitnessLevel};
use fitcoach_db::pool;

use config::FitcoachConfig;

#[derive(Parser)]
#[command(name = "fitcoach", about = "Fitness coaching backend and workout plan generator")]
struct Cli {
    /// Database URL (overrides FITCOACH_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fitcoach config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create and migrate the fitcoach database
    DbInit {
        /// Also load the built-in exercise library
        #[arg(long)]
        seed_catalog: bool,
    },
    /// User accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Coach accounts
    Coach {
        #[command(subcommand)]
        command: CoachCommands,
    },
    /// Exercise catalog
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },
    /// Workout plans
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides FITCOACH_BIND and config)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides FITCOACH_PORT and config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a user
    Create {
        /// Unique user name
        name: String,
        #[arg(long)]
        password: String,
        /// Age in years
        #[arg(long)]
        age: i32,
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
        /// Height in centimetres
        #[arg(long)]
        height: f64,
        /// beginner, intermediate, or advanced
        #[arg(long, default_value_t = FitnessLevel::Intermediate)]
        level: FitnessLevel,
        /// Daily calorie target
        #[arg(long)]
        calories: Option<i32>,
        #[arg(long)]
        goal: Option<String>,
    },
    /// Show a user (or list all)
    Show {
        /// User ID or name (omit to list all)
        user: Option<String>,
    },
    /// Update measurements; BMI is recomputed
    Update {
        /// User ID or name
        user: String,
        #[arg(long)]
        age: i32,
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        height: f64,
        #[arg(long)]
        level: Option<FitnessLevel>,
    },
    /// Assign a coach to a user
    AssignCoach {
        /// User ID or name
        user: String,
        /// Coach ID or name
        coach: String,
    },
}

#[derive(Subcommand)]
pub enum CoachCommands {
    /// Register a coach
    Create {
        /// Unique coach name
        name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        specialization: Option<String>,
        #[arg(long)]
        age: Option<i32>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        /// Years of experience
        #[arg(long)]
        experience: Option<i32>,
    },
    /// List all coaches
    List,
    /// List the users assigned to a coach
    Students {
        /// Coach ID or name
        coach: String,
    },
}

#[derive(Subcommand)]
pub enum ExerciseCommands {
    /// List catalog exercises
    List {
        /// Only show one region
        #[arg(long)]
        region: Option<BodyRegion>,
    },
    /// Add one exercise to the catalog
    Add {
        name: String,
        #[arg(long)]
        region: BodyRegion,
        #[arg(long)]
        sets: i32,
        #[arg(long)]
        reps: i32,
        #[arg(long)]
        equipment: Option<String>,
    },
    /// Import (upsert) exercises from a catalog TOML file
    Import {
        /// Path to the catalog TOML file
        file: String,
    },
    /// Load the built-in exercise library
    Seed,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Generate and store a plan for a user
    Generate {
        /// User ID or name
        user: String,
        /// Number of days (1-365)
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Seed for a reproducible plan
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show a user's latest stored plan
    Show {
        /// User ID or name
        user: String,
    },
    /// Generate a plan and write it as an xlsx workbook (not stored)
    Export {
        /// User ID or name
        user: String,
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Output file path
        #[arg(long)]
        output: String,
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Execute the `fitcoach init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_owned(),
        },
        server: config::ServerSection::default(),
        generator: Default::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  server       = {}:{}", cfg.server.bind, cfg.server.port);
    println!();
    println!("Next: run `fitcoach db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `fitcoach db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>, seed_catalog: bool) -> anyhow::Result<()> {
    let resolved = FitcoachConfig::resolve(cli_db_url)?;

    println!("Initializing fitcoach database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    if seed_catalog {
        let count = catalog::import_catalog(&db_pool, &catalog::default_catalog()).await?;
        println!("Seeded {count} exercises.");
    }

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("fitcoach db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit { seed_catalog } => {
            cmd_db_init(cli.database_url.as_deref(), seed_catalog).await?;
        }
        Commands::User { command } => {
            let resolved = FitcoachConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = user_cmds::run_user_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Coach { command } => {
            let resolved = FitcoachConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = coach_cmds::run_coach_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Exercise { command } => {
            let resolved = FitcoachConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = exercise_cmds::run_exercise_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { command } => {
            let resolved = FitcoachConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result =
                plan_cmds::run_plan_command(command, &db_pool, &resolved.generator).await;
            db_pool.close().await;
            result?;
        }
        Commands::Serve { bind, port } => {
            let resolved = FitcoachConfig::resolve(cli.database_url.as_deref())?;
            let server = resolved.server_with_overrides(bind.as_deref(), port);
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = serve_cmd::run_serve(
                db_pool.clone(),
                resolved.generator,
                &server.bind,
                server.port,
            )
            .await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
