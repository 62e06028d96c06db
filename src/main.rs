use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dojo::app::state::Route;
use dojo::{App, Catalog, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dojo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Classroom file to use instead of the built-in content
    #[arg(short, long, global = true)]
    content: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List classrooms and their exercises
    List,
    /// Open a classroom, or an exercise within it
    Open {
        /// Classroom id
        classroom: String,
        /// Exercise id
        exercise: Option<String>,
    },
    /// Check that a classroom file loads
    Check {
        /// Path to the JSON classroom file
        path: PathBuf,
    },
}

/// Send logs to a file so they do not draw over the TUI
fn init_logging() -> Result<()> {
    let log_path = Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dojo=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load classrooms from {}", path.display())),
        None => Catalog::builtin().context("Built-in classrooms are invalid"),
    }
}

fn print_catalog(catalog: &Catalog) {
    for classroom in &catalog.classrooms {
        println!("{}  {}", classroom.id, classroom.name);
        for exercise in &classroom.exercises {
            println!(
                "  {:<24} {:<36} {:<12} {} steps",
                exercise.id,
                exercise.title,
                exercise.difficulty,
                exercise.total_steps()
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = Config::load()?;
    let content_path = cli.content.clone().or_else(|| config.content_path.clone());

    match cli.command {
        Some(Commands::List) => {
            let catalog = load_catalog(content_path.as_deref())?;
            print_catalog(&catalog);
        }
        Some(Commands::Check { path }) => {
            let catalog = load_catalog(Some(&path))?;
            println!(
                "{}: {} classrooms, {} exercises",
                path.display(),
                catalog.classrooms.len(),
                catalog.exercise_count()
            );
        }
        Some(Commands::Open { classroom, exercise }) => {
            let catalog = load_catalog(content_path.as_deref())?;
            let route = Route::from_ids(Some(classroom), exercise);
            let mut app = App::new(config, catalog, route)?;
            app.run().await?;
        }
        None => {
            // Launch TUI
            let catalog = load_catalog(content_path.as_deref())?;
            let mut app = App::new(config, catalog, Route::Classrooms)?;
            app.run().await?;
        }
    }

    Ok(())
}
