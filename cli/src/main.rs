mod analysis;
mod commands;
mod config;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use crate::analysis::{AnalysisClient, DEFAULT_ENDPOINT};
use crate::commands::{
    cmd_add, cmd_analyze, cmd_calendar, cmd_export_entries, cmd_export_month, cmd_goal_set,
    cmd_goal_show, cmd_history, cmd_prune, cmd_summary,
};
use crate::config::Config;
use snapbite_core::tracker::Tracker;

#[derive(Parser)]
#[command(
    name = "snapbite",
    version,
    about = "A local-first nutrition tracker",
    long_about = "\nsnapbite — snap it, log it, know what you're eating.\n\nFood entries, daily macro goals, and a goal-achievement calendar,\nall stored locally."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a food entry by name (table lookup) or with explicit macros
    Add {
        /// What was eaten
        description: String,
        /// Calories (skips the lookup when given)
        #[arg(long)]
        calories: Option<f64>,
        /// Protein in grams
        #[arg(long)]
        protein: Option<f64>,
        /// Carbs in grams
        #[arg(long)]
        carbs: Option<f64>,
        /// Fat in grams
        #[arg(long)]
        fat: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send a food photo to the analysis endpoint and log the estimate
    Analyze {
        /// Path to the image file
        image: PathBuf,
        /// Analysis endpoint URL
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one day's entries and totals (defaults to today)
    Summary {
        /// Date to show (YYYY-MM-DD, today, yesterday)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show daily totals for the last N days
    History {
        /// Number of days to show
        #[arg(short, long, default_value = "7")]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage daily macro goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Show the goal-achievement calendar, streaks, and insights
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long)]
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export data as CSV
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Trim the entry ledger to today's entries (day rollover)
    Prune {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the stub analysis server (and the midnight rollover timer)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Address to bind to (default: 127.0.0.1)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Set the daily goals (macros keep their current value if omitted)
    Set {
        /// Daily calorie goal
        calories: f64,
        /// Protein goal in grams
        #[arg(long)]
        protein: Option<f64>,
        /// Carbs goal in grams
        #[arg(long)]
        carbs: Option<f64>,
        /// Fat goal in grams
        #[arg(long)]
        fat: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current goals
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Export the full entry ledger
    Entries {
        /// Output file (default: food-entries-<date>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export one month of calendar progress
    Month {
        /// Month to export (YYYY-MM, default: current month)
        month: Option<String>,
        /// Output file (default: calorie-tracker-<month>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let tracker = Tracker::open(&config.db_path)?;

    match cli.command {
        Commands::Add {
            description,
            calories,
            protein,
            carbs,
            fat,
            json,
        } => cmd_add(&tracker, &description, calories, protein, carbs, fat, json),
        Commands::Analyze {
            image,
            endpoint,
            json,
        } => {
            let client = AnalysisClient::new(endpoint);
            cmd_analyze(&tracker, &client, &image, json).await
        }
        Commands::Summary { date, json } => cmd_summary(&tracker, date, json),
        Commands::History { days, json } => cmd_history(&tracker, days, json),
        Commands::Goal { command } => match command {
            GoalCommands::Set {
                calories,
                protein,
                carbs,
                fat,
                json,
            } => cmd_goal_set(&tracker, calories, protein, carbs, fat, json),
            GoalCommands::Show { json } => cmd_goal_show(&tracker, json),
        },
        Commands::Calendar { month, json } => cmd_calendar(&tracker, month, json),
        Commands::Export { command } => match command {
            ExportCommands::Entries { out, json } => cmd_export_entries(&tracker, out, json),
            ExportCommands::Month { month, out, json } => {
                cmd_export_month(&tracker, month, out, json)
            }
        },
        Commands::Prune { json } => cmd_prune(&tracker, json),
        Commands::Serve { port, bind } => server::start_server(tracker, port, &bind).await,
    }
}
