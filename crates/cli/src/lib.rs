pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use tripbasket_core::basket::DEFAULT_RECOMMENDATION_LIMIT;
use tripbasket_core::config::{AppConfig, LogFormat};
use tripbasket_core::TravelerContext;

use crate::commands::GlobalArgs;

#[derive(Debug, Parser)]
#[command(
    name = "tripbasket",
    about = "Travel market-basket analysis CLI",
    long_about = "Synthesize travel bookings, mine association rules, and query recommendations, bundles, and analytics.",
    after_help = "Examples:\n  tripbasket --seed 42 rules --limit 5\n  tripbasket recommend --destination mauritius --like snorkeling\n  tripbasket season --month 7"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Seed for reproducible synthesis (random when omitted)")]
    seed: Option<u64>,
    #[arg(long, global = true, help = "Path to a tripbasket.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List mined association rules ranked by lift")]
    Rules {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    #[command(about = "Recommend items for a traveler profile")]
    Recommend {
        #[arg(long)]
        destination: Option<String>,
        #[arg(long = "like", help = "Liked activity (repeatable)")]
        liked_activities: Vec<String>,
        #[arg(long = "food", help = "Liked food experience (repeatable)")]
        liked_food: Vec<String>,
        #[arg(long = "bucket", help = "Bucket-list entry (repeatable)")]
        bucket_list: Vec<String>,
        #[arg(long = "visited", help = "Previously visited destination (repeatable)")]
        visited: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_RECOMMENDATION_LIMIT)]
        limit: usize,
    },
    #[command(about = "Suggest bundles and the strongest rule for selected items")]
    Bundle {
        #[arg(long = "item", help = "Selected item id or name (repeatable)")]
        items: Vec<String>,
    },
    #[command(about = "Look up a catalog item by id or name")]
    Item { key: String },
    #[command(about = "Show a customer segment and its rules")]
    Segment { id: String },
    #[command(about = "Show the season covering a month and its rules")]
    Season {
        #[arg(long, help = "Month 1-12 (defaults to the current month)")]
        month: Option<u32>,
    },
    #[command(about = "Show a geographic region and its rules")]
    Geo { region: String },
    #[command(about = "Summarize rules, sequences, segments, and categories")]
    Analytics,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let args = GlobalArgs { config_path: cli.config, seed: cli.seed };

    // Config errors are reported by the command itself.
    if let Ok(config) = AppConfig::load(args.load_options()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Rules { limit } => commands::rules::run(&args, limit),
        Command::Recommend { destination, liked_activities, liked_food, bucket_list, visited, limit } => {
            let mut context = TravelerContext::new()
                .with_liked_activities(liked_activities)
                .with_liked_food(liked_food)
                .with_bucket_list(bucket_list)
                .with_visited_destinations(visited);
            if let Some(destination) = destination {
                context = context.with_destination(destination);
            }
            commands::recommend::run(&args, &context, limit)
        }
        Command::Bundle { items } => commands::bundle::run(&args, &items),
        Command::Item { key } => commands::item::run(&key),
        Command::Segment { id } => commands::views::segment(&args, &id),
        Command::Season { month } => {
            let month = month.unwrap_or_else(|| chrono::Utc::now().month());
            commands::views::season(&args, month)
        }
        Command::Geo { region } => commands::views::geo(&args, &region),
        Command::Analytics => commands::analytics::run(&args),
        Command::Config => commands::config::run(&args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
