use clap::{Parser, Subcommand};
use fitlog_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Convert exercise logs into normalized workout records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a saved activity-feed HTML page
    Feed {
        /// Path to the saved feed HTML
        input_path: PathBuf,

        /// Where to write the JSON output
        output_path: Option<PathBuf>,
    },

    /// Fetch and convert activities from Strava
    Strava {
        /// Path to the JSON token file
        token_path: PathBuf,

        /// Where to write the JSON output
        output_path: Option<PathBuf>,
    },
}

fn main() {
    // Initialize logging
    fitlog_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => {
            let mut config = Config::load_from(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
        None => Config::load()?,
    };

    match cli.command {
        Commands::Feed {
            input_path,
            output_path,
        } => {
            let output_path = output_path.unwrap_or_else(|| config.output.feed_path.clone());
            cmd_feed(&input_path, &output_path)
        }
        Commands::Strava {
            token_path,
            output_path,
        } => {
            let output_path = output_path.unwrap_or_else(|| config.output.strava_path.clone());
            cmd_strava(&token_path, &output_path, &config)
        }
    }
}

fn cmd_feed(input_path: &Path, output_path: &Path) -> Result<()> {
    tracing::debug!("Reading feed from {:?}", input_path);
    let html = std::fs::read_to_string(input_path)?;
    let workouts = convert_feed(&html)?;

    write_workouts(output_path, &workouts)?;

    println!("✓ Converted {} workouts", workouts.len());
    println!("  Output: {}", output_path.display());
    Ok(())
}

fn cmd_strava(token_path: &Path, output_path: &Path, config: &Config) -> Result<()> {
    let tokens = read_tokens(token_path, chrono::Utc::now(), |tokens| {
        fitlog_core::strava::refresh_tokens(&config.strava, tokens)
    })?;

    let client = StravaClient::new(&config.strava, tokens.access_token);
    let activities = client.fetch_all()?;
    let workouts = aggregate(&activities)?;

    write_workouts(output_path, &workouts)?;

    println!(
        "✓ Converted {} activities into {} workouts",
        activities.len(),
        workouts.len()
    );
    println!("  Output: {}", output_path.display());
    Ok(())
}
