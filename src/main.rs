use anyhow::Result;
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use meet_standings::output;
use meet_standings::scoring::{self, Taxonomy};
use meet_standings::source::SnapshotSource;

const EXIT_SUCCESS: i32 = 0;
const EXIT_SOURCE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List meets recorded for a year
    Meets {
        /// Meet year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Team standings for one meet and gender
    Standings {
        /// Meet key, as shown by `meets`
        meet: String,
        #[arg(long)]
        year: Option<i32>,
        /// Gender/division partition (defaults to the configured gender)
        #[arg(long)]
        gender: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Per-event scorers for one team
    Breakdown {
        meet: String,
        /// Team name, abbreviation or id
        team: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        gender: Option<String>,
    },
    /// Event progress by status
    Stats {
        meet: String,
        #[arg(long)]
        year: Option<i32>,
        /// Partitions to summarize (defaults to every partition of the meet)
        #[arg(long)]
        gender: Vec<String>,
    },
    /// Reload the snapshot and redraw standings on an interval
    Watch {
        meet: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        gender: Option<String>,
        /// Refresh interval, e.g. "30s" or "2m"
        #[arg(long, default_value = "30s")]
        interval: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "meet-standings")]
#[command(about = "Live team standings for track & field meets", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/meet-standings/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    meet_standings::logging::init_logging(meet_standings::logging::default_level(cli.verbose));
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match meet_standings::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate taxonomy at startup
    let taxonomy = config.taxonomy();
    if let Err(errors) = scoring::validate_taxonomy(&taxonomy) {
        eprintln!("Taxonomy config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let source = SnapshotSource::new(config.data_dir());
    tracing::debug!(data_dir = %source.root().display(), "using snapshot tree");

    let result = match cli.command {
        Commands::Meets { year } => list_meets(&source, year).await,
        Commands::Standings {
            meet,
            year,
            gender,
            format,
        } => {
            let gender = gender.unwrap_or_else(|| config.default_gender().to_string());
            show_standings(&source, &taxonomy, &meet, year, &gender, format).await
        }
        Commands::Breakdown {
            meet,
            team,
            year,
            gender,
        } => {
            let gender = gender.unwrap_or_else(|| config.default_gender().to_string());
            show_breakdown(&source, &taxonomy, &meet, &team, year, &gender).await
        }
        Commands::Stats { meet, year, gender } => {
            show_stats(&source, &taxonomy, &meet, year, gender).await
        }
        Commands::Watch {
            meet,
            year,
            gender,
            interval,
        } => {
            let interval = match humantime::parse_duration(&interval) {
                Ok(d) if !d.is_zero() => d,
                Ok(_) => {
                    eprintln!("Invalid interval '{}': must be greater than zero", interval);
                    std::process::exit(EXIT_CONFIG);
                }
                Err(e) => {
                    eprintln!("Invalid interval '{}': {}", interval, e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            let gender = gender.unwrap_or_else(|| config.default_gender().to_string());
            watch(&source, &taxonomy, &meet, year, &gender, interval).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_SOURCE);
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

fn resolve_year(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| chrono::Local::now().year())
}

async fn list_meets(source: &SnapshotSource, year: Option<i32>) -> Result<()> {
    let meets = source.list_meets(resolve_year(year)).await?;
    println!("{}", output::format_meet_list(&meets, output::should_use_colors()));
    Ok(())
}

async fn show_standings(
    source: &SnapshotSource,
    taxonomy: &Taxonomy,
    meet: &str,
    year: Option<i32>,
    gender: &str,
    format: OutputFormat,
) -> Result<()> {
    let gender = meet_standings::source::normalize_gender(gender);
    let snapshot = source
        .load_snapshot(resolve_year(year), meet, &[gender.clone()])
        .await?;
    let standings = scoring::compute_standings(snapshot.events(&gender), taxonomy);

    match format {
        OutputFormat::Table => println!(
            "{}",
            output::format_standings_table(&standings, output::should_use_colors())
        ),
        OutputFormat::Tsv => println!("{}", output::format_standings_tsv(&standings)),
        OutputFormat::Json => println!(
            "{}",
            output::format_standings_json(&snapshot, &gender, &standings)?
        ),
    }
    Ok(())
}

async fn show_breakdown(
    source: &SnapshotSource,
    taxonomy: &Taxonomy,
    meet: &str,
    team: &str,
    year: Option<i32>,
    gender: &str,
) -> Result<()> {
    let gender = meet_standings::source::normalize_gender(gender);
    let snapshot = source
        .load_snapshot(resolve_year(year), meet, &[gender.clone()])
        .await?;
    let standings = scoring::compute_standings(snapshot.events(&gender), taxonomy);

    let Some(standing) = standings.team(team) else {
        anyhow::bail!("No team '{}' in {} {} standings", team, meet, gender);
    };
    println!(
        "{}",
        output::format_team_breakdown(standing, &standings, output::should_use_colors())
    );
    Ok(())
}

async fn show_stats(
    source: &SnapshotSource,
    taxonomy: &Taxonomy,
    meet: &str,
    year: Option<i32>,
    genders: Vec<String>,
) -> Result<()> {
    let year = resolve_year(year);
    let genders = if genders.is_empty() {
        source.list_genders(year, meet).await?
    } else {
        genders
    };
    let snapshot = source.load_snapshot(year, meet, &genders).await?;

    let use_colors = output::should_use_colors();
    let sections: Vec<String> = snapshot
        .partitions
        .iter()
        .map(|(gender, events)| {
            output::format_stats(gender, &scoring::summarize(events, taxonomy), use_colors)
        })
        .collect();
    if sections.is_empty() {
        println!("No events found.");
    } else {
        println!("{}", sections.join("\n\n"));
    }
    Ok(())
}

async fn watch(
    source: &SnapshotSource,
    taxonomy: &Taxonomy,
    meet: &str,
    year: Option<i32>,
    gender: &str,
    interval: Duration,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A failed reload keeps the last output on screen; try again next tick
                let refreshed =
                    show_standings(source, taxonomy, meet, year, gender, OutputFormat::Table).await;
                if let Err(e) = refreshed {
                    eprintln!("Refresh failed: {:#}", e);
                }
                println!(
                    "Updated {} (every {})",
                    chrono::Local::now().format("%H:%M:%S"),
                    humantime::format_duration(interval)
                );
                println!();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted, stopping watch");
                return Ok(());
            }
        }
    }
}
