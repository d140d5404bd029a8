// SPDX-License-Identifier: MIT

//! Runhub CLI
//!
//! Thin wrapper around the sync pipeline: runs a full fetch, prints a
//! summary report, and optionally exports the normalized activities
//! to CSV.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runhub::{
    config::{Config, MalformedPolicy},
    error::Result,
    models::{MetricsSummary, Sport},
    services::{ActivityFilter, PipelineOutput, StravaClient, StravaPageSource, SyncPipeline, TokenProvider},
    time_utils,
};

#[derive(Parser)]
#[command(name = "runhub")]
#[command(about = "Personal Strava activity sync and analysis", long_about = None)]
struct Cli {
    /// Only include this sport type (e.g. Run, Ride, Hike)
    #[arg(long, global = true)]
    sport: Option<String>,

    /// Only include activities starting on or after this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    after: Option<String>,

    /// Only include activities starting before this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    before: Option<String>,

    /// Stop fetching after this many activities
    #[arg(long, global = true)]
    max_activities: Option<usize>,

    /// What to do with malformed records: skip or abort
    #[arg(long, global = true)]
    malformed_policy: Option<MalformedPolicyArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch activities and print a summary report
    Sync,
    /// Fetch activities and export them to CSV
    Export {
        /// Directory for the dated CSV file
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum MalformedPolicyArg {
    Skip,
    Abort,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(policy) = cli.malformed_policy {
        config.malformed_policy = match policy {
            MalformedPolicyArg::Skip => MalformedPolicy::Skip,
            MalformedPolicyArg::Abort => MalformedPolicy::Abort,
        };
    }
    if let Some(max) = cli.max_activities {
        config.fetch.max_activities = max;
    }

    let filter = build_filter(&cli)?;

    let client = StravaClient::new();
    let tokens = TokenProvider::new(client.clone(), &config);

    // Connection check before paging through the whole history.
    let access_token = tokens.access_token().await?;
    let athlete = client.get_athlete(&access_token).await?;
    tracing::info!(
        athlete_id = athlete.id,
        name = %format!("{} {}", athlete.firstname, athlete.lastname),
        "Connected to Strava"
    );

    let pipeline = SyncPipeline::new(StravaPageSource::new(client, tokens), &config);
    let output = pipeline.run(filter).await?;

    match cli.command {
        Commands::Sync => print_report(&output),
        Commands::Export { output_dir } => {
            print_report(&output);
            let path = runhub::services::export::export_to_dir(&output_dir, &output.activities)?;
            println!("\nSaved {} activities to {}", output.activities.len(), path.display());
        }
    }

    Ok(())
}

fn build_filter(cli: &Cli) -> Result<ActivityFilter> {
    let mut filter = ActivityFilter::default();

    if let Some(sport) = &cli.sport {
        filter.sport = Some(Sport::from_api(sport));
    }
    if let Some(after) = &cli.after {
        filter.after = Some(
            time_utils::parse_date_utc(after)
                .ok_or_else(|| anyhow::anyhow!("invalid --after date: {}", after))?,
        );
    }
    if let Some(before) = &cli.before {
        filter.before = Some(
            time_utils::parse_date_utc(before)
                .ok_or_else(|| anyhow::anyhow!("invalid --before date: {}", before))?,
        );
    }

    Ok(filter)
}

fn print_report(output: &PipelineOutput) {
    let summary: &MetricsSummary = &output.summary;

    println!("{}", "=".repeat(50));
    println!("STRAVA ACTIVITY SUMMARY");
    println!("{}", "=".repeat(50));
    println!("Total activities: {}", summary.total_activities);
    if output.skipped > 0 {
        println!("Skipped malformed records: {}", output.skipped);
    }
    if let (Some(first), Some(last)) = (summary.first_start, summary.last_start) {
        println!(
            "Date range: {} to {}",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        );
    }
    println!("Total distance: {:.1} km", summary.total_distance_m / 1000.0);
    println!(
        "Total moving time: {} (of {} elapsed)",
        time_utils::format_duration(summary.total_moving_time_s),
        time_utils::format_duration(summary.total_elapsed_time_s)
    );
    if let Some(ratio) = summary.efficiency_ratio {
        println!("Efficiency ratio: {:.2}", ratio);
    }
    if summary.total_distance_m > 0.0 {
        let pace = summary.total_moving_time_s as f64 / summary.total_distance_m;
        println!("Average pace: {} min/km", time_utils::format_pace_per_km(pace));
    }
    println!("Total elevation gain: {:.0} m", summary.total_elevation_gain_m);
    println!("Activities with heart rate: {}", summary.activities_with_hr);

    if !summary.activities_by_sport.is_empty() {
        println!("\nActivities by sport:");
        for (sport, count) in &summary.activities_by_sport {
            let distance = summary.distance_by_sport.get(sport).copied().unwrap_or(0.0);
            println!("  {:<18} {:>4} activities, {:>8.1} km", sport.to_string(), count, distance / 1000.0);
        }
    }

    if !summary.weeks.is_empty() {
        println!("\nWeekly summary:");
        println!(
            "{:<10} {:>5} {:>10} {:>10} {:>8}",
            "Week", "Count", "km", "Climb m", "Avg HR"
        );
        for (week, bucket) in &summary.weeks {
            let hr = bucket
                .mean_hr
                .map(|v| format!("{:.0}", v))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<10} {:>5} {:>10.1} {:>10.0} {:>8}",
                week.to_string(),
                bucket.activities,
                bucket.distance_m / 1000.0,
                bucket.elevation_gain_m,
                hr
            );
        }
    }
}

/// Initialize logging with env-filter overrides.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("runhub=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .with(format)
        .init();
}
