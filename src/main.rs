use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wincon::analysis::analyze;
use wincon::api::{build_router, state::AppState};
use wincon::calculate::awards::{format_duration_from_hours, format_percent};
use wincon::config::AppConfig;
use wincon::extract::extract_clan_fame_threshold;
use wincon::fetch::{ClanApiClient, ClanDataSource};
use wincon::models::{ClanReport, Tag};
use wincon::sync::{CancelSignal, LoaderConfig, SnapshotLoader};

#[derive(Parser)]
#[command(name = "wincon")]
#[command(about = "Clan war analytics: member stats, MVP, awards and war progression")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml", global = true)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a clan and print its report
    Analyze {
        /// Clan tag, with or without '#'
        tag: String,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract the fame requirement from a clan description
    Threshold {
        /// Description text
        text: String,
    },

    /// Start the API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn source_from_config(config: &AppConfig) -> Result<Arc<dyn ClanDataSource>> {
    let client = ClanApiClient::new(&config.upstream).context("Failed to build API client")?;
    Ok(Arc::new(client))
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map(format_percent).unwrap_or_else(|| "-".to_string())
}

fn print_report(report: &ClanReport) {
    println!("\n=== {} ({}) ===", report.clan.name, report.clan.tag);
    println!("War trophies:     {}", report.clan.clan_war_trophies);
    println!("Members:          {}", report.members.len());
    match report.fame_threshold {
        Some(threshold) => println!("Fame requirement: {}", threshold),
        None => println!("Fame requirement: not stated"),
    }
    println!(
        "Active war:       {}",
        if report.has_active_war { "yes" } else { "no" }
    );
    if let Some(avg) = report.average_placement {
        println!("Avg placement:    {:.2}", avg);
    }

    if let Some(mvp) = &report.mvp {
        println!(
            "\nMVP: {} (score {:.3}, avg fame {:.0}, win rate {}, donations {})",
            mvp.name,
            mvp.mvp_score,
            mvp.average_war_fame,
            format_rate(mvp.win_rate),
            mvp.donations
        );
    }

    if !report.current_war_rankings.is_empty() {
        println!("\nCurrent war:");
        for entry in &report.current_war_rankings {
            println!("  {:>2}. {:<20} {:>6}", entry.rank, entry.name, entry.fame);
        }
    }

    println!("\nAwards:");
    for award in &report.awards {
        if award.is_empty() {
            println!("  {}: {}", award.title, award.empty_message);
            continue;
        }
        println!("  {}:", award.title);
        for placement in &award.placements {
            let members: Vec<String> = placement
                .members
                .iter()
                .map(|m| format!("{} ({})", m.name, m.score_label))
                .collect();
            println!("    {}. {}", placement.place, members.join(", "));
        }
    }

    println!("\nMembers:");
    for member in &report.members {
        let last = if member.has_battled() {
            format_duration_from_hours(member.hours_since_last_battle)
        } else {
            "never".to_string()
        };
        println!(
            "  {:<20} fame {:>7.1}  win {:>6}  battles {:>3}  last {}",
            member.name,
            member.average_war_fame,
            format_rate(member.win_rate),
            member.counted_battles,
            last
        );
    }

    if let (Some(first), Some(last)) = (
        report.trophy_progression.first(),
        report.trophy_progression.last(),
    ) {
        println!(
            "\nWar trophies {} → {}: {} → {}",
            first.label, last.label, first.clan_war_trophies, last.clan_war_trophies
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_tracing(&level, cli.json_logs);

    tracing::info!("Starting wincon v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Analyze { tag, json } => {
            let tag = Tag::normalize(&tag);
            if tag.is_empty() {
                bail!("Clan tag is empty after normalization");
            }

            let cancel = CancelSignal::new();
            let loader = SnapshotLoader::new(
                source_from_config(&config)?,
                LoaderConfig::from(&config.upstream),
            )
            .with_cancel_signal(cancel.clone());

            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling load");
                    cancel.cancel();
                }
            });

            let snapshot = loader.load(&tag).await?;
            let report = analyze(&snapshot, chrono::Utc::now());

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Threshold { text } => match extract_clan_fame_threshold(Some(&text)) {
            Some(threshold) => println!("{}", threshold),
            None => println!("No fame requirement found"),
        },
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(
                source_from_config(&config)?,
                LoaderConfig::from(&config.upstream),
            );
            let app = build_router(state, &config.server.cors_origin);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
