use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use threatglobe::feed::FeedClient;
use threatglobe::intel::geo::CoordinateTable;
use threatglobe::intel::severity::{self, ATTACK_VOLUME};
use threatglobe::intel::{self, iso};
use threatglobe::settings::Settings;
use threatglobe::terminal::Terminal;
use threatglobe::viz;
use threatglobe::viz::globe::GlobeOptions;
use threatglobe::viz::heatmap::HeatmapOptions;

const DEFAULT_BLACKLIST_URL: &str = "http://localhost:8080/api/v2/blacklist/ips";
const DEFAULT_REPORT_URL: &str = "http://localhost:8080/api/v2/suspicious/report";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Parser)]
#[command(name = "threatglobe")]
#[command(version = "0.2.0")]
#[command(about = "Terminal threat-intelligence dashboard: 3D globe and world heatmap", long_about = None)]
struct Cli {
    /// Blacklist feed URL
    #[arg(long)]
    blacklist_url: Option<String>,

    /// Suspicious-IP report feed URL
    #[arg(long)]
    report_url: Option<String>,

    /// Path to the country centroid JSON file
    #[arg(long)]
    coords: Option<PathBuf>,

    /// Fetch the country centroid table from a URL instead
    #[arg(long)]
    coords_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rotating 3D globe with threat markers and relation arcs
    Globe {
        /// Animation speed (seconds per frame)
        #[arg(short, long, default_value = "0.03")]
        time: f32,

        /// Random seed for demo-mode traffic
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// 2D world heatmap with per-country severity
    Heatmap {
        /// Animation speed (seconds per frame)
        #[arg(short, long, default_value = "0.05")]
        time: f32,
    },

    /// Fetch feeds once and print the aggregates
    Stats {
        /// How many countries to list
        #[arg(short = 'n', long, default_value = "5")]
        top: usize,
    },
}

fn main() -> io::Result<()> {
    env_logger::init();

    if let Err(e) = iso::verify_table() {
        eprintln!("startup check failed: {}", e);
        return Err(io::Error::new(io::ErrorKind::InvalidData, e));
    }

    let cli = Cli::parse();
    let cfg = Settings::load();

    let timeout = Duration::from_secs(
        cli.timeout
            .or(cfg.feeds.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    );
    let client = FeedClient::new(
        cli.blacklist_url
            .or(cfg.feeds.blacklist_url)
            .unwrap_or_else(|| DEFAULT_BLACKLIST_URL.to_string()),
        cli.report_url
            .or(cfg.feeds.report_url)
            .unwrap_or_else(|| DEFAULT_REPORT_URL.to_string()),
        timeout,
    );

    let coords = match cli.coords_url.or(cfg.geo.coordinates_url) {
        Some(url) => client.fetch_coordinates(&url).unwrap_or_else(|e| {
            log::warn!("coordinate fetch failed: {}; markers disabled", e);
            CoordinateTable::empty()
        }),
        None => CoordinateTable::load(
            cli.coords
                .or(cfg.geo.coordinates_file)
                .as_deref(),
        ),
    };

    match cli.command {
        Commands::Globe { time, seed } => {
            let mut term = Terminal::new()?;
            let opts = GlobeOptions {
                time_step: time,
                seed,
            };
            viz::globe::run(&mut term, &client, &coords, &opts)?;
        }
        Commands::Heatmap { time } => {
            let mut term = Terminal::new()?;
            let opts = HeatmapOptions { time_step: time };
            viz::heatmap::run(&mut term, &client, &coords, &opts)?;
        }
        Commands::Stats { top } => {
            run_stats(&client, &coords, top);
        }
    }

    Ok(())
}

/// One-shot pipeline run, printed plainly. Exercises exactly what the
/// interactive views consume.
fn run_stats(client: &FeedClient, coords: &CoordinateTable, top: usize) {
    match client.fetch_blacklist() {
        Ok(entries) => {
            let summary = intel::aggregate::ingest_blacklist(
                entries
                    .iter()
                    .map(|e| e.country_code.as_deref().unwrap_or("")),
            );
            println!(
                "Blacklist feed: {} observations across {} countries",
                summary.total,
                summary.counts.len()
            );
            for (code, count) in intel::aggregate::top_n(&summary.counts, top) {
                let band = severity::classify(count as f32, ATTACK_VOLUME);
                println!("  {:<4} {:>6}  {}", code, count, band.label);
            }
        }
        Err(e) => println!("Blacklist feed: no data ({})", e),
    }

    println!();

    match client.fetch_report_answer() {
        Ok(answer) => {
            let snapshot = intel::aggregate::ingest_report(&answer, coords);
            if snapshot.is_empty() {
                println!("Suspicious-IP report: no records found");
                return;
            }
            println!(
                "Suspicious-IP report: {} observations across {} countries, {} arcs",
                snapshot.total_observations(),
                snapshot.aggregates.len(),
                snapshot.arcs.len()
            );
            for (code, count) in snapshot.top(top) {
                let band = severity::classify(count as f32, ATTACK_VOLUME);
                println!("  {:<4} {:>6}  {}", code, count, band.label);
                if let Some(agg) = snapshot.aggregates.get(&code) {
                    for detail in agg.ips.iter().take(3) {
                        println!(
                            "       {} ({} -> {})",
                            detail.ip,
                            detail.role.label(),
                            detail.counterpart
                        );
                    }
                }
            }
            for arc in &snapshot.arcs {
                println!(
                    "  arc {}: {} -> {}",
                    arc.id, arc.source_name, arc.destination_name
                );
            }
        }
        Err(e) => println!("Suspicious-IP report: no data ({})", e),
    }
}
