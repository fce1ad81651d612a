use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use forgewatch::alerts::{AlertBoard, AlertKind};
use forgewatch::assets::{AssetFilter, AssetKind, AssetStatus, AssetSummary};
use forgewatch::config::{LoggingConfig, SimConfig};
use forgewatch::dashboard::{FaultScanner, KEY_METRICS};
use forgewatch::faults::{FaultFilter, FaultSeverity, FaultStats, FaultType};
use forgewatch::telemetry::percent_display;
use forgewatch::Simulator;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "forgewatch",
    about = "Synthetic predictive-maintenance telemetry for manufacturing dashboards",
    version,
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample one snapshot of the live sensor channels
    Snapshot {
        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Generate the forecast time series
    Series {
        /// Hours of history
        #[arg(long, default_value = "24")]
        hours: u32,

        /// Minutes between points
        #[arg(long, default_value = "30")]
        interval: u32,

        #[arg(long)]
        json: bool,
    },

    /// List monitored assets
    Assets {
        /// Case-insensitive match on name or ID
        #[arg(long, default_value = "")]
        search: String,

        /// legacy or modern
        #[arg(long = "type")]
        kind: Option<AssetKind>,

        /// operational, warning, critical or maintenance
        #[arg(long)]
        status: Option<AssetStatus>,

        #[arg(long)]
        json: bool,
    },

    /// List one batch of vision micro-faults
    Faults {
        /// thermal, vibration or structural
        #[arg(long = "type")]
        kind: Option<FaultType>,

        /// low, medium, high or critical
        #[arg(long)]
        severity: Option<FaultSeverity>,

        #[arg(long)]
        json: bool,
    },

    /// Show supervisor alerts
    Alerts {
        /// emergency, warning or info
        #[arg(long = "type")]
        kind: Option<AlertKind>,

        /// Acknowledge an alert by ID (repeatable)
        #[arg(long = "ack")]
        ack: Vec<String>,

        /// Acknowledge every alert
        #[arg(long)]
        ack_all: bool,

        #[arg(long)]
        json: bool,
    },

    /// Run a simulated vision scan
    Scan {
        #[arg(long)]
        json: bool,
    },

    /// Print the case-study key metrics
    Metrics {
        #[arg(long)]
        json: bool,
    },

    /// Run the live overview loops
    Watch {
        /// Stop after this many seconds (runs until ctrl-c when omitted)
        #[arg(long)]
        seconds: Option<u64>,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    // Logs go to stderr so --json output stays parseable.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = SimConfig::resolve(cli.config.as_deref())?;
    init_tracing(&cfg.logging);

    let sim = Simulator::new(cfg.simulator.seed);

    match cli.command {
        Commands::Snapshot { json } => {
            let r = sim.current_readings();
            if json {
                print_json(&r)?;
            } else {
                println!("\nforgewatch Live Snapshot");
                println!("{:<28} | {:>10} | Status", "Channel", "Value");
                println!("{:-<28}-|-{:->10}-|-{:-<10}", "", "", "");
                println!(
                    "{:<28} | {:>7.1} °C | {}",
                    "Heat Signatures (Thermal)", r.temperature.value, r.temperature.status
                );
                println!(
                    "{:<28} | {:>5.2} mm/s | {}",
                    "Vibration Analysis", r.vibration.value, r.vibration.status
                );
                println!(
                    "{:<28} | {:>8.1} % | {}",
                    "Visual Structural Health", r.structural.value, r.structural.status
                );
                println!(
                    "{:<28} | {:>8} % | {}",
                    "Overall System Score",
                    percent_display(r.overall_health),
                    forgewatch::telemetry::health_status(r.overall_health),
                );
                println!();
            }
        }
        Commands::Series { hours, interval, json } => {
            let series = sim.time_series(hours, interval)?;
            if json {
                print_json(&series)?;
            } else {
                println!(
                    "{:<8} | {:>7} | {:>9} | {:>6} | {:>8} | {:>10}",
                    "Time", "Temp", "Temp Fcst", "Vib", "Vib Fcst", "Structural"
                );
                println!(
                    "{:-<8}-|-{:->7}-|-{:->9}-|-{:->6}-|-{:->8}-|-{:->10}",
                    "", "", "", "", "", ""
                );
                for ((t, v), s) in series
                    .temperature
                    .iter()
                    .zip(&series.vibration)
                    .zip(&series.structural)
                {
                    println!(
                        "{:<8} | {:>7.1} | {:>9.1} | {:>6.2} | {:>8.2} | {:>10.1}",
                        t.time, t.value, t.predicted, v.value, v.predicted, s.value
                    );
                }
            }
        }
        Commands::Assets { search, kind, status, json } => {
            let assets = sim.assets();
            let filter = AssetFilter { search, kind, status };
            let shown = filter.apply(&assets);
            if json {
                print_json(&shown)?;
            } else {
                println!(
                    "{:<10} | {:<28} | {:<7} | {:>6} | {:>14} | {:<11} | Location",
                    "ID", "Name", "Type", "Health", "Maintenance", "Status"
                );
                println!(
                    "{:-<10}-|-{:-<28}-|-{:-<7}-|-{:->6}-|-{:->14}-|-{:-<11}-|-{:-<20}",
                    "", "", "", "", "", "", ""
                );
                for a in &shown {
                    println!(
                        "{:<10} | {:<28} | {:<7} | {:>5}% | {:>9} days | {:<11} | {}",
                        a.id,
                        a.name,
                        a.kind.as_str(),
                        percent_display(a.health_score),
                        a.days_until_maintenance,
                        a.status.as_str(),
                        a.location,
                    );
                }
                let summary = AssetSummary::from_assets(&assets);
                println!(
                    "\n{} of {} shown. Operational: {}  Warning: {}  Maintenance: {}",
                    shown.len(),
                    summary.total,
                    summary.operational,
                    summary.warning,
                    summary.maintenance,
                );
            }
        }
        Commands::Faults { kind, severity, json } => {
            let faults = sim.micro_faults();
            let filter = FaultFilter { fault_type: kind, severity };
            let shown = filter.apply(&faults);
            if json {
                print_json(&shown)?;
            } else {
                print_fault_table(shown.iter().copied());
                let stats = FaultStats::from_faults(&faults);
                println!(
                    "\nThermal: {}  Vibration: {}  Structural: {}  Critical: {}",
                    stats.thermal, stats.vibration, stats.structural, stats.critical
                );
            }
        }
        Commands::Alerts { kind, ack, ack_all, json } => {
            let mut board = AlertBoard::new(chrono::Utc::now());
            for id in &ack {
                if !board.acknowledge(id) {
                    tracing::warn!(alert = %id, "No alert with that ID");
                }
            }
            if ack_all {
                board.acknowledge_all();
            }

            let shown = board.filtered(kind);
            if json {
                print_json(&shown)?;
            } else {
                println!(
                    "{:<9} | {:<9} | {:<40} | {:<7} | {:>5} | Ack",
                    "ID", "Type", "Title", "Machine", "Risk"
                );
                println!(
                    "{:-<9}-|-{:-<9}-|-{:-<40}-|-{:-<7}-|-{:->5}-|-{:-<3}",
                    "", "", "", "", "", ""
                );
                for a in &shown {
                    println!(
                        "{:<9} | {:<9} | {:<40} | {:<7} | {:>4}% | {}",
                        a.id,
                        a.kind.as_str(),
                        a.title,
                        a.machine_id,
                        a.failure_probability,
                        if a.acknowledged { "yes" } else { "no" },
                    );
                }
                let counts = board.counts();
                println!(
                    "\nTotal: {}  Unacknowledged: {}  Emergency: {}  Warning: {}  Info: {}",
                    counts.total,
                    counts.unacknowledged,
                    counts.emergency,
                    counts.warning,
                    counts.info,
                );
            }
        }
        Commands::Scan { json } => {
            let scanner = FaultScanner::new(sim, cfg.cadence.scan_delay());
            if !json {
                println!("Scanning...");
            }
            let report = scanner.scan().await?;
            if json {
                print_json(&report)?;
            } else {
                println!("Scan {} complete.", report.id);
                print_fault_table(report.faults.iter());
            }
        }
        Commands::Metrics { json } => {
            if json {
                print_json(&KEY_METRICS)?;
            } else {
                println!("Downtime Reduction : {}%", KEY_METRICS.downtime_reduction);
                println!("Cost Savings       : {}%", KEY_METRICS.cost_savings);
                println!("Safety Increase    : {}%", KEY_METRICS.safety_increase);
                println!("Inference Accuracy : {}%", KEY_METRICS.inference_accuracy);
                println!("Assets Monitored   : {}", KEY_METRICS.assets_monitored);
                println!("Alerts Processed   : {}", KEY_METRICS.alerts_processed);
            }
        }
        Commands::Watch { seconds } => {
            tracing::info!(?seconds, "Starting live overview");
            forgewatch::watch(&cfg, seconds.map(Duration::from_secs)).await?;
        }
    }

    Ok(())
}

fn print_fault_table<'a>(faults: impl Iterator<Item = &'a forgewatch::faults::MicroFault>) {
    println!(
        "{:<10} | {:<8} | {:<10} | {:<8} | {:<40} | Confidence",
        "ID", "Time", "Type", "Severity", "Description"
    );
    println!("{:-<10}-|-{:-<8}-|-{:-<10}-|-{:-<8}-|-{:-<40}-|-{:-<10}", "", "", "", "", "", "");
    for f in faults {
        println!(
            "{:<10} | {:<8} | {:<10} | {:<8} | {:<40} | {}%",
            f.id,
            f.timestamp.with_timezone(&Local).format("%H:%M"),
            f.fault_type.as_str(),
            f.severity.as_str(),
            f.description,
            f.confidence,
        );
    }
}
