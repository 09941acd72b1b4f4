//! CLI for the spool time-series buffers.
//!
//! Provides commands for inspecting configurations, replaying recorded
//! samples through a ring buffer, and benchmarking concurrent writers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use spool::{RegistryConfig, RingBuffer, Sample, SeriesExport, SeriesRegistry};
use tracing_subscriber::EnvFilter;

/// spool — Fixed-capacity in-memory time-series buffers.
#[derive(Parser)]
#[command(name = "spool", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Build a registry from a JSON config and list its series.
    Info {
        /// Path to the registry config file.
        config: PathBuf,
    },

    /// Feed `value[,timestamp_ms]` lines through a ring buffer and print the result.
    Replay {
        /// Input file, one sample per line.
        input: PathBuf,

        /// Buffer capacity.
        #[arg(long, default_value = "1000")]
        capacity: usize,

        /// Series name used in JSON output.
        #[arg(long, default_value = "replay")]
        series: String,

        /// Output format.
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Run a concurrent write-path benchmark against one series.
    Bench {
        /// Number of writer threads.
        #[arg(long, default_value = "4")]
        writers: usize,

        /// Samples written by each thread.
        #[arg(long, default_value = "1000000")]
        samples: u64,

        /// Buffer capacity.
        #[arg(long, default_value = "3600")]
        capacity: usize,
    },
}

/// Output format for replay results.
#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// `value,timestamp_ms` lines.
    Csv,
    /// The dashboard time-series JSON shape.
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { config } => cmd_info(&config),
        Commands::Replay {
            input,
            capacity,
            series,
            format,
        } => cmd_replay(&input, capacity, &series, &format),
        Commands::Bench {
            writers,
            samples,
            capacity,
        } => cmd_bench(writers, samples, capacity),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Implements `spool info <config>`.
fn cmd_info(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = RegistryConfig::load(config_path)?;
    let registry = SeriesRegistry::from_config(&config)?;

    println!("Config: {}", config_path.display());
    println!("Series: {}", registry.len());
    println!();

    for name in registry.list_names() {
        let buffer = registry.get(&name)?;
        println!("  {name}");
        println!("    Capacity: {}", buffer.capacity());
    }

    Ok(())
}

/// Parses one replay line. Returns `None` for blank lines and comments.
fn parse_line(line: &str, line_no: usize) -> Result<Option<Sample>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (value, timestamp) = match line.split_once(',') {
        Some((v, t)) => (v.trim(), Some(t.trim())),
        None => (line, None),
    };

    let value: f64 = value
        .parse()
        .map_err(|e| format!("line {line_no}: invalid value '{value}': {e}"))?;

    let sample = match timestamp {
        Some(t) => {
            let ms: u64 = t
                .parse()
                .map_err(|e| format!("line {line_no}: invalid timestamp '{t}': {e}"))?;
            Sample::try_from_millis(value, ms)
                .ok_or_else(|| format!("line {line_no}: timestamp out of range '{t}'"))?
        }
        None => Sample::now(value),
    };

    Ok(Some(sample))
}

/// Implements `spool replay <input>`.
fn cmd_replay(
    input: &Path,
    capacity: usize,
    series: &str,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(input)?;

    let mut samples = Vec::new();
    for (i, line) in data.lines().enumerate() {
        if let Some(sample) = parse_line(line, i + 1)? {
            samples.push(sample);
        }
    }

    let ring = RingBuffer::new(capacity)?;
    ring.add_batch(&samples);
    tracing::info!(
        read = samples.len(),
        kept = ring.len(),
        capacity,
        "replayed samples"
    );

    match format {
        OutputFormat::Csv => {
            println!("value,timestamp_ms");
            for point in ring.datapoints() {
                println!("{},{}", point.value, point.timestamp_ms);
            }
        }
        OutputFormat::Json => {
            let export = vec![SeriesExport::from_buffer(series, &ring)];
            println!("{}", serde_json::to_string_pretty(&export)?);
        }
    }

    Ok(())
}

/// Implements `spool bench`.
#[allow(clippy::cast_precision_loss)]
fn cmd_bench(writers: usize, samples: u64, capacity: usize) -> Result<(), Box<dyn std::error::Error>> {
    if writers == 0 {
        return Err("--writers must be at least 1".into());
    }

    let registry = SeriesRegistry::new();
    let ring = registry.create("bench", capacity)?;

    println!("Benchmark: {writers} writer(s) x {samples} samples, capacity {capacity}");

    let start = Instant::now();
    std::thread::scope(|s| {
        for writer in 0..writers {
            let ring = Arc::clone(&ring);
            s.spawn(move || {
                let value = writer as f64;
                for i in 0..samples {
                    ring.add_at(value, i);
                }
            });
        }
    });
    let elapsed = start.elapsed();

    let total = samples.saturating_mul(writers as u64);
    let snapshot_start = Instant::now();
    let snapshot = ring.snapshot();
    let snapshot_elapsed = snapshot_start.elapsed();

    let expected = usize::try_from(total).map_or(capacity, |t| t.min(capacity));
    if snapshot.len() != expected {
        return Err(format!(
            "snapshot holds {} samples, expected {expected}",
            snapshot.len()
        )
        .into());
    }

    let secs = elapsed.as_secs_f64();
    println!("  Written:   {total} samples in {secs:.3}s");
    if secs > 0.0 {
        println!("  Throughput: {:.0} samples/s", total as f64 / secs);
        println!("  Per add:    {:.1} ns", secs * 1e9 / total.max(1) as f64);
    }
    println!(
        "  Snapshot:  {} samples in {:.1} us",
        snapshot.len(),
        snapshot_elapsed.as_secs_f64() * 1e6
    );

    Ok(())
}
