//! Console pitch monitor
//!
//! Captures the default input device and logs the dominant frequency, note
//! and portal match whenever a new block has been analysed.

use anyhow::{Context, Result};
use clap::Parser;
use sirius_audio::audio::{list_input_devices, PitchMonitor};
use sirius_audio::SessionConfig;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "sirius-monitor", version, about = "Live pitch and portal-frequency monitor")]
struct Cli {
    /// TOML session config (defaults used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the A4 reference pitch in Hz
    #[arg(long)]
    reference_a4: Option<f64>,

    /// Record raw input to a WAV file for the whole run
    #[arg(short, long)]
    record: bool,

    /// Stop after this many seconds
    #[arg(short, long, default_value_t = 30.0)]
    seconds: f64,

    /// Display refresh interval in milliseconds
    #[arg(long, default_value_t = 250)]
    refresh_ms: u64,

    /// List input devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if cli.list_devices {
        let devices = list_input_devices().context("Failed to enumerate input devices")?;
        println!("Available input devices:");
        for device in &devices {
            println!(
                "  {:<40} {} Hz, {} ch",
                device.name, device.sample_rate, device.channels
            );
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => {
            let config = SessionConfig::load(path)?;
            log::info!("Loaded config from {}", path.display());
            config
        }
        None => SessionConfig::default(),
    };
    if let Some(reference) = cli.reference_a4 {
        config.reference_a4 = reference;
    }

    let mut monitor = PitchMonitor::new(config).context("Invalid session config")?;
    log::info!(
        "{} samples @ {} Hz, A4 = {} Hz",
        monitor.config().block_size,
        monitor.config().sample_rate,
        monitor.config().reference_a4
    );
    for line in sirius_audio::PortalScorer::from_config(monitor.config())
        .describe()
        .lines()
    {
        log::info!("Portal {}", line);
    }

    monitor.start_capture().context("Failed to start capture")?;
    if cli.record {
        monitor.set_recording(true)?;
    }

    let refresh = Duration::from_millis(cli.refresh_ms.max(1));
    let deadline = Instant::now() + Duration::from_secs_f64(cli.seconds.max(0.0));
    let mut last_sequence = 0;

    while Instant::now() < deadline {
        std::thread::sleep(refresh);

        let snapshot = monitor.snapshot();
        if snapshot.sequence == last_sequence {
            continue;
        }
        last_sequence = snapshot.sequence;

        log::info!(
            "{} | Note: {} | {}",
            snapshot.frequency_summary(),
            snapshot.note,
            snapshot.portal_summary()
        );
    }

    monitor.stop();

    let last = monitor.snapshot();
    let scorer = sirius_audio::PortalScorer::from_config(monitor.config());
    for line in scorer.describe_reading(last.frequency, last.note).lines() {
        log::info!("{}", line);
    }

    if cli.record {
        match monitor.set_recording(false)? {
            Some(path) => log::info!("Recording written to {}", path.display()),
            None => log::warn!("Nothing was recorded"),
        }
    }

    let stats = monitor.stats();
    log::info!(
        "Analysed {} blocks, dropped {} samples",
        stats.blocks_analyzed,
        stats.dropped_samples
    );

    Ok(())
}
