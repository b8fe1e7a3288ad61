//! Voxbar - menu-bar push-to-talk dictation for macOS
//!
//! Run with `voxbar` or `voxbar daemon` to start the daemon.
//! Use `voxbar config set` to choose a provider and store API keys.
//! Use `voxbar transcribe <file>` to transcribe an audio file.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use voxbar::cli::{Cli, Commands, ConfigAction};
use voxbar::{audio, config, status, transcribe, Config, Daemon};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("voxbar={},warn", log_level))),
        )
        .with_target(false)
        .init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;

    // Run the appropriate command
    match cli.command.unwrap_or(Commands::Daemon) {
        Commands::Daemon => {
            let mut daemon = Daemon::new(config);
            daemon.run().await?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                show_config(&config, &config_path);
            }
            ConfigAction::Set { key, value } => {
                let mut config = config;
                config.set(&key, &value)?;
                config.save(&config_path)?;
                println!("{} updated in {:?}", key, config_path);
            }
        },

        Commands::Status { format } => {
            run_status(&format);
        }

        Commands::Transcribe { file } => {
            transcribe_file(&config, &file)?;
        }
    }

    Ok(())
}

/// Show current configuration (API keys masked)
fn show_config(config: &Config, config_path: &Path) {
    println!("Current Configuration\n");
    println!("provider       = {}", config.provider);
    println!("groq_api_key   = {}", mask_key(config.groq_api_key.as_deref()));
    println!("google_api_key = {}", mask_key(config.google_api_key.as_deref()));
    println!("hotkey         = {}", config.hotkey);
    println!();
    println!("Config file: {:?}", config_path);
    println!("State file:  {:?}", status::default_state_path());
}

fn mask_key(key: Option<&str>) -> String {
    match key {
        Some(k) if k.chars().count() > 8 => {
            format!("{}… ({} chars)", k.chars().take(6).collect::<String>(), k.chars().count())
        }
        Some(_) => "(set)".to_string(),
        None => "(not set)".to_string(),
    }
}

/// Run the status command - show the daemon state from the state file
fn run_status(format: &str) {
    let state = status::read_status(&status::default_state_path());

    if format == "json" {
        println!("{}", status::format_status_json(&state));
    } else {
        println!("{}", state);
    }
}

/// Transcribe an audio file through the configured provider
fn transcribe_file(config: &config::Config, path: &PathBuf) -> anyhow::Result<()> {
    use hound::WavReader;

    println!("Loading audio file: {:?}", path);

    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    println!(
        "Audio format: {} Hz, {} channel(s), {:?}",
        spec.sample_rate, spec.channels, spec.sample_format
    );

    // Convert samples to f32
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .filter_map(|s| s.ok())
                .map(|s| s as f32 / max_val)
                .collect()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .filter_map(|s| s.ok())
            .collect(),
    };

    // Mix to mono and resample to 16kHz
    let mono = audio::downmix_to_mono(&samples, spec.channels as usize);
    let final_samples = if spec.sample_rate != audio::SAMPLE_RATE {
        println!(
            "Resampling from {} Hz to {} Hz...",
            spec.sample_rate,
            audio::SAMPLE_RATE
        );
        audio::resample_linear(&mono, spec.sample_rate, audio::SAMPLE_RATE)
    } else {
        mono
    };

    println!(
        "Sending {:.2}s of audio to {}...",
        final_samples.len() as f32 / audio::SAMPLE_RATE as f32,
        config.provider
    );

    let transcriber = transcribe::create_transcriber(config)?;
    let text = transcriber.transcribe(&final_samples)?;

    println!("\n{}", text);
    Ok(())
}
