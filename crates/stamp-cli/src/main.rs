//! Stamp CLI Application
//!
//! Command-line interface for converting values to timestamps and formatting
//! timestamps as text.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use stamp_core::{ConverterConfig, TimestampConverter};
use Commands::*;

fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config: config_file,
        settings,
        no_color,
        command,
    } = Args::parse();

    let saving = matches!(&command, Config(args) if args.save);
    let loaded = match &config_file {
        Some(path) if saving && !path.exists() => ConverterConfig::default(),
        Some(path) => ConverterConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConverterConfig::load_default()
            .context("Failed to load configuration")?
            .unwrap_or_default(),
    };
    let config = settings.overlay(loaded);

    let converter = TimestampConverter::builder()
        .with_config(Some(config.clone()))
        .build_timestamp()
        .context("Failed to initialize converter")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Stamp started");

    let cli = Cli::new(converter, renderer);
    match command {
        Convert(args) => cli.convert(args),
        Format(args) => cli.format(&args),
        Inspect => cli.inspect(),
        Config(args) => cli.config(&config, &args, config_file),
    }
}
