//! Welkin - onboarding dialog driver
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};

use welkin::{run_session, SessionOptions};
use welkin_core::pages::RawWidgetData;
use welkin_core::protocol::Viewport;
use welkin_host::FileStorage;

/// Welkin - drive the onboarding dialog over stdio
#[derive(Parser, Debug)]
#[command(name = "welkin")]
#[command(about = "Headless driver for the welkin onboarding dialog", long_about = None)]
struct Args {
    /// Path to the widget configuration (TOML)
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Storage file for dismissal state (defaults to the user data dir)
    #[arg(long, value_name = "PATH")]
    storage: Option<PathBuf>,

    /// Host viewport size as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x720")]
    viewport: String,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    welkin_core::logging::init().wrap_err("failed to initialize logging")?;

    let text = std::fs::read_to_string(&args.config)
        .wrap_err_with(|| format!("failed to read {}", args.config.display()))?;
    let widget_data: RawWidgetData = toml::from_str(&text)
        .wrap_err_with(|| format!("invalid configuration in {}", args.config.display()))?;

    let viewport = parse_viewport(&args.viewport)?;

    let storage_path = match args.storage {
        Some(path) => path,
        None => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("welkin")
            .join("storage.json"),
    };
    let storage = FileStorage::new(storage_path);

    run_session(SessionOptions::new(widget_data, viewport), storage)
        .await
        .wrap_err("headless session failed")?;

    Ok(())
}

/// Parse "1280x720" into a viewport
fn parse_viewport(spec: &str) -> color_eyre::Result<Viewport> {
    let (width, height) = spec
        .split_once('x')
        .ok_or_else(|| eyre!("viewport must be WIDTHxHEIGHT, got {spec:?}"))?;
    let width: f64 = width
        .trim()
        .parse()
        .wrap_err_with(|| format!("invalid viewport width in {spec:?}"))?;
    let height: f64 = height
        .trim()
        .parse()
        .wrap_err_with(|| format!("invalid viewport height in {spec:?}"))?;
    if width <= 0.0 || height <= 0.0 {
        return Err(eyre!("viewport dimensions must be positive, got {spec:?}"));
    }
    Ok(Viewport::new(width, height))
}
