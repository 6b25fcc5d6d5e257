//! Application entry point for the 3D tree viewer.
//!
//! This binary parses the command line, sets up logging, generates the
//! initial scene and hands it to eframe. All drawing and interaction is
//! handled by [`Viewer`] from the `viewer` module.
//!
//! # Usage
//!
//! ```bash
//! tree-view
//! tree-view --seed 42
//! tree-view --config scene.json
//! ```

mod camera;
mod viewer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tree_core::config::SceneConfig;
use viewer::Viewer;

#[derive(Parser)]
#[command(name = "tree-view")]
#[command(version, about = "Procedural 3D tree: seed spiral, trunk, branches and canopy")]
struct Args {
    /// Seed for the random source (random when omitted)
    #[arg(long, short = 's')]
    seed: Option<u64>,

    /// JSON file overriding the default scene parameters
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

/// Starts the native eframe application.
///
/// Blocks until the window is closed.
///
/// ### Returns
/// - `Ok(())` if the window ran to completion.
/// - `Err` if the config is invalid or eframe fails to create the window.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    let viewer = Viewer::new(cfg, args.seed).context("generating scene")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 1000.0]),
        ..Default::default()
    };

    eframe::run_native("3D Tree", options, Box::new(|_cc| Ok(Box::new(viewer))))
        .map_err(|e| anyhow::anyhow!("viewer window failed: {e}"))
}
