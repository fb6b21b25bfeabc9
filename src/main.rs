#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

pub mod backend;
pub mod gui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::backend::document::Document;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file to open
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    // RUST_LOG controls verbosity; quiet by default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let document = match &args.file {
        Some(path) => {
            let doc = Document::open(path)?;
            tracing::info!(path = %path.display(), rows = doc.table().num_rows(), "loaded file");
            Some(doc)
        }
        None => None,
    };

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 700.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "csvdesk",
        native_options,
        Box::new(move |cc| Ok(Box::new(crate::gui::app::GuiApp::new(cc, document)))),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
