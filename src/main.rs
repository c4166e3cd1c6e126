mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use app::ArgoExplorerApp;
use clap::Parser;
use config::Config;
use data::filter::{coerce_id, SelectionEvent};
use eframe::egui;
use state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Argo float profile dashboard", long_about = None)]
struct Cli {
    /// Dataset to load (.csv, .json or .parquet); overrides `data_path` from the config
    data: Option<PathBuf>,

    /// JSON config file (defaults to ./argo-explorer.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Float identifier selected at startup
    #[arg(long)]
    float: Option<String>,

    /// Cycle number selected at startup
    #[arg(long)]
    cycle: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        config.data_path = path;
    }

    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let mut state = AppState::default();
    state.set_dataset(Arc::new(dataset));
    if let Some(text) = &cli.float {
        let id = coerce_id(text).context("--float")?;
        state.push_event(SelectionEvent::SetFloat(Some(id)));
    }
    if let Some(text) = &cli.cycle {
        let cycle = coerce_id(text).context("--cycle")?;
        state.push_event(SelectionEvent::SetCycle(Some(cycle)));
    }
    state.process_events();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Argo Explorer – Float Profiles",
        options,
        Box::new(move |_cc| Ok(Box::new(ArgoExplorerApp::new(state, config)))),
    )
    .map_err(|e| anyhow!("running the dashboard: {e}"))
}
