//! Bank Profit Insights - filterable KPI and chart dashboard
//!
//! Loads bank financial records from CSV, filters them by country, product
//! and branch, and shows headline KPIs with a fixed set of charts.

mod charts;
mod config;
mod data;
mod format;
mod gui;
mod stats;

use anyhow::Context;
use config::DashboardConfig;
use data::DataLoader;
use eframe::egui;
use gui::BankInsightsApp;
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::from_env().context("loading dashboard configuration")?;
    info!("Using data file {}", config.data_path.display());

    // Parse and schema errors are fatal: the dataset cannot be trusted
    let dataset = DataLoader::load_csv(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title(&config.title),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(BankInsightsApp::new(cc, dataset, config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
