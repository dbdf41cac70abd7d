//! Bank Insights Main Application
//! Main window with the filter panel and the KPI/chart viewer.

use crate::charts::DashboardView;
use crate::config::DashboardConfig;
use crate::data::BankDataset;
use crate::gui::{ChartViewer, ControlPanel};
use egui::{Color32, RichText, SidePanel};
use log::error;

/// Main application window.
pub struct BankInsightsApp {
    dataset: BankDataset,
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    /// Result for the current selection; recomputed only when it changes.
    view: Option<DashboardView>,
    status: Option<String>,
}

impl BankInsightsApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset: BankDataset,
        config: DashboardConfig,
    ) -> Self {
        let control_panel = ControlPanel::new(&dataset);
        let mut app = Self {
            dataset,
            config,
            control_panel,
            chart_viewer: ChartViewer::new(),
            view: None,
            status: None,
        };
        app.recompute();
        app
    }

    /// Filter + aggregate pass for the current selection.
    fn recompute(&mut self) {
        match DashboardView::compute(&self.dataset, &self.control_panel.selections, &self.config) {
            Ok(view) => {
                self.view = Some(view);
                self.status = None;
            }
            Err(e) => {
                error!("Failed to compute dashboard: {e}");
                self.view = None;
                self.status = Some(format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for BankInsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (filtered_rows, total_rows) = self
            .view
            .as_ref()
            .map(|v| (v.filtered_rows, v.total_rows))
            .unwrap_or((0, self.dataset.row_count()));

        // Left panel - filters
        SidePanel::left("filter_panel")
            .min_width(240.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if self.control_panel.show(ui, filtered_rows, total_rows) {
                        self.recompute();
                    }
                });
            });

        // Central panel - KPIs and charts
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(RichText::new(format!("🏦 {}", self.config.title)).size(24.0).strong());
            ui.label(
                RichText::new(
                    "This dashboard provides comprehensive macro and micro analysis of bank profits for executives and stakeholders.",
                )
                .size(12.0)
                .color(Color32::GRAY),
            );
            ui.add_space(10.0);

            if let Some(status) = &self.status {
                ui.label(RichText::new(status).color(Color32::from_rgb(220, 53, 69)));
            }
            if let Some(view) = &self.view {
                self.chart_viewer.show(ui, view);
            }
        });
    }
}
