//! Chart Viewer Widget
//! KPI metric row and tabbed, scrollable chart cards.

use crate::charts::{ChartPlotter, ChartSpec, DashboardView, Tab};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 320.0;
const METRIC_WIDTH: f32 = 220.0;

/// Central panel: metrics on top, one tab of charts below.
pub struct ChartViewer {
    pub active_tab: Tab,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            active_tab: Tab::CountryInsights,
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, view: &DashboardView) {
        ui.label(RichText::new("🔹 Overview KPIs").size(16.0).strong());
        ui.add_space(6.0);
        Self::draw_metrics(ui, view);

        ui.add_space(CHART_SPACING);
        ui.horizontal(|ui| {
            for tab in Tab::ALL {
                ui.selectable_value(
                    &mut self.active_tab,
                    tab,
                    RichText::new(tab.title()).size(14.0),
                );
            }
        });
        ui.separator();

        let Some(tab) = view.tabs.iter().find(|t| t.tab == self.active_tab) else {
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for chart in &tab.charts {
                    Self::draw_chart_card(ui, tab.tab, chart);
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_metrics(ui: &mut egui::Ui, view: &DashboardView) {
        ui.horizontal(|ui| {
            for metric in view.kpis.metrics() {
                egui::Frame::none()
                    .rounding(8.0)
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(METRIC_WIDTH);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(metric.label).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(metric.text()).size(22.0).strong());
                        });
                    });
                ui.add_space(CHART_SPACING);
            }
        });
    }

    fn draw_chart_card(ui: &mut egui::Ui, tab: Tab, chart: &ChartSpec) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(tab.icon()).size(16.0));
                    ui.vertical(|ui| ChartPlotter::draw_chart(ui, chart, CHART_HEIGHT));
                });
            });
    }
}
