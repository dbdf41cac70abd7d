//! Chart Plotter Module
//! Draws catalog charts with egui_plot (bar, scatter, box, violin, histogram) and the egui painter (pie).

use super::catalog::{axis_label, ChartData, ChartKind, ChartSpec, DistributionGroup, ScatterSeries};
use crate::format::compact_number;
use crate::stats::HistogramBin;
use egui::{Color32, RichText, Shape, Stroke};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};
use std::collections::HashMap;
use std::f32::consts::TAU;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(99, 110, 250),  // Indigo
    Color32::from_rgb(239, 85, 59),   // Red
    Color32::from_rgb(0, 204, 150),   // Green
    Color32::from_rgb(171, 99, 250),  // Purple
    Color32::from_rgb(255, 161, 90),  // Orange
    Color32::from_rgb(25, 211, 243),  // Cyan
    Color32::from_rgb(255, 102, 146), // Pink
    Color32::from_rgb(182, 232, 128), // Lime
    Color32::from_rgb(255, 151, 255), // Magenta
    Color32::from_rgb(254, 203, 82),  // Yellow
];

const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
const MIN_MARKER_RADIUS: f32 = 4.0;
const MAX_MARKER_RADIUS: f32 = 20.0;

/// Draws dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the n-th category of a chart.
    pub fn get_group_color(group_index: usize) -> Color32 {
        PALETTE[group_index % PALETTE.len()]
    }

    /// Spread points sharing a value symmetrically around `center`.
    pub fn beeswarm_positions(y_values: &[f64], center: f64, width: f64) -> Vec<f64> {
        let n = y_values.len();
        if n == 0 {
            return Vec::new();
        }

        let mut positions = vec![center; n];

        let precision = 1e6;
        let mut value_indices: HashMap<i64, Vec<usize>> = HashMap::new();
        for (i, &y) in y_values.iter().enumerate() {
            let key = (y * precision).round() as i64;
            value_indices.entry(key).or_default().push(i);
        }

        for indices in value_indices.values() {
            if indices.len() > 1 {
                let step = width / (indices.len() - 1) as f64;
                let start = center - width / 2.0;
                for (i, &idx) in indices.iter().enumerate() {
                    positions[idx] = start + i as f64 * step;
                }
            }
        }

        positions
    }

    /// Marker radius for a sized scatter point, scaled to the largest |size|.
    pub fn marker_radius(size: f64, max_size: f64) -> f32 {
        if max_size <= 0.0 || !size.is_finite() {
            return MIN_MARKER_RADIUS;
        }
        let ratio = (size.abs() / max_size).clamp(0.0, 1.0) as f32;
        MIN_MARKER_RADIUS + ratio * (MAX_MARKER_RADIUS - MIN_MARKER_RADIUS)
    }

    /// Draw one chart card: title, optional description and the plot.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartSpec, height: f32) {
        ui.label(RichText::new(chart.title).size(16.0).strong());
        if let Some(description) = chart.description {
            ui.label(RichText::new(description).size(12.0).color(Color32::GRAY));
        }
        ui.add_space(4.0);

        match &chart.data {
            ChartData::Unavailable(reason) => {
                ui.label(RichText::new(format!("⚠ {reason}")).color(Color32::from_rgb(255, 193, 7)));
            }
            data if data.is_empty() => {
                ui.label(RichText::new("No data for the current filters").color(Color32::GRAY));
            }
            ChartData::Categories {
                labels,
                values,
                rows,
            } => match chart.kind {
                ChartKind::Pie => Self::draw_pie_chart(ui, labels, values, rows, height),
                _ => Self::draw_bar_chart(ui, chart, labels, values, rows, height),
            },
            ChartData::Scatter(series) => Self::draw_scatter_chart(ui, chart, series, height),
            ChartData::Distribution(groups) => {
                Self::draw_distribution_chart(ui, chart, groups, height)
            }
            ChartData::Histogram(bins) => Self::draw_histogram(ui, chart, bins, height),
        }
    }

    fn base_plot(chart: &ChartSpec, height: f32) -> Plot<'_> {
        Plot::new(chart.title)
            .height(height)
            .allow_scroll(false)
            .x_axis_label(axis_label(chart.x_field))
            .y_axis_label(axis_label(chart.y_field))
            .y_axis_formatter(|mark, _range| compact_number(mark.value))
    }

    /// Category axis: tick `i` shows `labels[i]`.
    fn category_plot<'a>(chart: &'a ChartSpec, labels: &[String], height: f32) -> Plot<'a> {
        let x_labels = labels.to_vec();
        Self::base_plot(chart, height).x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
    }

    fn draw_bar_chart(
        ui: &mut egui::Ui,
        chart: &ChartSpec,
        labels: &[String],
        values: &[f64],
        rows: &[usize],
        height: f32,
    ) {
        Self::category_plot(chart, labels, height)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, (label, &value)) in labels.iter().zip(values).enumerate() {
                    let color = Self::get_group_color(i);
                    let bar = Bar::new(i as f64, value)
                        .width(0.6)
                        .name(Self::category_caption(label, rows.get(i).copied()))
                        .fill(color);
                    plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(label));
                }
            });
    }

    fn draw_scatter_chart(
        ui: &mut egui::Ui,
        chart: &ChartSpec,
        series: &[ScatterSeries],
        height: f32,
    ) {
        let max_size = series
            .iter()
            .filter_map(|s| s.sizes.as_ref())
            .flatten()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));

        Self::base_plot(chart, height)
            .x_axis_formatter(|mark, _range| compact_number(mark.value))
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, s) in series.iter().enumerate() {
                    let color = Self::get_group_color(i);
                    match &s.sizes {
                        Some(sizes) => {
                            // egui_plot has one radius per Points item
                            for (point, &size) in s.points.iter().zip(sizes) {
                                plot_ui.points(
                                    Points::new(PlotPoints::from(vec![*point]))
                                        .radius(Self::marker_radius(size, max_size))
                                        .color(color.gamma_multiply(0.8))
                                        .name(&s.name),
                                );
                            }
                        }
                        None => {
                            plot_ui.points(
                                Points::new(PlotPoints::from(s.points.clone()))
                                    .radius(3.0)
                                    .color(color)
                                    .name(&s.name),
                            );
                        }
                    }
                }
            });
    }

    /// Box chart, or violin chart when the groups carry a density outline.
    fn draw_distribution_chart(
        ui: &mut egui::Ui,
        chart: &ChartSpec,
        groups: &[DistributionGroup],
        height: f32,
    ) {
        let labels: Vec<String> = groups.iter().map(|g| g.name.clone()).collect();
        let is_violin = chart.kind == ChartKind::Violin;

        Self::category_plot(chart, &labels, height)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, group) in groups.iter().enumerate() {
                    let color = Self::get_group_color(i);
                    let center = i as f64;
                    let s = &group.summary;

                    if is_violin {
                        let outline = Self::violin_outline(&group.density, center, 0.4);
                        if !outline.is_empty() {
                            plot_ui.line(
                                Line::new(PlotPoints::from(outline))
                                    .color(color)
                                    .width(1.5)
                                    .name(&group.name),
                            );
                        }
                    }

                    let box_width = if is_violin { 0.12 } else { 0.5 };
                    let box_elem = BoxElem::new(
                        center,
                        BoxSpread::new(s.whisker_low, s.q1, s.median, s.q3, s.whisker_high),
                    )
                    .box_width(box_width)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));
                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(&group.name));

                    if !is_violin {
                        let x_positions = Self::beeswarm_positions(&group.values, center, 0.35);
                        let points: PlotPoints = x_positions
                            .iter()
                            .zip(&group.values)
                            .map(|(&x, &y)| [x, y])
                            .collect();
                        plot_ui.points(
                            Points::new(points)
                                .radius(2.5)
                                .color(color.gamma_multiply(0.7))
                                .name(&group.name),
                        );
                    }
                }
            });
    }

    /// Closed outline mirroring a `(value, density)` curve around `center`.
    pub fn violin_outline(density: &[[f64; 2]], center: f64, half_width: f64) -> Vec<[f64; 2]> {
        let max_density = density.iter().map(|p| p[1]).fold(0.0_f64, f64::max);
        if max_density <= 0.0 {
            return Vec::new();
        }

        let scale = half_width / max_density;
        let right = density.iter().map(|&[v, d]| [center + d * scale, v]);
        let left = density.iter().rev().map(|&[v, d]| [center - d * scale, v]);
        let mut outline: Vec<[f64; 2]> = right.chain(left).collect();
        if let Some(&first) = outline.first() {
            outline.push(first);
        }
        outline
    }

    fn draw_histogram(ui: &mut egui::Ui, chart: &ChartSpec, bins: &[HistogramBin], height: f32) {
        let bars: Vec<Bar> = bins
            .iter()
            .map(|bin| {
                Bar::new(bin.center(), bin.count as f64)
                    .width(bin.width())
                    .fill(HISTOGRAM_COLOR)
            })
            .collect();

        Self::base_plot(chart, height)
            .x_axis_formatter(|mark, _range| format!("{:.1}", mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(HISTOGRAM_COLOR).name("count"));
            });
    }

    /// Pie drawn as triangle fans, each step convex. Legend on the right.
    /// Label plus the number of rows behind a category, e.g. `Loans (3 rows)`.
    pub fn category_caption(label: &str, rows: Option<usize>) -> String {
        match rows {
            Some(1) => format!("{label} (1 row)"),
            Some(n) => format!("{label} ({n} rows)"),
            None => label.to_string(),
        }
    }

    fn draw_pie_chart(
        ui: &mut egui::Ui,
        labels: &[String],
        values: &[f64],
        rows: &[usize],
        height: f32,
    ) {
        let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
        if total <= 0.0 {
            ui.label(RichText::new("No data for the current filters").color(Color32::GRAY));
            return;
        }

        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(height, height), egui::Sense::hover());
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0 - 4.0;
            let painter = ui.painter_at(rect);

            let mut start = -TAU / 4.0;
            for (i, &value) in values.iter().enumerate() {
                if value <= 0.0 {
                    continue;
                }
                let sweep = (value / total) as f32 * TAU;
                let steps = ((sweep / 0.05).ceil() as usize).max(1);
                let color = Self::get_group_color(i);

                for step in 0..steps {
                    let a0 = start + sweep * step as f32 / steps as f32;
                    let a1 = start + sweep * (step + 1) as f32 / steps as f32;
                    painter.add(Shape::convex_polygon(
                        vec![
                            center,
                            center + radius * egui::vec2(a0.cos(), a0.sin()),
                            center + radius * egui::vec2(a1.cos(), a1.sin()),
                        ],
                        color,
                        Stroke::NONE,
                    ));
                }
                start += sweep;
            }

            ui.add_space(12.0);
            ui.vertical(|ui| {
                for (i, (label, &value)) in labels.iter().zip(values).enumerate() {
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter().rect_filled(swatch, 3.0, Self::get_group_color(i));
                        let share = if value > 0.0 { value / total * 100.0 } else { 0.0 };
                        let caption = Self::category_caption(label, rows.get(i).copied());
                        ui.label(RichText::new(format!("{caption}  {share:.1}%")).size(13.0));
                    });
                }
            });
        });
    }
}
