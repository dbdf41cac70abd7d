//! Control Panel Widget
//! Left side panel with the country, product and branch multiselects.

use crate::data::{BankDataset, Dimension, FilterSelections};
use egui::{Color32, RichText, ScrollArea};

/// Left side filter panel.
pub struct ControlPanel {
    /// Options per dimension in first-seen order.
    options: Vec<(Dimension, Vec<String>)>,
    pub selections: FilterSelections,
    product_available: bool,
    warnings: Vec<String>,
    source_name: String,
}

impl ControlPanel {
    /// Build the panel with every value selected.
    pub fn new(dataset: &BankDataset) -> Self {
        let options = Dimension::ALL
            .iter()
            .map(|&dim| (dim, dataset.distinct_values(dim)))
            .collect();

        Self {
            options,
            selections: FilterSelections::all(dataset),
            product_available: dataset.schema().product_available,
            warnings: dataset.warnings().to_vec(),
            source_name: dataset
                .source()
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| dataset.source().display().to_string()),
        }
    }

    /// Draw the panel. Returns `true` when the selection changed.
    pub fn show(&mut self, ui: &mut egui::Ui, filtered_rows: usize, total_rows: usize) -> bool {
        let mut changed = false;

        ui.add_space(5.0);
        ui.label(RichText::new("🔎 Filter Data").size(18.0).strong());
        ui.add_space(4.0);
        ui.label(RichText::new(format!("📁 {}", self.source_name)).size(12.0));
        ui.label(
            RichText::new(format!("{filtered_rows} of {total_rows} rows"))
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.add_space(8.0);
        ui.separator();

        for (dimension, values) in &self.options {
            if *dimension == Dimension::Product && !self.product_available {
                continue;
            }
            changed |= Self::multiselect(ui, *dimension, values, &mut self.selections);
            ui.add_space(8.0);
            ui.separator();
        }

        for warning in &self.warnings {
            ui.add_space(5.0);
            ui.label(
                RichText::new(format!("⚠️ {warning}"))
                    .size(12.0)
                    .color(Color32::from_rgb(255, 193, 7)),
            );
        }

        changed
    }

    fn multiselect(
        ui: &mut egui::Ui,
        dimension: Dimension,
        values: &[String],
        selections: &mut FilterSelections,
    ) -> bool {
        let mut changed = false;

        ui.label(RichText::new(format!("Select {}", dimension.label())).size(14.0).strong());
        ui.add_space(4.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(dimension.column())
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for value in values {
                            let mut checked = selections.get(dimension).contains(value);
                            if ui.checkbox(&mut checked, value).changed() {
                                selections.toggle(dimension, value);
                                changed = true;
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                *selections.get_mut(dimension) = values.iter().cloned().collect();
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                selections.get_mut(dimension).clear();
                changed = true;
            }
        });

        changed
    }
}
