//! Control Panel Widget
//! Left side panel with data source selection and analysis filters.

use crate::analysis::Granularity;
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

/// User settings for analysis
#[derive(Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub granularity: Granularity,
}

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub years: Vec<i32>,
    pub selected_years: Vec<bool>,
    pub progress: f32,
    pub status: String,
    pub row_count: usize,
    pub dropped_rows: usize,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            years: Vec::new(),
            selected_years: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            row_count: 0,
            dropped_rows: 0,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the year list after a table load; every year starts selected.
    pub fn set_years(&mut self, years: Vec<i32>) {
        self.selected_years = vec![true; years.len()];
        self.years = years;
    }

    /// Years currently ticked, newest first.
    pub fn selected_years(&self) -> Vec<i32> {
        self.years
            .iter()
            .zip(self.selected_years.iter())
            .filter(|(_, &selected)| selected)
            .map(|(year, _)| *year)
            .collect()
    }

    pub fn set_counts(&mut self, rows: usize, dropped: usize) {
        self.row_count = rows;
        self.dropped_rows = dropped;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🛍 SalesScope")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Sales Analysis Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if self.settings.csv_path.is_some() && ui.button("⟳ Reload").clicked() {
                            action = ControlPanelAction::ReloadCsv;
                        }
                    });
                });
            });

        if self.row_count > 0 {
            ui.add_space(4.0);
            let mut counts = format!("{} rows loaded", self.row_count);
            if self.dropped_rows > 0 {
                counts.push_str(&format!(" ({} dropped)", self.dropped_rows));
            }
            ui.label(RichText::new(counts).size(11.0).color(Color32::GRAY));
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Filter Section =====
        ui.label(RichText::new("📅 Order Years").size(14.0).strong());
        ui.add_space(5.0);

        if self.years.is_empty() {
            ui.label(
                RichText::new("Load a sales CSV to pick years")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        } else {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(150.0).show(ui, |ui| {
                        for (i, year) in self.years.iter().enumerate() {
                            if i < self.selected_years.len()
                                && ui
                                    .checkbox(&mut self.selected_years[i], year.to_string())
                                    .changed()
                            {
                                action = ControlPanelAction::FilterChanged;
                            }
                        }
                    });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Select All").clicked() {
                    self.selected_years.iter_mut().for_each(|v| *v = true);
                    action = ControlPanelAction::FilterChanged;
                }
                if ui.small_button("Clear All").clicked() {
                    self.selected_years.iter_mut().for_each(|v| *v = false);
                    action = ControlPanelAction::FilterChanged;
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Trend Period Section =====
        ui.label(RichText::new("📈 Trend Period").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            for granularity in [Granularity::Monthly, Granularity::Yearly] {
                if ui
                    .radio_value(
                        &mut self.settings.granularity,
                        granularity,
                        granularity.label(),
                    )
                    .changed()
                {
                    action = ControlPanelAction::GranularityChanged;
                }
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    ReloadCsv,
    FilterChanged,
    GranularityChanged,
}
