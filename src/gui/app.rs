//! SalesScope Main Application
//! Main window with control panel and dashboard.

use crate::analysis::DashboardViews;
use crate::config::AppConfig;
use crate::data::{LoadSummary, SalesLoader, TableCache, YearFilter};
use crate::gui::{ControlPanel, ControlPanelAction, DashboardView};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(Arc<LoadSummary>),
    Error(String),
}

/// Main application window.
pub struct SalesScopeApp {
    cache: TableCache,
    control_panel: ControlPanel,
    dashboard: DashboardView,
    table: Option<Arc<LoadSummary>>,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl SalesScopeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load_or_default();

        let mut app = Self {
            cache: TableCache::new(),
            control_panel: ControlPanel::new(),
            dashboard: DashboardView::new(),
            table: None,
            load_rx: None,
            is_loading: false,
        };
        app.control_panel.settings.granularity = config.granularity;
        if let Some(path) = config.data_path {
            app.control_panel.settings.csv_path = Some(path.clone());
            app.start_load(&path);
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.settings.csv_path = Some(path.clone());
            self.start_load(&path);
        }
    }

    /// Re-parse the current source even if its cache entry looks fresh.
    fn handle_reload_csv(&mut self) {
        if self.is_loading {
            return;
        }
        if let Some(path) = self.control_panel.settings.csv_path.clone() {
            self.cache.invalidate(&path);
            self.start_load(&path);
        }
    }

    /// Load a source, serving from the cache when its signature still
    /// matches, otherwise parsing in a background thread.
    fn start_load(&mut self, path: &Path) {
        if let Some(summary) = self.cache.peek(path) {
            self.apply_table(summary);
            return;
        }

        self.dashboard.clear("Loading sales data...");
        self.control_panel.set_progress(0.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let path: PathBuf = path.to_path_buf();

        // Load CSV in background thread
        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));
            match SalesLoader::load_csv(&path) {
                Ok(summary) => {
                    let _ = tx.send(LoadResult::Complete(Arc::new(summary)));
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(25.0, &status);
                    }
                    LoadResult::Complete(summary) => {
                        if let Some(path) = self.control_panel.settings.csv_path.clone() {
                            self.cache.store(&path, Arc::clone(&summary));
                        }
                        self.apply_table(summary);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        // A failed load is fatal for the session: no partial
                        // dashboard is shown.
                        self.table = None;
                        self.control_panel.set_years(Vec::new());
                        self.control_panel.set_counts(0, 0);
                        self.dashboard.clear("Sales data failed to load");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Install a loaded table: refresh the year choices and recompute.
    fn apply_table(&mut self, summary: Arc<LoadSummary>) {
        match YearFilter::available_years(&summary.table) {
            Ok(years) => {
                self.control_panel.set_years(years);
                self.control_panel
                    .set_counts(summary.rows(), summary.dropped_rows);
                self.control_panel
                    .set_progress(100.0, &format!("Complete! {} rows loaded", summary.rows()));
                self.table = Some(summary);
                self.recompute_views();
            }
            Err(e) => {
                self.table = None;
                self.dashboard.clear("Sales data failed to load");
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// One request/response pass: filter the cached table by the selected
    /// years and rebuild every aggregated view.
    fn recompute_views(&mut self) {
        let Some(summary) = self.table.as_ref() else {
            return;
        };

        let years = self.control_panel.selected_years();
        if years.is_empty() {
            self.dashboard.clear("No years selected");
            return;
        }

        let filtered = match YearFilter::by_years(&summary.table, &years) {
            Ok(filtered) => filtered,
            Err(e) => {
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
                return;
            }
        };
        if filtered.height() == 0 {
            self.dashboard.clear("No data for the selected years");
            return;
        }

        match DashboardViews::compute(&filtered, self.control_panel.settings.granularity) {
            Ok(views) => self
                .dashboard
                .set_views(views, self.control_panel.settings.granularity),
            Err(e) => {
                log::error!("view recomputation failed: {e}");
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for SalesScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::ReloadCsv => self.handle_reload_csv(),
                        ControlPanelAction::FilterChanged
                        | ControlPanelAction::GranularityChanged => self.recompute_views(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }
}
