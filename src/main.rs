//! SalesScope - Sales CSV Analysis & Interactive Dashboard
//!
//! A Rust application that loads a sales dataset, filters it by order year,
//! and displays aggregated charts for countries, categories, payment methods
//! and time trends.

mod analysis;
mod charts;
mod config;
mod data;
mod gui;

use eframe::egui;
use gui::SalesScopeApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 900.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("SalesScope"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "SalesScope",
        options,
        Box::new(|cc| Ok(Box::new(SalesScopeApp::new(cc)))),
    )
}
