//! GUI module - User interface components

mod app;
mod control_panel;
mod dashboard;

pub use app::SalesScopeApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use dashboard::DashboardView;
