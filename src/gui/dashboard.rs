//! Dashboard Widget
//! Central scrollable panel rendering the aggregated sales charts in three
//! sections: value comparison, purchase patterns, and time trends.

use crate::analysis::{
    DashboardViews, DimensionSum, Granularity, PairCount, SeriesTrendPoint, TrendPoint,
    ValueCount, TOP_PRODUCTS,
};
use crate::charts::{ChartPlotter, TrendSeries};
use egui::{Color32, RichText, ScrollArea};

const CARD_CHART_HEIGHT: f32 = 260.0;
const WIDE_CHART_HEIGHT: f32 = 300.0;

/// Scrollable dashboard area. Holds the last computed views, or a message
/// explaining why there is nothing to draw.
pub struct DashboardView {
    views: Option<DashboardViews>,
    granularity: Granularity,
    message: String,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            views: None,
            granularity: Granularity::default(),
            message: "Load a sales CSV to begin".to_string(),
        }
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the charts and show `message` instead (empty filter, load
    /// failure, load in progress).
    pub fn clear(&mut self, message: &str) {
        self.views = None;
        self.message = message.to_string();
    }

    pub fn set_views(&mut self, views: DashboardViews, granularity: Granularity) {
        self.views = Some(views);
        self.granularity = granularity;
    }

    /// Draw the dashboard
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(views) = self.views.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(&self.message).size(20.0));
            });
            return;
        };
        let period = self.granularity.label();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::section_header(ui, "📊 1. Sales Value Comparison");
                ui.columns(3, |columns| {
                    Self::chart_card(&mut columns[0], "Top 10 Countries by Total Sales", |ui| {
                        ChartPlotter::draw_bar_chart(
                            ui,
                            "sales_by_country",
                            &sum_pairs(&views.sales_by_country),
                            "Total Sales",
                            CARD_CHART_HEIGHT,
                        );
                    });
                    Self::chart_card(&mut columns[1], "Sales Share by Category", |ui| {
                        ChartPlotter::draw_pie_chart(
                            ui,
                            &sum_pairs(&views.sales_by_category),
                            CARD_CHART_HEIGHT,
                        );
                    });
                    Self::chart_card(&mut columns[2], "Sales by Payment Method", |ui| {
                        ChartPlotter::draw_bar_chart(
                            ui,
                            "sales_by_payment",
                            &sum_pairs(&views.sales_by_payment),
                            "Total Sales",
                            CARD_CHART_HEIGHT,
                        );
                    });
                });

                ui.add_space(15.0);
                Self::section_header(ui, "🛒 2. Purchase Patterns & Payment Frequency");
                ui.columns(2, |columns| {
                    Self::chart_card(&mut columns[0], "Orders per Category by Gender", |ui| {
                        let (categories, series) =
                            grouped_counts(&views.orders_by_gender_category);
                        ChartPlotter::draw_grouped_count_bars(
                            ui,
                            "gender_category",
                            &categories,
                            &series,
                            CARD_CHART_HEIGHT,
                        );
                    });
                    Self::chart_card(&mut columns[1], "Payment Method Usage", |ui| {
                        ChartPlotter::draw_bar_chart(
                            ui,
                            "payment_frequency",
                            &count_pairs(&views.payment_frequency),
                            "Orders",
                            CARD_CHART_HEIGHT,
                        );
                    });
                });

                ui.add_space(15.0);
                Self::section_header(ui, "📈 3. Sales Trends Over Time");

                Self::chart_card(ui, &format!("Total Sales Trend ({period})"), |ui| {
                    ChartPlotter::draw_trend_line(
                        ui,
                        "overall_trend",
                        &trend_pairs(&views.overall_trend),
                        WIDE_CHART_HEIGHT,
                    );
                });

                ui.add_space(10.0);
                ui.columns(2, |columns| {
                    Self::chart_card(
                        &mut columns[0],
                        &format!("Category Trend ({period})"),
                        |ui| {
                            let (periods, series) = multi_series(&views.category_trend);
                            ChartPlotter::draw_multi_trend(
                                ui,
                                "category_trend",
                                &periods,
                                &series,
                                CARD_CHART_HEIGHT,
                            );
                        },
                    );
                    Self::chart_card(
                        &mut columns[1],
                        &format!("Top {TOP_PRODUCTS} Products Trend ({period})"),
                        |ui| {
                            let (periods, series) = multi_series(&views.top_product_trend);
                            ChartPlotter::draw_multi_trend(
                                ui,
                                "product_trend",
                                &periods,
                                &series,
                                CARD_CHART_HEIGHT,
                            );
                        },
                    );
                });

                ui.add_space(15.0);
            });
    }

    fn section_header(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(8.0);
    }

    fn chart_card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(70)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(14.0).strong());
                ui.add_space(6.0);
                add_contents(ui);
            });
    }
}

fn sum_pairs(entries: &[DimensionSum]) -> Vec<(String, f64)> {
    entries
        .iter()
        .map(|entry| (entry.key.clone(), entry.total_sales))
        .collect()
}

fn count_pairs(entries: &[ValueCount]) -> Vec<(String, f64)> {
    entries
        .iter()
        .map(|entry| (entry.value.clone(), entry.orders as f64))
        .collect()
}

fn trend_pairs(points: &[TrendPoint]) -> Vec<(String, f64)> {
    points
        .iter()
        .map(|point| (point.period.clone(), point.total_sales))
        .collect()
}

/// Pivot sparse pair counts into a category axis plus one count row per
/// primary value. Unobserved combinations become zero bars.
fn grouped_counts(pairs: &[PairCount]) -> (Vec<String>, Vec<(String, Vec<u32>)>) {
    let mut categories: Vec<String> = pairs.iter().map(|pair| pair.secondary.clone()).collect();
    categories.sort();
    categories.dedup();

    let mut names: Vec<String> = pairs.iter().map(|pair| pair.primary.clone()).collect();
    names.sort();
    names.dedup();

    let series = names
        .into_iter()
        .map(|name| {
            let counts = categories
                .iter()
                .map(|category| {
                    pairs
                        .iter()
                        .find(|pair| pair.primary == name && &pair.secondary == category)
                        .map(|pair| pair.orders)
                        .unwrap_or(0)
                })
                .collect();
            (name, counts)
        })
        .collect();

    (categories, series)
}

/// Split series trend points into a shared period axis and per-series plot
/// points. Periods a series never sold in are skipped, leaving a gap.
fn multi_series(points: &[SeriesTrendPoint]) -> (Vec<String>, Vec<TrendSeries>) {
    let mut periods: Vec<String> = points.iter().map(|point| point.period.clone()).collect();
    periods.sort();
    periods.dedup();

    let mut names: Vec<String> = points.iter().map(|point| point.series.clone()).collect();
    names.sort();
    names.dedup();

    let series = names
        .into_iter()
        .map(|name| {
            let line = points
                .iter()
                .filter(|point| point.series == name)
                .filter_map(|point| {
                    periods
                        .iter()
                        .position(|period| period == &point.period)
                        .map(|idx| [idx as f64, point.total_sales])
                })
                .collect();
            TrendSeries { name, points: line }
        })
        .collect();

    (periods, series)
}
