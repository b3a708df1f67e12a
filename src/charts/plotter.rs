//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot, plus a painter-drawn
//! pie for the proportional category view.

use egui::{Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Color for single-series charts.
pub const PRIMARY_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// One named line of a multi-series trend. Points are (period index, sum);
/// periods with no data are simply absent, which leaves a visual gap.
#[derive(Debug, Clone)]
pub struct TrendSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Creates sales dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a series by position.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Vertical bars, one slot per entry, entry labels on the x-axis.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        entries: &[(String, f64)],
        y_label: &str,
        height: f32,
    ) {
        let labels: Vec<String> = entries.iter().map(|(label, _)| label.clone()).collect();

        let bars: Vec<Bar> = entries
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                Bar::new(i as f64, *value)
                    .width(0.6)
                    .name(label)
                    .fill(PRIMARY_COLOR.gamma_multiply(0.8))
            })
            .collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_scroll(false)
            .allow_drag(false)
            .y_axis_label(y_label.to_string())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 0.25 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Grouped vertical bars: one slot per category, one colored bar per
    /// series inside the slot.
    pub fn draw_grouped_count_bars(
        ui: &mut egui::Ui,
        id: &str,
        categories: &[String],
        series: &[(String, Vec<u32>)],
        height: f32,
    ) {
        let labels: Vec<String> = categories.to_vec();
        let series_count = series.len().max(1);
        let bar_width = 0.8 / series_count as f64;

        let charts: Vec<BarChart> = series
            .iter()
            .enumerate()
            .map(|(series_idx, (name, counts))| {
                let color = Self::series_color(series_idx);
                let bars: Vec<Bar> = counts
                    .iter()
                    .enumerate()
                    .map(|(cat_idx, count)| {
                        let x = cat_idx as f64 - 0.4 + bar_width * (series_idx as f64 + 0.5);
                        Bar::new(x, *count as f64).width(bar_width * 0.9).fill(color)
                    })
                    .collect();
                BarChart::new(bars).color(color).name(name)
            })
            .collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_scroll(false)
            .allow_drag(false)
            .y_axis_label("Orders")
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 0.25 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// Single trend line with point markers; period labels on the x-axis.
    pub fn draw_trend_line(ui: &mut egui::Ui, id: &str, points: &[(String, f64)], height: f32) {
        let labels: Vec<String> = points.iter().map(|(label, _)| label.clone()).collect();
        let line_points: Vec<[f64; 2]> = points
            .iter()
            .enumerate()
            .map(|(i, (_, value))| [i as f64, *value])
            .collect();

        Plot::new(id.to_string())
            .height(height)
            .allow_scroll(false)
            .y_axis_label("Total Sales")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 0.25 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(line_points.iter().copied()))
                        .color(PRIMARY_COLOR)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(line_points.iter().copied()))
                        .radius(3.5)
                        .color(PRIMARY_COLOR),
                );
            });
    }

    /// Multi-series trend over a shared period axis, one color per series.
    pub fn draw_multi_trend(
        ui: &mut egui::Ui,
        id: &str,
        periods: &[String],
        series: &[TrendSeries],
        height: f32,
    ) {
        let labels: Vec<String> = periods.to_vec();

        Plot::new(id.to_string())
            .height(height)
            .allow_scroll(false)
            .y_axis_label("Total Sales")
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 0.25 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (idx, line) in series.iter().enumerate() {
                    let color = Self::series_color(idx);
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(line.points.iter().copied()))
                            .color(color)
                            .width(2.0)
                            .name(&line.name),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(line.points.iter().copied()))
                            .radius(3.0)
                            .color(color),
                    );
                }
            });
    }

    /// Proportional pie with a swatch legend. Entries with non-positive
    /// values cannot form a slice and only appear in the legend.
    pub fn draw_pie_chart(ui: &mut egui::Ui, entries: &[(String, f64)], height: f32) {
        let total: f64 = entries.iter().map(|(_, value)| value.max(0.0)).sum();
        if total <= 0.0 {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No positive sales to chart").size(13.0));
            });
            return;
        }

        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), height), Sense::hover());
        let painter = ui.painter_at(rect);

        let radius = (rect.height() * 0.45).min(rect.width() * 0.28);
        let center = Pos2::new(rect.left() + rect.width() * 0.32, rect.center().y);

        let mut start_angle = -std::f32::consts::FRAC_PI_2;
        for (idx, (_, value)) in entries.iter().enumerate() {
            let fraction = (value.max(0.0) / total) as f32;
            if fraction <= 0.0 {
                continue;
            }
            let sweep = fraction * std::f32::consts::TAU;
            let color = Self::series_color(idx);

            // Triangle fan: short arc steps keep each piece convex.
            let steps = ((sweep / 0.15).ceil() as usize).max(1);
            for step in 0..steps {
                let a0 = start_angle + sweep * step as f32 / steps as f32;
                let a1 = start_angle + sweep * (step + 1) as f32 / steps as f32;
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
            start_angle += sweep;
        }

        // Legend column to the right of the pie.
        let text_color = ui.visuals().text_color();
        let legend_x = rect.left() + rect.width() * 0.62;
        let row_height = 18.0;
        let legend_top =
            rect.center().y - entries.len() as f32 * row_height / 2.0 + row_height / 2.0;
        for (idx, (label, value)) in entries.iter().enumerate() {
            let y = legend_top + idx as f32 * row_height;
            let swatch = Rect::from_center_size(Pos2::new(legend_x, y), egui::vec2(12.0, 12.0));
            painter.rect_filled(swatch, 2.0, Self::series_color(idx));
            let share = 100.0 * value.max(0.0) / total;
            painter.text(
                Pos2::new(legend_x + 12.0, y),
                egui::Align2::LEFT_CENTER,
                format!("{label} ({share:.1}%)"),
                FontId::proportional(12.0),
                text_color,
            );
        }
    }
}
