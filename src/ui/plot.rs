use std::ops::RangeInclusive;

use eframe::egui::{RichText, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoints,
    Points,
};

use crate::color::{FIT_RED, SCATTER_BLUE, SKY_BLUE, TREND_GREEN};
use crate::config::CHART_HEIGHT;
use crate::dashboard::DashboardView;
use crate::data::aggregate::GroupMean;

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Label integer grid marks with category names; everything else is blank.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let i = mark.value.round();
        if (mark.value - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

fn year_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract().abs() < 1e-6 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong());
}

fn base_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(true)
        .allow_boxed_zoom(true)
}

// ---------------------------------------------------------------------------
// The five dashboard charts
// ---------------------------------------------------------------------------

/// Bar chart of mean PM2.5 per season.
pub fn seasonal_chart(ui: &mut Ui, view: &DashboardView) {
    let labels: Vec<String> = view.seasonal.iter().map(|g| g.key.clone()).collect();
    let bars: Vec<Bar> = view
        .seasonal
        .iter()
        .enumerate()
        .filter(|(_, g)| g.mean.is_finite())
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean)
                .width(0.6)
                .name(format!("{} (n = {})", g.key, g.count))
        })
        .collect();

    let title = format!("Average PM2.5 per season in {}", view.station);
    chart_title(ui, &title);
    base_plot("seasonal_pm25")
        .x_axis_label("Season")
        .y_axis_label("Average PM2.5")
        .x_axis_formatter(category_axis(labels))
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 2.0, 4.0]))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(SKY_BLUE).name("PM2.5"));
        });
}

/// Count plot of air-quality categories.
pub fn category_chart(ui: &mut Ui, view: &DashboardView) {
    let labels: Vec<String> = view.categories.iter().map(|c| c.category.clone()).collect();
    let bars: Vec<Bar> = view
        .categories
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.count as f64)
                .width(0.7)
                .name(&c.category)
                .fill(view.category_colors.color_for(&c.category))
        })
        .collect();

    let title = format!("Air quality category distribution in {}", view.station);
    chart_title(ui, &title);
    base_plot("category_counts")
        .x_axis_label("Air quality category")
        .y_axis_label("Count")
        .x_axis_formatter(category_axis(labels))
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 2.0, 4.0]))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("count"));
        });
}

/// Scatter of the chosen X/Y pair with its regression line.
pub fn correlation_chart(ui: &mut Ui, view: &DashboardView) {
    let chart = &view.correlation;
    let mut title = format!("{} vs {} in {}", chart.x, chart.y, view.station);
    if let Some(r) = chart.fit.and_then(|f| f.r) {
        title.push_str(&format!("  (r = {r:.3})"));
    }

    chart_title(ui, &title);
    base_plot("correlation")
        .height(CHART_HEIGHT * 1.3)
        .x_axis_label(chart.x.column())
        .y_axis_label(chart.y.column())
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(chart.points.clone()))
                    .radius(1.5)
                    .color(SCATTER_BLUE.gamma_multiply(0.6))
                    .name("observations"),
            );
            if let Some(line) = chart.fit_line() {
                plot_ui.line(
                    Line::new(PlotPoints::from(line.to_vec()))
                        .color(FIT_RED)
                        .width(2.0)
                        .name("linear fit"),
                );
            }
        });
}

/// Runs of consecutive years with a finite mean. A year with no values
/// (NaN mean) breaks the line instead of being bridged.
fn trend_segments(yearly: &[GroupMean<i32>]) -> Vec<Vec<[f64; 2]>> {
    yearly
        .split(|g| !g.mean.is_finite())
        .filter(|run| !run.is_empty())
        .map(|run| run.iter().map(|g| [g.key as f64, g.mean]).collect())
        .collect()
}

/// Yearly mean of the numeric air-quality encoding, with markers.
pub fn yearly_chart(ui: &mut Ui, view: &DashboardView) {
    let segments = trend_segments(&view.yearly);
    let markers: Vec<[f64; 2]> = segments.iter().flatten().copied().collect();

    let title = format!("Air quality trend in {} (2013-2017)", view.station);
    chart_title(ui, &title);
    base_plot("yearly_trend")
        .x_axis_label("Year")
        .y_axis_label("Average air quality (numeric)")
        .x_axis_formatter(year_axis)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .show(ui, |plot_ui| {
            for segment in segments {
                plot_ui.line(
                    Line::new(PlotPoints::from(segment))
                        .color(TREND_GREEN)
                        .width(2.0)
                        .name("yearly mean"),
                );
            }
            plot_ui.points(
                Points::new(PlotPoints::from(markers))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(4.0)
                    .color(TREND_GREEN),
            );
        });
}

/// DEWP vs PM2.5, one colour per season.
pub fn season_scatter_chart(ui: &mut Ui, view: &DashboardView) {
    let title = format!("DEWP vs PM2.5 in {} by season", view.station);
    chart_title(ui, &title);
    base_plot("dewp_pm25_season")
        .height(CHART_HEIGHT * 1.3)
        .legend(Legend::default())
        .x_axis_label("Dew point (DEWP)")
        .y_axis_label("PM2.5 level")
        .show(ui, |plot_ui| {
            for series in &view.season_scatter {
                plot_ui.points(
                    Points::new(PlotPoints::from(series.points.clone()))
                        .radius(1.5)
                        .color(view.season_colors.color_for(&series.season))
                        .name(&series.season),
                );
            }
        });
}
