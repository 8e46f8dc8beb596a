use crate::color::ColorMap;
use crate::config::{STATIONS, X_VARIABLES, Y_VARIABLES};
use crate::data::aggregate::{
    category_counts, linear_fit, seasonal_mean_pm25, xy_pairs, yearly_mean_aq_numeric,
    CategoryCount, GroupMean, LinearFit,
};
use crate::data::filter;
use crate::data::model::{AirQualityDataset, Observation, Variable};

// ---------------------------------------------------------------------------
// Controls – everything the side panel can change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub station: String,
    pub x: Variable,
    pub y: Variable,
    pub show_raw_data: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            station: STATIONS[0].to_string(),
            x: X_VARIABLES[0],
            y: Y_VARIABLES[0],
            show_raw_data: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart models
// ---------------------------------------------------------------------------

/// Scatter of the chosen variable pair plus its regression line.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationChart {
    pub x: Variable,
    pub y: Variable,
    pub points: Vec<[f64; 2]>,
    pub fit: Option<LinearFit>,
}

impl CorrelationChart {
    fn build(rows: &[&Observation], x: Variable, y: Variable) -> Self {
        let points = xy_pairs(rows.iter().copied(), x, y);
        let fit = linear_fit(&points);
        Self { x, y, points, fit }
    }

    /// End points of the fitted line across the observed x range.
    pub fn fit_line(&self) -> Option<[[f64; 2]; 2]> {
        let fit = self.fit?;
        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[0]), hi.max(p[0]))
            });
        Some([[min, fit.predict(min)], [max, fit.predict(max)]])
    }
}

/// DEWP vs PM2.5 points for one season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSeries {
    pub season: String,
    pub points: Vec<[f64; 2]>,
}

/// Rows without a season are not plotted.
fn season_series(rows: &[&Observation]) -> Vec<SeasonSeries> {
    let mut series: Vec<SeasonSeries> = Vec::new();
    for obs in rows {
        let Some(season) = obs.season.as_deref() else {
            continue;
        };
        let Some(point) = xy_pairs([*obs], Variable::Dewp, Variable::Pm25).pop() else {
            continue;
        };
        match series.iter_mut().find(|s| s.season == season) {
            Some(s) => s.points.push(point),
            None => series.push(SeasonSeries {
                season: season.to_string(),
                points: vec![point],
            }),
        }
    }
    series
}

// ---------------------------------------------------------------------------
// DashboardView – one full pass of filter → aggregate
// ---------------------------------------------------------------------------

/// Everything the central panel draws for one set of controls.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub station: String,
    /// Rows of the dataset at the selected station.
    pub visible_indices: Vec<usize>,
    pub seasonal: Vec<GroupMean<String>>,
    pub categories: Vec<CategoryCount>,
    pub category_colors: ColorMap,
    pub correlation: CorrelationChart,
    pub yearly: Vec<GroupMean<i32>>,
    pub season_scatter: Vec<SeasonSeries>,
    pub season_colors: ColorMap,
}

impl DashboardView {
    pub fn build(dataset: &AirQualityDataset, controls: &Controls) -> Self {
        let visible_indices = filter::station_indices(dataset, &controls.station);
        if visible_indices.is_empty() {
            log::warn!("No observations for station '{}'", controls.station);
        }
        let rows = filter::rows(dataset, &visible_indices);

        let categories = category_counts(rows.iter().copied());
        let category_names: Vec<&str> = categories.iter().map(|c| c.category.as_str()).collect();
        let category_colors = ColorMap::qualitative(&category_names);

        let season_scatter = season_series(&rows);
        let season_names: Vec<&str> = season_scatter.iter().map(|s| s.season.as_str()).collect();
        let season_colors = ColorMap::diverging(&season_names);

        DashboardView {
            station: controls.station.clone(),
            seasonal: seasonal_mean_pm25(rows.iter().copied()),
            correlation: CorrelationChart::build(&rows, controls.x, controls.y),
            yearly: yearly_mean_aq_numeric(rows.iter().copied()),
            categories,
            category_colors,
            season_scatter,
            season_colors,
            visible_indices,
        }
    }
}
