use crate::data::model::Variable;

// ---------------------------------------------------------------------------
// Fixed dashboard configuration
// ---------------------------------------------------------------------------

/// Pre-processed dataset, relative to the working directory.
pub const DATA_PATH: &str = "processed_air_quality_dataset.csv";

pub const APP_TITLE: &str = "Air Quality Dashboard 2013-2017";

/// Monitoring stations offered in the station selector (first is the default).
pub const STATIONS: [&str; 3] = ["Guanyuan", "Tiantan", "Dingling"];

/// Choices for the X axis of the correlation chart.
pub const X_VARIABLES: [Variable; 4] = [
    Variable::Dewp,
    Variable::Temp,
    Variable::Pres,
    Variable::Pm25,
];

/// Choices for the Y axis of the correlation chart.
pub const Y_VARIABLES: [Variable; 5] = [
    Variable::Pm25,
    Variable::So2,
    Variable::No2,
    Variable::Co,
    Variable::O3,
];

pub const WINDOW_SIZE: [f32; 2] = [1200.0, 900.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [700.0, 500.0];

/// Height of each chart panel in the central scroll area.
pub const CHART_HEIGHT: f32 = 280.0;
