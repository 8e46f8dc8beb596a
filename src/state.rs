use std::sync::Arc;

use crate::dashboard::{Controls, DashboardView};
use crate::data::filter;
use crate::data::model::{AirQualityDataset, Observation};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, shared read-only.
    pub dataset: Arc<AirQualityDataset>,

    /// Current side panel selections.
    controls: Controls,

    /// Charts for the current selections (rebuilt on every change).
    view: DashboardView,
}

impl AppState {
    pub fn new(dataset: Arc<AirQualityDataset>) -> Self {
        let controls = Controls::default();
        let view = DashboardView::build(&dataset, &controls);
        Self {
            dataset,
            controls,
            view,
        }
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Handle a control change: any difference from the current selections
    /// reruns the whole filter → aggregate pipeline and replaces every chart.
    ///
    /// Returns whether anything changed.
    pub fn set_controls(&mut self, controls: Controls) -> bool {
        if controls == self.controls {
            return false;
        }
        log::debug!("Controls changed: {controls:?}");
        self.controls = controls;
        self.view = DashboardView::build(&self.dataset, &self.controls);
        true
    }

    /// Rows behind the current charts, for the raw-data table.
    pub fn visible_rows(&self) -> Vec<&Observation> {
        filter::rows(&self.dataset, &self.view.visible_indices)
    }
}
