use std::collections::HashMap;
use std::sync::Arc;

use crate::callbacks::{
    dashboard_callbacks, CallbackError, CallbackRegistry, CallbackResult, InputValues,
    OutputSignal,
};
use crate::config::DashboardConfig;
use crate::data::aggregate::SiteSelection;
use crate::data::model::LaunchTable;
use crate::data::options::{site_options, SiteOption};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Launch records, loaded once before the window opens.
    pub table: Arc<LaunchTable>,

    /// Dropdown entries ("All Sites" first).
    pub options: Vec<SiteOption>,

    /// Slider extent and granularity in kg.
    pub slider_bounds: (f64, f64),
    pub slider_step: f64,

    /// Widget values as edited this frame.
    pub inputs: InputValues,

    /// Text typed into the dropdown's search box.
    pub site_search: String,

    /// Inputs the current outputs were computed from.
    applied: InputValues,

    callbacks: CallbackRegistry,

    /// Latest figure (or render error) per chart.
    outputs: HashMap<OutputSignal, CallbackResult>,
}

impl AppState {
    /// Wire the callbacks and render every chart once.
    pub fn new(table: Arc<LaunchTable>, config: &DashboardConfig) -> Result<Self, CallbackError> {
        let inputs = InputValues {
            site: SiteSelection::AllSites,
            payload: config.default_payload,
        };

        let mut state = Self {
            options: site_options(&table),
            slider_bounds: config.slider_bounds(&table),
            slider_step: config.slider_step,
            inputs: inputs.clone(),
            site_search: String::new(),
            applied: inputs,
            callbacks: dashboard_callbacks()?,
            outputs: HashMap::new(),
            table,
        };

        let results = state.callbacks.dispatch_all(&state.table, &state.inputs);
        state.store(results);
        Ok(state)
    }

    /// Select a dropdown value (`"ALL"` or a site name).
    pub fn select_site(&mut self, value: &str) {
        self.inputs.site = SiteSelection::from_value(value);
    }

    /// Pick an entry from the searchable dropdown. The search text is
    /// cleared so the next popup starts with the full list.
    pub fn choose_site(&mut self, value: &str) {
        self.select_site(value);
        self.site_search.clear();
    }

    /// Drop a partial search when the popup closes without a choice.
    pub fn reset_site_search(&mut self) {
        self.site_search.clear();
    }

    /// Label of the currently selected dropdown entry.
    pub fn selected_label(&self) -> &str {
        let value = self.inputs.site.value();
        self.options
            .iter()
            .find(|o| o.value == value)
            .map_or(value, |o| o.label.as_str())
    }

    /// Keep the lower slider handle at or below the upper one.
    pub fn clamp_payload(&mut self) {
        let range = &mut self.inputs.payload;
        if range.min > range.max {
            range.max = range.min;
        }
    }

    /// Re-run the callbacks whose inputs changed since the last refresh.
    /// Returns `true` if any output was replaced.
    pub fn refresh(&mut self) -> bool {
        let changed = self.inputs.changed_since(&self.applied);
        if changed.is_empty() {
            return false;
        }

        let results = self
            .callbacks
            .dispatch(&self.table, &self.inputs, &changed);
        let replaced = !results.is_empty();
        self.store(results);
        self.applied = self.inputs.clone();
        replaced
    }

    pub fn output(&self, signal: OutputSignal) -> Option<&CallbackResult> {
        self.outputs.get(&signal)
    }

    fn store(&mut self, results: Vec<(OutputSignal, CallbackResult)>) {
        for (signal, result) in results {
            if let Err(e) = &result {
                log::warn!("{signal} could not be rendered: {e}");
            }
            self.outputs.insert(signal, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};
    use crate::figure::Figure;

    fn state() -> AppState {
        let table = LaunchTable::from_records(vec![
            LaunchRecord::new("A", 500.0, "FT", Outcome::Success),
            LaunchRecord::new("A", 9000.0, "B4", Outcome::Failure),
            LaunchRecord::new("B", 3000.0, "FT", Outcome::Success),
        ]);
        AppState::new(Arc::new(table), &DashboardConfig::default()).unwrap()
    }

    fn title(state: &AppState, signal: OutputSignal) -> String {
        match state.output(signal) {
            Some(Ok(figure)) => figure.title().to_string(),
            other => panic!("no figure for {signal}: {other:?}"),
        }
    }

    #[test]
    fn both_charts_render_on_startup() {
        let state = state();
        assert_eq!(
            title(&state, OutputSignal::SuccessPieChart),
            "Successful Launches by Launch Site"
        );
        assert_eq!(
            title(&state, OutputSignal::SuccessPayloadScatterChart),
            "Correlation Between Success and Payload at all site"
        );
        assert_eq!(state.selected_label(), "All Sites");
    }

    #[test]
    fn refresh_without_changes_is_a_no_op() {
        let mut state = state();
        assert!(!state.refresh());
    }

    #[test]
    fn site_change_replaces_both_charts() {
        let mut state = state();
        state.select_site("B");
        assert!(state.refresh());

        assert_eq!(
            title(&state, OutputSignal::SuccessPieChart),
            "Successful Launch Rate at B"
        );
        assert_eq!(
            title(&state, OutputSignal::SuccessPayloadScatterChart),
            "Correlation Between Success and Payload at B"
        );
        assert_eq!(state.selected_label(), "B");
    }

    #[test]
    fn typing_a_search_keeps_the_selection_until_a_site_is_chosen() {
        let mut state = state();
        state.site_search.push_str("b");
        assert!(!state.refresh());
        assert_eq!(state.selected_label(), "All Sites");

        state.choose_site("B");
        assert!(state.site_search.is_empty());
        assert!(state.refresh());
        assert_eq!(state.selected_label(), "B");
    }

    #[test]
    fn closing_the_search_without_a_choice_changes_nothing() {
        let mut state = state();
        state.site_search.push_str("zz");
        state.reset_site_search();

        assert!(state.site_search.is_empty());
        assert!(!state.refresh());
        assert_eq!(state.selected_label(), "All Sites");
    }

    #[test]
    fn slider_change_narrows_scatter() {
        let mut state = state();
        state.inputs.payload.min = 1000.0;
        assert!(state.refresh());

        match state.output(OutputSignal::SuccessPayloadScatterChart) {
            Some(Ok(Figure::Scatter(scatter))) => {
                let payloads: Vec<f64> = scatter
                    .series
                    .iter()
                    .flat_map(|s| s.points.iter().map(|p| p[0]))
                    .collect();
                assert_eq!(payloads, [9000.0, 3000.0]);
            }
            other => panic!("unexpected scatter output: {other:?}"),
        }
    }

    #[test]
    fn collapsed_slider_reports_error_and_recovers() {
        let mut state = state();
        state.inputs.payload.min = 12_000.0;
        state.clamp_payload();
        assert_eq!(state.inputs.payload.max, 12_000.0);
        state.refresh();
        assert!(matches!(
            state.output(OutputSignal::SuccessPayloadScatterChart),
            Some(Err(_))
        ));

        state.inputs.payload.min = 0.0;
        state.refresh();
        assert!(matches!(
            state.output(OutputSignal::SuccessPayloadScatterChart),
            Some(Ok(_))
        ));
    }
}
