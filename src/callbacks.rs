//! Reactive wiring between input widgets and chart outputs.
//!
//! Each callback declares the input signals it depends on and the single
//! output signal it produces. Whenever any declared input changes the host
//! calls [`CallbackRegistry::dispatch`], which re-runs exactly the affected
//! callbacks against the shared, read-only [`LaunchTable`].

use std::fmt;

use thiserror::Error;

use crate::data::aggregate::{
    payload_correlation, success_summary, AggregateError, PayloadRange, SiteSelection,
};
use crate::data::model::LaunchTable;
use crate::figure::{pie_figure, scatter_figure, Figure};

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSignal {
    SiteDropdown,
    PayloadSlider,
}

impl InputSignal {
    pub fn id(self) -> &'static str {
        match self {
            InputSignal::SiteDropdown => "site-dropdown",
            InputSignal::PayloadSlider => "payload-slider",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSignal {
    SuccessPieChart,
    SuccessPayloadScatterChart,
}

impl OutputSignal {
    pub fn id(self) -> &'static str {
        match self {
            OutputSignal::SuccessPieChart => "success-pie-chart",
            OutputSignal::SuccessPayloadScatterChart => "success-payload-scatter-chart",
        }
    }
}

impl fmt::Display for OutputSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Current value of every input widget.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputValues {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

impl InputValues {
    /// Input signals whose value differs from `previous`.
    pub fn changed_since(&self, previous: &InputValues) -> Vec<InputSignal> {
        let mut changed = Vec::new();
        if self.site != previous.site {
            changed.push(InputSignal::SiteDropdown);
        }
        if self.payload != previous.payload {
            changed.push(InputSignal::PayloadSlider);
        }
        changed
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub type CallbackResult = Result<Figure, AggregateError>;

type Handler = Box<dyn Fn(&LaunchTable, &InputValues) -> CallbackResult>;

struct Callback {
    output: OutputSignal,
    inputs: Vec<InputSignal>,
    handler: Handler,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("output '{0}' already has a callback")]
    DuplicateOutput(OutputSignal),
}

/// Callbacks in registration order; each output has at most one producer.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: Vec<Callback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(
        &mut self,
        output: OutputSignal,
        inputs: &[InputSignal],
        handler: F,
    ) -> Result<(), CallbackError>
    where
        F: Fn(&LaunchTable, &InputValues) -> CallbackResult + 'static,
    {
        if self.callbacks.iter().any(|cb| cb.output == output) {
            return Err(CallbackError::DuplicateOutput(output));
        }
        self.callbacks.push(Callback {
            output,
            inputs: inputs.to_vec(),
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Outputs with a registered callback, in registration order.
    pub fn outputs(&self) -> impl Iterator<Item = OutputSignal> + '_ {
        self.callbacks.iter().map(|cb| cb.output)
    }

    /// Run every callback that depends on at least one of `changed`.
    pub fn dispatch(
        &self,
        table: &LaunchTable,
        inputs: &InputValues,
        changed: &[InputSignal],
    ) -> Vec<(OutputSignal, CallbackResult)> {
        self.callbacks
            .iter()
            .filter(|cb| cb.inputs.iter().any(|i| changed.contains(i)))
            .map(|cb| {
                log::debug!("{} <- {:?}", cb.output, inputs);
                (cb.output, (cb.handler)(table, inputs))
            })
            .collect()
    }

    /// Run every callback, as on first render.
    pub fn dispatch_all(
        &self,
        table: &LaunchTable,
        inputs: &InputValues,
    ) -> Vec<(OutputSignal, CallbackResult)> {
        self.dispatch(
            table,
            inputs,
            &[InputSignal::SiteDropdown, InputSignal::PayloadSlider],
        )
    }
}

// ---------------------------------------------------------------------------
// Dashboard callbacks
// ---------------------------------------------------------------------------

/// `site-dropdown` → `success-pie-chart`
pub fn success_pie_chart(table: &LaunchTable, inputs: &InputValues) -> CallbackResult {
    let counts = success_summary(table, &inputs.site);
    Ok(Figure::Pie(pie_figure(&inputs.site, counts)))
}

/// `site-dropdown` + `payload-slider` → `success-payload-scatter-chart`
pub fn success_payload_scatter_chart(table: &LaunchTable, inputs: &InputValues) -> CallbackResult {
    let points = payload_correlation(table, &inputs.site, inputs.payload)?;
    Ok(Figure::Scatter(scatter_figure(&inputs.site, points)))
}

/// The registry used by the dashboard window.
pub fn dashboard_callbacks() -> Result<CallbackRegistry, CallbackError> {
    let mut registry = CallbackRegistry::new();
    registry.register(
        OutputSignal::SuccessPieChart,
        &[InputSignal::SiteDropdown],
        success_pie_chart,
    )?;
    registry.register(
        OutputSignal::SuccessPayloadScatterChart,
        &[InputSignal::SiteDropdown, InputSignal::PayloadSlider],
        success_payload_scatter_chart,
    )?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn table() -> LaunchTable {
        LaunchTable::from_records(vec![
            LaunchRecord::new("A", 500.0, "FT", Outcome::Success),
            LaunchRecord::new("A", 9000.0, "B4", Outcome::Failure),
            LaunchRecord::new("B", 3000.0, "FT", Outcome::Success),
        ])
    }

    fn outputs(results: &[(OutputSignal, CallbackResult)]) -> Vec<OutputSignal> {
        results.iter().map(|(o, _)| *o).collect()
    }

    #[test]
    fn slider_change_only_refreshes_scatter() {
        let registry = dashboard_callbacks().unwrap();
        let results = registry.dispatch(
            &table(),
            &InputValues::default(),
            &[InputSignal::PayloadSlider],
        );
        assert_eq!(outputs(&results), [OutputSignal::SuccessPayloadScatterChart]);
    }

    #[test]
    fn dropdown_change_refreshes_both_charts() {
        let registry = dashboard_callbacks().unwrap();
        let inputs = InputValues {
            site: SiteSelection::Site("A".into()),
            ..InputValues::default()
        };
        let results = registry.dispatch(&table(), &inputs, &[InputSignal::SiteDropdown]);

        assert_eq!(
            outputs(&results),
            [
                OutputSignal::SuccessPieChart,
                OutputSignal::SuccessPayloadScatterChart
            ]
        );
        match &results[0].1 {
            Ok(Figure::Pie(pie)) => {
                assert_eq!(pie.title, "Successful Launch Rate at A");
                assert_eq!(pie.total(), 2);
            }
            other => panic!("unexpected pie result: {other:?}"),
        }
        match &results[1].1 {
            Ok(Figure::Scatter(scatter)) => {
                assert_eq!(scatter.series.len(), 2);
            }
            other => panic!("unexpected scatter result: {other:?}"),
        }
    }

    #[test]
    fn nothing_changed_runs_nothing() {
        let registry = dashboard_callbacks().unwrap();
        assert!(registry
            .dispatch(&table(), &InputValues::default(), &[])
            .is_empty());
    }

    #[test]
    fn invalid_range_surfaces_as_error_result() {
        let registry = dashboard_callbacks().unwrap();
        let inputs = InputValues {
            payload: PayloadRange::new(4000.0, 4000.0),
            ..InputValues::default()
        };
        let results = registry.dispatch_all(&table(), &inputs);

        assert!(results[0].1.is_ok());
        assert!(matches!(
            results[1].1,
            Err(AggregateError::InvalidRange { .. })
        ));
    }

    #[test]
    fn duplicate_output_is_rejected() {
        let mut registry = dashboard_callbacks().unwrap();
        let err = registry
            .register(
                OutputSignal::SuccessPieChart,
                &[InputSignal::PayloadSlider],
                success_pie_chart,
            )
            .unwrap_err();
        assert_eq!(err, CallbackError::DuplicateOutput(OutputSignal::SuccessPieChart));
        assert_eq!(registry.outputs().count(), 2);
    }

    #[test]
    fn changed_since_reports_each_input() {
        let before = InputValues::default();
        let after = InputValues {
            site: SiteSelection::Site("B".into()),
            payload: PayloadRange::new(1000.0, 10_000.0),
        };
        assert_eq!(
            after.changed_since(&before),
            [InputSignal::SiteDropdown, InputSignal::PayloadSlider]
        );
        assert!(before.changed_since(&before.clone()).is_empty());
    }
}
