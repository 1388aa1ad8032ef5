//! Chart specifications built from aggregation output.
//!
//! Figures are plain data: the UI layer decides how to draw them, which
//! keeps titles, grouping and slice geometry testable without a window.

use std::f64::consts::TAU;

use crate::data::aggregate::{CategoryCount, CorrelationPoint, SiteSelection};
use crate::data::model::{COL_CLASS, COL_PAYLOAD_MASS};

#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Pie(PieFigure),
    Scatter(ScatterFigure),
}

impl Figure {
    pub fn title(&self) -> &str {
        match self {
            Figure::Pie(pie) => &pie.title,
            Figure::Scatter(scatter) => &scatter.title,
        }
    }
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieFigure {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

/// Angular extent of one slice, radians measured counter-clockwise from the
/// positive x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge<'a> {
    pub label: &'a str,
    pub start: f64,
    pub sweep: f64,
    pub share: f64,
}

impl PieFigure {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }

    /// Wedges for the non-empty slices, starting at twelve o'clock and
    /// running clockwise.
    pub fn wedges(&self) -> Vec<Wedge<'_>> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }

        let mut start = TAU / 4.0;
        self.slices
            .iter()
            .filter(|s| s.count > 0)
            .map(|s| {
                let share = s.count as f64 / total as f64;
                let sweep = share * TAU;
                start -= sweep;
                Wedge {
                    label: &s.label,
                    start,
                    sweep,
                    share,
                }
            })
            .collect()
    }
}

/// Pie of successes per site, or of outcomes at a single site.
pub fn pie_figure(selection: &SiteSelection, counts: Vec<CategoryCount>) -> PieFigure {
    let title = match selection {
        SiteSelection::AllSites => "Successful Launches by Launch Site".to_string(),
        SiteSelection::Site(site) => format!("Successful Launch Rate at {site}"),
    };

    PieFigure {
        title,
        slices: counts
            .into_iter()
            .map(|c| PieSlice {
                label: c.label,
                count: c.count,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Points sharing one booster version category.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterFigure {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Payload vs. outcome, one series per booster version category in the
/// order categories first appear.
pub fn scatter_figure(selection: &SiteSelection, points: Vec<CorrelationPoint>) -> ScatterFigure {
    let title = match selection {
        SiteSelection::AllSites => "Correlation Between Success and Payload at all site".to_string(),
        SiteSelection::Site(site) => format!("Correlation Between Success and Payload at {site}"),
    };

    let mut series: Vec<ScatterSeries> = Vec::new();
    for p in points {
        let xy = [p.payload_mass_kg, f64::from(p.outcome.class())];
        match series.iter_mut().find(|s| s.name == p.booster_version_category) {
            Some(s) => s.points.push(xy),
            None => series.push(ScatterSeries {
                name: p.booster_version_category,
                points: vec![xy],
            }),
        }
    }

    ScatterFigure {
        title,
        x_label: COL_PAYLOAD_MASS.to_string(),
        y_label: COL_CLASS.to_string(),
        series,
    }
}
