use std::fmt;

use thiserror::Error;

use super::model::{LaunchRecord, LaunchTable, Outcome};

/// Dropdown value meaning "no site filter".
pub const ALL_SITES_VALUE: &str = "ALL";

// ---------------------------------------------------------------------------
// Query inputs
// ---------------------------------------------------------------------------

/// Current dropdown selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    AllSites,
    Site(String),
}

impl SiteSelection {
    /// Parse a dropdown value; the `"ALL"` sentinel selects every site.
    pub fn from_value(value: &str) -> Self {
        if value == ALL_SITES_VALUE {
            SiteSelection::AllSites
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// The dropdown value this selection corresponds to.
    pub fn value(&self) -> &str {
        match self {
            SiteSelection::AllSites => ALL_SITES_VALUE,
            SiteSelection::Site(site) => site,
        }
    }

    fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::AllSites => true,
            SiteSelection::Site(site) => record.launch_site == *site,
        }
    }
}

/// Payload interval chosen on the slider, in kilograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub min: f64,
    pub max: f64,
}

impl PayloadRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Strictly exclusive on both ends: a payload sitting exactly on a
    /// slider bound is filtered out.
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.min < payload_mass_kg && payload_mass_kg < self.max
    }

    fn validate(&self) -> Result<(), AggregateError> {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            Ok(())
        } else {
            Err(AggregateError::InvalidRange {
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for PayloadRange {
    fn default() -> Self {
        Self::new(0.0, 10_000.0)
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] kg", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("invalid payload range: min {min} must be below max {max}")]
    InvalidRange { min: f64, max: f64 },
}

// ---------------------------------------------------------------------------
// Query outputs
// ---------------------------------------------------------------------------

/// One pie slice worth of data: a site name or an outcome label with a count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// One scatter point: payload against outcome, tagged with the booster
/// category used for colouring.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: String,
}

impl From<&LaunchRecord> for CorrelationPoint {
    fn from(record: &LaunchRecord) -> Self {
        Self {
            payload_mass_kg: record.payload_mass_kg,
            outcome: record.outcome,
            booster_version_category: record.booster_version_category.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Success counts for the pie chart.
///
/// * `AllSites` – one row per site (table order) with its number of
///   successful launches; sites without a success still get a zero row.
/// * `Site(s)` – `"Success"` / `"Fail"` rows counting the launches at `s`,
///   in the order the outcomes first appear. Outcomes that never occur get
///   no row, and an unknown site yields an empty result.
pub fn success_summary(table: &LaunchTable, selection: &SiteSelection) -> Vec<CategoryCount> {
    match selection {
        SiteSelection::AllSites => table
            .sites()
            .iter()
            .map(|site| CategoryCount {
                label: site.clone(),
                count: table
                    .records()
                    .iter()
                    .filter(|r| r.launch_site == *site && r.outcome.is_success())
                    .count(),
            })
            .collect(),
        SiteSelection::Site(_) => {
            let mut rows: Vec<(Outcome, usize)> = Vec::with_capacity(2);
            for rec in table.records().iter().filter(|r| selection.matches(r)) {
                match rows.iter_mut().find(|(outcome, _)| *outcome == rec.outcome) {
                    Some((_, count)) => *count += 1,
                    None => rows.push((rec.outcome, 1)),
                }
            }
            rows.into_iter()
                .map(|(outcome, count)| CategoryCount {
                    label: outcome.label().to_string(),
                    count,
                })
                .collect()
        }
    }
}

/// Records whose payload lies strictly inside `range`, optionally narrowed
/// to one site, in table order.
pub fn payload_correlation(
    table: &LaunchTable,
    selection: &SiteSelection,
    range: PayloadRange,
) -> Result<Vec<CorrelationPoint>, AggregateError> {
    range.validate()?;

    Ok(table
        .records()
        .iter()
        .filter(|r| range.contains(r.payload_mass_kg) && selection.matches(r))
        .map(CorrelationPoint::from)
        .collect())
}
