use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names as they appear in the source table
// ---------------------------------------------------------------------------

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";

/// Columns a launch file must provide. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 4] =
    [COL_LAUNCH_SITE, COL_PAYLOAD_MASS, COL_BOOSTER_CATEGORY, COL_CLASS];

// ---------------------------------------------------------------------------
// Outcome – the `class` column
// ---------------------------------------------------------------------------

/// Launch outcome, stored as `class` 0 (failure) or 1 (success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Interpret a raw `class` value. Only 0 and 1 are meaningful.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Outcome::Failure),
            1 => Some(Outcome::Success),
            _ => None,
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    /// Label used by the per-site success summary.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Failure => "Fail",
            Outcome::Success => "Success",
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> Self {
        outcome.class()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    #[serde(rename = "Launch Site")]
    pub launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    pub payload_mass_kg: f64,
    #[serde(rename = "Booster Version Category")]
    pub booster_version_category: String,
    #[serde(rename = "class")]
    pub outcome: Outcome,
}

impl LaunchRecord {
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        booster_version_category: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        Self {
            launch_site: launch_site.into(),
            payload_mass_kg,
            booster_version_category: booster_version_category.into(),
            outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full loaded table with pre-computed payload bounds and site index.
///
/// Built once at startup and never mutated afterwards; share it behind an
/// `Arc` instead of cloning.
#[derive(Debug, Clone, Default)]
pub struct LaunchTable {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in first-occurrence order.
    sites: Vec<String>,
    min_payload: Option<f64>,
    max_payload: Option<f64>,
}

impl LaunchTable {
    /// Build the site index and payload bounds from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut sites = Vec::new();
        let mut min_payload: Option<f64> = None;
        let mut max_payload: Option<f64> = None;

        for rec in &records {
            if seen.insert(rec.launch_site.as_str()) {
                sites.push(rec.launch_site.clone());
            }
            let p = rec.payload_mass_kg;
            min_payload = Some(min_payload.map_or(p, |m| m.min(p)));
            max_payload = Some(max_payload.map_or(p, |m| m.max(p)));
        }

        LaunchTable {
            records,
            sites,
            min_payload,
            max_payload,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    /// Smallest payload in the table, `None` when empty.
    pub fn min_payload(&self) -> Option<f64> {
        self.min_payload
    }

    /// Largest payload in the table, `None` when empty.
    pub fn max_payload(&self) -> Option<f64> {
        self.max_payload
    }

    /// Number of launch records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
