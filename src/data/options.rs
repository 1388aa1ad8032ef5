use super::aggregate::ALL_SITES_VALUE;
use super::model::LaunchTable;

/// Label shown for the "no site filter" entry.
pub const ALL_SITES_LABEL: &str = "All Sites";

/// One entry of the launch-site dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOption {
    pub label: String,
    pub value: String,
}

/// Dropdown entries: "All Sites" first, then each distinct site in the
/// order it first appears in the table.
pub fn site_options(table: &LaunchTable) -> Vec<SiteOption> {
    std::iter::once(SiteOption {
        label: ALL_SITES_LABEL.to_string(),
        value: ALL_SITES_VALUE.to_string(),
    })
    .chain(table.sites().iter().map(|site| SiteOption {
        label: site.clone(),
        value: site.clone(),
    }))
    .collect()
}

/// Options whose label contains `query`, ignoring case. An empty query
/// keeps every option.
pub fn matching_options<'a>(options: &'a [SiteOption], query: &str) -> Vec<&'a SiteOption> {
    let needle = query.trim().to_lowercase();
    options
        .iter()
        .filter(|o| needle.is_empty() || o.label.to_lowercase().contains(&needle))
        .collect()
}
