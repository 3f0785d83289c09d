//! Table rows consumed and produced by the aggregator.

use serde::Deserialize;

/// One submitted attendance form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Response {
    #[serde(rename = "HKN Handle", default)]
    pub handle: String,
    #[serde(rename = "Week", default)]
    pub week: String,
    #[serde(rename = "Secret Word", default)]
    pub secret_word: String,
    #[serde(rename = "Activity Type", default)]
    pub activity_type: String,
}

/// One scheduled event occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Event {
    #[serde(rename = "Week", default)]
    pub week: String,
    #[serde(rename = "Secret Word", default)]
    pub secret_word: String,
    #[serde(rename = "Activity Type", default)]
    pub activity_type: String,
}

/// Matched-event count for one person within a single category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub handle: String,
    pub count: u64,
}

/// One report line: `counts[i]` belongs to `AttendanceReport::categories[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    pub handle: String,
    pub counts: Vec<u64>,
}

/// Consolidated per-person attendance across every tracked category,
/// sorted by handle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttendanceReport {
    pub categories: Vec<String>,
    pub rows: Vec<AttendanceRow>,
}

impl AttendanceReport {
    /// Column headers in output order: the handle column, then one
    /// `"<Category>s Attended"` column per category.
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(super::HANDLE_COLUMN.to_string())
            .chain(self.categories.iter().map(|c| super::attended_column(c)))
            .collect()
    }

    pub fn row(&self, handle: &str) -> Option<&AttendanceRow> {
        self.rows.iter().find(|r| r.handle == handle)
    }
}
