//! Per-person attendance counting.
//!
//! Responses are credited against scheduled events that share the same week
//! and secret word within one activity category. Each category is counted
//! independently and the results are merged into one wide report.

pub mod aggregate;
pub mod normalize;
pub mod types;

pub use aggregate::{aggregate_all, count_category};
pub use types::{AttendanceReport, AttendanceRow, CategoryCount, Event, Response};

/// Header of the person identifier column in both the responses and the report.
pub const HANDLE_COLUMN: &str = "HKN Handle";

/// Suffix appended to a category label to name its report column.
pub const ATTENDED_SUFFIX: &str = "s Attended";

/// Tracked activity categories, in report column order.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "HM",
    "Cookie Run",
    "Teaching Session",
    "CM",
    "GM",
    "Inter-Committee Duty",
    "QSM",
];

/// Report column name for `category`. Pluralized by literal suffix.
pub fn attended_column(category: &str) -> String {
    format!("{category}{ATTENDED_SUFFIX}")
}

/// Owned copy of [`DEFAULT_CATEGORIES`].
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}
