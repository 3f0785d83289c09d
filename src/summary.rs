//! Per-person progress lookup over a finished report.

use serde::Serialize;

use crate::attendance::attended_column;
use crate::attendance::normalize::normalize;
use crate::attendance::types::AttendanceReport;
use crate::error::{AttendanceError, Result};

/// Attendance for one category, as shown to the person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryProgress {
    pub category: String,
    pub attended: u64,
}

/// One person's row of the report, paired with its category labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonProgress {
    pub handle: String,
    pub categories: Vec<CategoryProgress>,
}

/// Looks up `handle` (compared after normalization) in `report`.
///
/// # Errors
///
/// Returns [`AttendanceError::PersonNotFound`] if the report has no row for it.
pub fn find_person(report: &AttendanceReport, handle: &str) -> Result<PersonProgress> {
    let key = normalize(handle);
    let row = report
        .row(&key)
        .ok_or_else(|| AttendanceError::PersonNotFound(key.clone()))?;

    let categories = report
        .categories
        .iter()
        .zip(&row.counts)
        .map(|(category, &attended)| CategoryProgress {
            category: category.clone(),
            attended,
        })
        .collect();

    Ok(PersonProgress {
        handle: row.handle.clone(),
        categories,
    })
}

/// Renders the progress message, one line per category in report order.
pub fn render_progress(progress: &PersonProgress) -> String {
    let mut out = format!(
        "Hello {}, here is your current progress on HKN officer requirements:",
        progress.handle
    );
    for c in &progress.categories {
        out.push('\n');
        out.push_str(&format!("{}: {}", attended_column(&c.category), c.attended));
    }
    out
}

/// Pretty-printed JSON form of the progress, for scripting.
pub fn progress_json(progress: &PersonProgress) -> Result<String> {
    Ok(serde_json::to_string_pretty(progress)?)
}
