use crate::attendance::types::{
    AttendanceReport, AttendanceRow, CategoryCount, Event, Response,
};
use crate::error::{AttendanceError, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Counts, per person, the responses in `category` that match a scheduled
/// event of the same category on `(week, secret word)`.
///
/// Inputs must already be normalized. The count has inner join cardinality:
/// a response matching two identical event rows counts twice, and two
/// responses matching one event row count twice. Every handle with at least
/// one response in the category is returned, with zero when nothing matched.
/// A category that appears in neither table yields an empty result.
pub fn count_category(
    responses: &[Response],
    events: &[Event],
    category: &str,
) -> Vec<CategoryCount> {
    // (week, secret word) -> number of event rows with that key
    let mut event_keys: HashMap<(&str, &str), u64> = HashMap::new();
    for e in events.iter().filter(|e| e.activity_type == category) {
        if !is_joinable(&e.week, &e.secret_word) {
            continue;
        }
        *event_keys
            .entry((e.week.as_str(), e.secret_word.as_str()))
            .or_default() += 1;
    }

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    let mut skipped = 0usize;

    for r in responses.iter().filter(|r| r.activity_type == category) {
        if r.handle.is_empty() {
            skipped += 1;
            continue;
        }

        let matched = if is_joinable(&r.week, &r.secret_word) {
            event_keys
                .get(&(r.week.as_str(), r.secret_word.as_str()))
                .copied()
                .unwrap_or(0)
        } else {
            0
        };

        *counts.entry(r.handle.as_str()).or_default() += matched;
    }

    debug!(
        category,
        event_keys = event_keys.len(),
        people = counts.len(),
        skipped,
        "Category counted"
    );

    counts
        .into_iter()
        .map(|(handle, count)| CategoryCount {
            handle: handle.to_string(),
            count,
        })
        .collect()
}

/// Builds the full report: one [`count_category`] pass per category, merged
/// with an outer join on handle and zero-filled, sorted by handle.
///
/// # Errors
///
/// Returns [`AttendanceError::DuplicateCategory`] if a label repeats, since it
/// would produce two columns with the same name.
#[tracing::instrument(skip_all, fields(responses = responses.len(), events = events.len()))]
pub fn aggregate_all(
    responses: &[Response],
    events: &[Event],
    categories: &[String],
) -> Result<AttendanceReport> {
    let mut seen = HashSet::new();
    for category in categories {
        if !seen.insert(category.as_str()) {
            return Err(AttendanceError::DuplicateCategory(category.clone()));
        }
    }

    let mut merged: BTreeMap<String, Vec<u64>> = BTreeMap::new();

    for (idx, category) in categories.iter().enumerate() {
        for CategoryCount { handle, count } in count_category(responses, events, category) {
            merged
                .entry(handle)
                .or_insert_with(|| vec![0; categories.len()])[idx] = count;
        }
    }

    let rows = merged
        .into_iter()
        .map(|(handle, counts)| AttendanceRow { handle, counts })
        .collect();

    Ok(AttendanceReport {
        categories: categories.to_vec(),
        rows,
    })
}

/// A row missing either join key can never match an event.
fn is_joinable(week: &str, secret_word: &str) -> bool {
    !week.is_empty() && !secret_word.is_empty()
}
