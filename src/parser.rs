//! CSV parser for the responses and events exports.

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::attendance::types::{Event, Response};
use crate::attendance::HANDLE_COLUMN;
use crate::error::{AttendanceError, Result};

pub const WEEK_COLUMN: &str = "Week";
pub const SECRET_WORD_COLUMN: &str = "Secret Word";
pub const ACTIVITY_TYPE_COLUMN: &str = "Activity Type";

const RESPONSE_COLUMNS: &[&str] = &[
    HANDLE_COLUMN,
    WEEK_COLUMN,
    SECRET_WORD_COLUMN,
    ACTIVITY_TYPE_COLUMN,
];
const EVENT_COLUMNS: &[&str] = &[WEEK_COLUMN, SECRET_WORD_COLUMN, ACTIVITY_TYPE_COLUMN];

/// Parses the form responses export. Columns other than the four used are ignored.
///
/// # Errors
///
/// Returns [`AttendanceError::MissingColumn`] if a required header is absent,
/// or a CSV error if the bytes are not well-formed.
pub fn parse_responses(bytes: &[u8]) -> Result<Vec<Response>> {
    parse_table(bytes, "responses", RESPONSE_COLUMNS)
}

/// Parses the scheduled events export.
///
/// # Errors
///
/// Same as [`parse_responses`].
pub fn parse_events(bytes: &[u8]) -> Result<Vec<Event>> {
    parse_table(bytes, "events", EVENT_COLUMNS)
}

fn parse_table<T: DeserializeOwned>(
    bytes: &[u8],
    table: &'static str,
    required: &[&'static str],
) -> Result<Vec<T>> {
    // Short rows are accepted; their missing cells read as empty and never join.
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(AttendanceError::MissingColumn { table, column });
        }
    }

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()?;

    debug!(table, rows = rows.len(), "Parsed table");
    Ok(rows)
}
