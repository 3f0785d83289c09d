//! Error types for the attendance pipeline.

use thiserror::Error;

/// Failures surfaced by parsing, aggregation and report lookup.
///
/// Empty categories and responses that match no event are not errors; they
/// show up as zero counts in the report.
#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("{table} table is missing required column \"{column}\"")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("category \"{0}\" listed more than once")]
    DuplicateCategory(String),

    #[error("no attendance record for \"{0}\"")]
    PersonNotFound(String),

    #[error("malformed attendance report: {0}")]
    MalformedReport(String),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AttendanceError>;
