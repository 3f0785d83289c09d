//! Runtime configuration from the environment (and `.env`, loaded by `main`).

use std::path::PathBuf;

use crate::attendance::default_categories;

pub const DEFAULT_RESPONSES_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTqjtYipKDHEQwx5OIho6pC_WOwKyBHMtYIqm4my9PvGrTZlHMnoYq-F68RxFhb2Hjt39HdIHB6QfpV/pub?gid=719878135&single=true&output=csv";
pub const DEFAULT_EVENTS_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTqjtYipKDHEQwx5OIho6pC_WOwKyBHMtYIqm4my9PvGrTZlHMnoYq-F68RxFhb2Hjt39HdIHB6QfpV/pub?gid=930946685&single=true&output=csv";

/// Where to read the exports from and where to write everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub responses_url: String,
    pub events_url: String,
    /// Directory receiving the raw `responses.csv` / `events.csv` downloads.
    pub data_dir: PathBuf,
    pub attendance_path: PathBuf,
    pub log_dir: PathBuf,
    pub categories: Vec<String>,
}

impl Config {
    /// Reads `RESPONSES_URL`, `EVENTS_URL`, `DATA_DIR`, `ATTENDANCE_PATH`,
    /// `LOG_DIR` and `ATTENDANCE_CATEGORIES`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let categories = get("ATTENDANCE_CATEGORIES")
            .map(|raw| parse_categories(&raw))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(default_categories);

        Self {
            responses_url: get("RESPONSES_URL").unwrap_or_else(|| DEFAULT_RESPONSES_URL.to_string()),
            events_url: get("EVENTS_URL").unwrap_or_else(|| DEFAULT_EVENTS_URL.to_string()),
            data_dir: get("DATA_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            attendance_path: get("ATTENDANCE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("attendance.csv")),
            log_dir: get("LOG_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("logs")),
            categories,
        }
    }
}

/// Splits a comma-separated category list, dropping blanks.
pub fn parse_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));

        assert_eq!(config.responses_url, DEFAULT_RESPONSES_URL);
        assert_eq!(config.events_url, DEFAULT_EVENTS_URL);
        assert_eq!(config.attendance_path, PathBuf::from("attendance.csv"));
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.categories, default_categories());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("RESPONSES_URL", "https://example.com/r.csv"),
            ("DATA_DIR", "data"),
            ("ATTENDANCE_CATEGORIES", " GM, HM ,,QSM"),
        ]));

        assert_eq!(config.responses_url, "https://example.com/r.csv");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.events_url, DEFAULT_EVENTS_URL);
        assert_eq!(config.categories, vec!["GM", "HM", "QSM"]);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("EVENTS_URL", "  "),
            ("ATTENDANCE_CATEGORIES", " , "),
        ]));

        assert_eq!(config.events_url, DEFAULT_EVENTS_URL);
        assert_eq!(config.categories, default_categories());
    }
}
