//! Downloads the published spreadsheet exports.

mod basic;
mod client;

pub use basic::{BasicClient, FETCH_TIMEOUT};
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Fetches `url` and returns the body. Non-success statuses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads a table from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(client, source), fields(source = %source))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

/// True if `source` is an `http` or `https` URL rather than a file path.
pub fn is_remote(source: &str) -> bool {
    reqwest::Url::parse(source).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::env;
    use std::fs;

    struct UnreachableClient;

    #[async_trait]
    impl HttpClient for UnreachableClient {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            panic!("local sources must not hit the network");
        }
    }

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let path = format!("{}/hkn_attendance_test_source.csv", env::temp_dir().display());
        fs::write(&path, "Week,Secret Word,Activity Type\n").unwrap();

        let bytes = load_source(&UnreachableClient, &path).await.unwrap();
        assert_eq!(bytes, b"Week,Secret Word,Activity Type\n");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_missing_file_errors() {
        let path = format!("{}/hkn_attendance_no_such_file.csv", env::temp_dir().display());
        let _ = fs::remove_file(&path);

        assert!(load_source(&UnreachableClient, &path).await.is_err());
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://docs.google.com/spreadsheets/d/e/x/pub?output=csv"));
        assert!(is_remote("http://localhost:8000/events.csv"));
        assert!(!is_remote("http_export.csv"));
        assert!(!is_remote("https_backup/responses.csv"));
        assert!(!is_remote("/tmp/responses.csv"));
        assert!(!is_remote("file:///tmp/responses.csv"));
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_invalid_url() {
        assert!(fetch_bytes(&UnreachableClient, "not a url").await.is_err());
    }
}
