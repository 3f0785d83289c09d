use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes prepared HTTP requests. Lets the data source be swapped in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
