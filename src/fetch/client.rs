use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used to download sheet exports. Implementations may add
/// headers, proxies or test doubles around a plain `reqwest` client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: Request) -> reqwest::Result<Response>;
}
