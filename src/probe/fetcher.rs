// src/probe/fetcher.rs
// =============================================================================
// The network capability used to probe links.
//
// Fetcher is a trait so the analyzer can be handed any implementation (tests
// use a real HTTP client against local wiremock servers, but nothing stops a
// caller from plugging in something else). HttpFetcher is the reqwest one.
//
// A fetch is one GET request. The body is read to the end and thrown away;
// only the status code matters.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::FetchError;

// Probed links point at unrelated hosts, so idle connections are rarely
// reused. Keep them around only briefly.
const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs a single GET and returns the response status.
    async fn fetch(&self, url: &Url) -> Result<StatusCode, FetchError>;
}

/// Builds the HTTP client shared by the page fetcher and the prober.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(IDLE_CONNECTION_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<StatusCode, FetchError> {
        let mut response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        // drain the body so the connection can go back to the pool
        while let Ok(Some(_)) = response.chunk().await {}

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teapot"))
            .respond_with(ResponseTemplate::new(418).set_body_string("short and stout"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(http_client(Duration::from_secs(5)).unwrap());
        let url = Url::parse(&format!("{}/teapot", server.uri())).unwrap();

        let status = fetcher.fetch(&url).await.unwrap();
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(http_client(Duration::from_millis(200)).unwrap());
        let url = Url::parse(&server.uri()).unwrap();

        assert!(fetcher.fetch(&url).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let fetcher = HttpFetcher::new(http_client(Duration::from_secs(5)).unwrap());
        // port 9 (discard) is not listening on test machines
        let url = Url::parse("http://127.0.0.1:9/").unwrap();

        assert!(fetcher.fetch(&url).await.is_err());
    }
}
