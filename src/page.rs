// src/page.rs
// =============================================================================
// Downloads the page that is going to be analyzed.
//
// The analyzer expects HTML, so before handing anything over we make sure:
// - the request succeeded,
// - the server answered exactly 200 OK (any other 2xx has no page for us),
// - the Content-Type starts with text/html.
// =============================================================================

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::info;
use url::Url;

use crate::error::PageError;

/// Fetches a web page and returns its HTML content.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, PageError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(PageError::Request)?;

    if response.status() != StatusCode::OK {
        return Err(PageError::Status(response.status()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.starts_with("text/html") {
        return Err(PageError::ContentType(content_type));
    }

    let html = response.text().await.map_err(PageError::Body)?;
    info!(url = %url, bytes = html.len(), "page retrieved");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::http_client;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    async fn fetch(server: &MockServer) -> Result<String, PageError> {
        let client = http_client(Duration::from_secs(5)).unwrap();
        fetch_page(&client, &Url::parse(&server.uri()).unwrap()).await
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let server = serve(
            ResponseTemplate::new(200).set_body_raw("<!DOCTYPE html>", "text/html; charset=utf-8"),
        )
        .await;

        assert_eq!(fetch(&server).await.unwrap(), "<!DOCTYPE html>");
    }

    #[tokio::test]
    async fn test_non_200_is_rejected() {
        let server = serve(ResponseTemplate::new(404)).await;
        assert!(matches!(
            fetch(&server).await,
            Err(PageError::Status(StatusCode::NOT_FOUND))
        ));
    }

    #[tokio::test]
    async fn test_other_2xx_is_rejected() {
        // only 200 carries the page; 2xx-inclusive is for link probes
        let server = serve(ResponseTemplate::new(204)).await;
        assert!(matches!(
            fetch(&server).await,
            Err(PageError::Status(StatusCode::NO_CONTENT))
        ));
    }

    #[tokio::test]
    async fn test_non_html_is_rejected() {
        let server = serve(
            ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
        )
        .await;

        assert!(matches!(fetch(&server).await, Err(PageError::ContentType(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let client = http_client(Duration::from_secs(5)).unwrap();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        assert!(matches!(
            fetch_page(&client, &url).await,
            Err(PageError::Request(_))
        ));
    }
}
