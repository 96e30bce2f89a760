//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests returning the raw body and content type
//! - Storing fetched resources at their mapped local path
//!
//! There is no retry: a failed request is reported once and skipped.

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::crawler::{classify_content, ContentClass};
use crate::storage::{ProjectLayout, Storage};
use crate::MirrorError;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, empty if absent
    pub content_type: String,
    /// Raw response body
    pub body: Vec<u8>,
}

/// A resource written to its local path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResource {
    /// Where the body was written
    pub path: PathBuf,
    /// How the response classified
    pub class: ContentClass,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use site_mirror::config::{FetcherConfig, UserAgentConfig};
/// use site_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetcherConfig::default());
/// assert!(client.is_ok());
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout, DNS, connection, TLS | `MirrorError::Transport` |
/// | Non-success HTTP status | `MirrorError::HttpStatus` |
/// | Body read failure | `MirrorError::Transport` |
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchedResource, MirrorError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| MirrorError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response
        .bytes()
        .await
        .map_err(|source| MirrorError::Transport {
            url: url.to_string(),
            source,
        })?;

    if final_url != *url {
        tracing::debug!("{} redirected to {}", url, final_url);
    }

    Ok(FetchedResource {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body: body.to_vec(),
    })
}

/// Writes an already fetched resource to its local path
///
/// The path is derived from the requested URL and the response content type.
pub fn store_resource<S: Storage>(
    url: &Url,
    resource: &FetchedResource,
    layout: &ProjectLayout,
    storage: &mut S,
) -> Result<PathBuf, MirrorError> {
    let local_path = layout.local_path(url, Some(&resource.content_type));
    storage.write(&local_path, &resource.body)?;
    Ok(local_path)
}

/// Fetches a URL and stores the body verbatim
///
/// # Returns
///
/// * `Ok(StoredResource)` - Where the resource was written and how it classified
/// * `Err(MirrorError)` - Fetch or write failed
pub async fn fetch_and_store<S: Storage>(
    client: &Client,
    url: &Url,
    layout: &ProjectLayout,
    storage: &mut S,
) -> Result<StoredResource, MirrorError> {
    let resource = fetch_url(client, url).await?;
    let class = classify_content(&resource.content_type, url);
    let path = store_resource(url, &resource, layout, storage)?;
    Ok(StoredResource { path, class })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsStorage;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let config = UserAgentConfig {
            crawler_name: "TestMirror".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
        };
        assert!(build_http_client(&config, &FetcherConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/style.css"))
            .and(header(
                "user-agent",
                UserAgentConfig::default().header_value().as_str(),
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(b"body { color: red }".to_vec(), "text/css"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/style.css", server.uri())).unwrap();
        let resource = fetch_url(&test_client(), &url).await.unwrap();

        assert_eq!(resource.status_code, 200);
        assert_eq!(resource.content_type, "text/css");
        assert_eq!(resource.body, b"body { color: red }");
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetch_url(&test_client(), &url).await.unwrap_err();
        assert!(matches!(err, MirrorError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Port 9 (discard) is closed on test machines
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = fetch_url(&test_client(), &url).await.unwrap_err();
        assert!(matches!(err, MirrorError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_fetch_and_store_uses_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let url = Url::parse(&format!("{}/logo", server.uri())).unwrap();
        let layout = ProjectLayout::for_url(&url, dir.path()).unwrap();
        let mut storage = FsStorage::new();

        let stored = fetch_and_store(&test_client(), &url, &layout, &mut storage)
            .await
            .unwrap();

        assert_eq!(stored.path, dir.path().join("127_0_0_1/logo.png"));
        assert_eq!(stored.class, ContentClass::Opaque);
        assert_eq!(std::fs::read(&stored.path).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_fetch_and_store_failure_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let url = Url::parse(&format!("{}/broken.js", server.uri())).unwrap();
        let layout = ProjectLayout::for_url(&url, dir.path()).unwrap();
        let mut storage = FsStorage::new();

        let result = fetch_and_store(&test_client(), &url, &layout, &mut storage).await;
        assert!(result.is_err());
        assert!(!dir.path().join("127_0_0_1/broken.js").exists());
    }
}
