use reqwest::header::{CONNECTION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::charset;
use crate::config::ScrapeConfig;

/// Raw response of the single page request.
#[derive(Debug)]
pub struct FetchedPage {
    pub status: StatusCode,
    /// `charset` parameter of the `Content-Type` header, if any.
    pub charset: Option<String>,
    pub body: Vec<u8>,
}

pub struct HttpClient {
    client: Client,
    max_response_size: usize,
}

impl HttpClient {
    pub fn new(config: &ScrapeConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_response_size: config.max_response_size,
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        if let Some(content_length) = response.content_length()
            && content_length > self.max_response_size as u64
        {
            return Err(FetchError::TooLarge(content_length));
        }

        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset::charset_param)
            .map(str::to_string);

        let body = response.bytes().await?;
        if body.len() > self.max_response_size {
            return Err(FetchError::TooLarge(body.len() as u64));
        }

        Ok(FetchedPage {
            status,
            charset,
            body: body.to_vec(),
        })
    }
}

/// Fetches `config.target_url` with a client that lives only for this call,
/// so the connection pool is released before the caller continues.
pub async fn fetch_page(config: &ScrapeConfig) -> Result<FetchedPage, FetchError> {
    let client = HttpClient::new(config)?;
    let page = client.fetch(&config.target_url).await?;
    drop(client);
    Ok(page)
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("HTTP error: {status} for url ({url})")]
    Status { status: StatusCode, url: String },
    #[error("Response too large: {0} bytes")]
    TooLarge(u64),
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Request(e) => e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_code_and_url() {
        let err = FetchError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            url: "http://results.jntuh.ac.in/jsp/home.jsp".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("500 Internal Server Error"));
        assert!(message.contains("http://results.jntuh.ac.in/jsp/home.jsp"));
        assert!(!err.is_timeout());
    }

    #[test]
    fn too_large_reports_size() {
        assert_eq!(
            FetchError::TooLarge(42).to_string(),
            "Response too large: 42 bytes"
        );
    }

    #[test]
    fn client_builds_from_default_config() {
        assert!(HttpClient::new(&ScrapeConfig::default()).is_ok());
    }
}
