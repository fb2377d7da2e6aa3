use std::time::Duration;

use super::FetchError;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("repo-guard/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed request.
///
/// Non-2xx statuses are returned as responses, not errors; the caller decides
/// what a 404 or 409 means for its endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// HTTP client abstraction for dependency injection.
pub trait HttpClient: Sync {
    /// Perform a GET request.
    ///
    /// # Errors
    /// Returns [`FetchError::Transport`] if no response was received.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError>;
}

/// Production HTTP client using reqwest.
///
/// This implementation cannot be unit tested without a real HTTP server,
/// so it is excluded from coverage measurement.
#[derive(Debug)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[cfg(not(tarpaulin_include))]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Transport(format!("request timeout: {url}"))
            } else if e.is_connect() {
                FetchError::Transport(format!("failed to connect: {url}"))
            } else {
                FetchError::Transport(format!("request to {url} failed: {e}"))
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| {
            FetchError::Transport(format!("failed to read response from {url}: {e}"))
        })?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
