//! HTTP client implementation using reqwest.
//!
//! Implements the `HttpClient` port. Makes exactly one network attempt
//! per request plan and normalizes whatever comes back; HTTP error
//! statuses are returned as data.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use reqwest::{Client, Method, Url};
use tracing::debug;

use attest_application::ports::{HttpClient, HttpClientError};
use attest_domain::{HttpMethod, RequestPlan, Response};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client adapter wrapping `reqwest::Client`.
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a client with the default 30-second request timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpClientError::Transport` if the underlying client
    /// cannot be constructed.
    pub fn new() -> Result<Self, HttpClientError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpClientError::Transport` if the underlying client
    /// cannot be constructed.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("Attest/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Transport(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Converts the domain method to a reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to the port's failure taxonomy.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error.to_string();
            let host = error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string();

            if message.to_lowercase().contains("dns")
                || message.to_lowercase().contains("resolve")
            {
                return HttpClientError::Dns { host, message };
            }
            if message.to_lowercase().contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host,
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::Transport(message);
        }

        HttpClientError::Transport(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        plan: &RequestPlan,
    ) -> Pin<Box<dyn Future<Output = Result<Response, HttpClientError>> + Send + '_>> {
        let method = plan.method;
        let url = plan.url.clone();
        let query = plan.query.clone();
        let headers = plan.headers.clone();
        let body = plan.body.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            let parsed_url = Url::parse(&url)
                .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;

            let start = Instant::now();

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(method), parsed_url)
                .timeout(timeout);

            if !query.is_empty() {
                builder = builder.query(&query);
            }

            for (name, value) in &headers {
                builder = builder.header(name, value);
            }

            if let Some(json) = &body {
                builder = builder.json(json);
            }

            // One attempt, no retries.
            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, as_millis(timeout)))?;

            let duration = start.elapsed();
            let status = response.status().as_u16();

            let response_headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let text = response
                .text()
                .await
                .map_err(|e| HttpClientError::Transport(format!("failed to read body: {e}")))?;

            debug!(%url, status, duration_ms = as_millis(duration), "request completed");

            Ok(Response::new(status, response_headers, text, duration))
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn as_millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
