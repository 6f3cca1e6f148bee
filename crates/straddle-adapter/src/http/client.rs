/*
[INPUT]:  HTTP configuration (API key, environment, timeouts, retry budget)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Request, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::headers::RequestHeaders;
use super::{Result, StraddleError};
use crate::types::Validate;

/// Base URLs for Straddle API
const PRODUCTION_BASE_URL: &str = "https://production.straddle.io";
const SANDBOX_BASE_URL: &str = "https://sandbox.straddle.io";

const USER_AGENT: &str = concat!("straddle-adapter/", env!("CARGO_PKG_VERSION"));
const MAX_BACKOFF: Duration = Duration::from_secs(8);
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Straddle deployment to talk to.
///
/// Deserializes through [`FromStr`], so names are case-insensitive and `live` means production.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = StraddleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "live" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(StraddleError::Config(format!(
                "unknown environment `{other}` (expected production or sandbox)"
            ))),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = StraddleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// HTTP client configuration
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub environment: Environment,
    /// Overrides the environment's base URL (proxies, mock servers)
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Reject responses containing enum values this client does not know
    pub strict_response_validation: bool,
    /// Sent as `Straddle-Account-Id` unless a request sets its own
    pub straddle_account_id: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            environment: Environment::default(),
            base_url: None,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            max_retries: 2,
            strict_response_validation: false,
            straddle_account_id: None,
        }
    }

    /// Build from `STRADDLE_API_KEY`, `STRADDLE_ENVIRONMENT`, `STRADDLE_BASE_URL`
    /// and `STRADDLE_ACCOUNT_ID`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("STRADDLE_API_KEY")
            .map_err(|_| StraddleError::Config("STRADDLE_API_KEY is not set".to_string()))?;
        let mut config = Self::new(api_key);
        if let Ok(environment) = env::var("STRADDLE_ENVIRONMENT") {
            config.environment = environment.parse()?;
        }
        config.base_url = env::var("STRADDLE_BASE_URL").ok().filter(|v| !v.is_empty());
        config.straddle_account_id = env::var("STRADDLE_ACCOUNT_ID").ok().filter(|v| !v.is_empty());
        Ok(config)
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_strict_response_validation(mut self, strict: bool) -> Self {
        self.strict_response_validation = strict;
        self
    }

    pub fn with_straddle_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.straddle_account_id = Some(account_id.into());
        self
    }

    /// Base URL requests are sent to
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_retries", &self.max_retries)
            .field("strict_response_validation", &self.strict_response_validation)
            .field("straddle_account_id", &self.straddle_account_id)
            .finish()
    }
}

/// Main HTTP client for Straddle API
#[derive(Debug, Clone)]
pub struct StraddleClient {
    http_client: Client,
    base_url: Url,
    config: ClientConfig,
}

impl StraddleClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.resolved_base_url().to_string();
        Self::with_base_url(config, &base_url)
    }

    /// Create a client from `STRADDLE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client that talks to `base_url` instead of the configured environment
    pub fn with_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(StraddleError::Config("api key must not be empty".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| StraddleError::Config("api key contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::AUTHORIZATION, auth);
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .build()?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(StraddleError::Config(format!(
                "base URL `{base_url}` cannot carry a path"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL from path segments, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StraddleError::Config("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a request builder with auth and Straddle headers applied.
    ///
    /// Mutating methods get a generated `Idempotency-Key` unless the caller set one,
    /// so retries of the same call are deduplicated server-side.
    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
        headers: &RequestHeaders,
    ) -> Result<RequestBuilder> {
        let url = self.url(segments)?;

        let defaults = RequestHeaders {
            straddle_account_id: self.config.straddle_account_id.clone(),
            ..RequestHeaders::default()
        };
        let mut headers = headers.or(&defaults);
        let mutating = method == Method::POST || method == Method::PUT || method == Method::PATCH;
        if mutating && headers.idempotency_key.is_none() {
            headers.idempotency_key = Some(Uuid::new_v4().to_string());
        }

        Ok(headers.apply(self.http_client.request(method, url)))
    }

    /// Send a request, retrying transient failures, and decode the JSON body
    pub(crate) async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + Validate,
    {
        let request = builder.build()?;
        let mut attempt: u32 = 0;
        loop {
            let current = request.try_clone().ok_or_else(|| {
                StraddleError::Config("request body cannot be replayed".to_string())
            })?;

            match self.execute(current, attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = retry_backoff(&err, attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn execute<T>(&self, request: Request, attempt: u32) -> Result<T>
    where
        T: DeserializeOwned + Validate,
    {
        debug!(
            method = %request.method(),
            url = %request.url(),
            attempt,
            "sending request"
        );

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|err| self.transport_error(err))?;
        let status = response.status();
        debug!(status = status.as_u16(), "received response");

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(status = status.as_u16(), error = %err, "failed to read error body");
                    String::new()
                }
            };
            return Err(StraddleError::from_response(status, &body, retry_after));
        }

        let bytes = response.bytes().await.map_err(|err| self.transport_error(err))?;
        let value: T = serde_json::from_slice(&bytes)?;
        if self.config.strict_response_validation {
            value.validate()?;
        }
        Ok(value)
    }

    fn transport_error(&self, err: reqwest::Error) -> StraddleError {
        if err.is_timeout() {
            StraddleError::Timeout {
                duration: self.config.timeout.as_secs(),
            }
        } else {
            StraddleError::Http(err)
        }
    }
}

/// Delay before retry number `attempt + 1`
fn retry_backoff(err: &StraddleError, attempt: u32) -> Duration {
    if let StraddleError::RateLimit {
        retry_after: Some(secs),
    } = err
    {
        return Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS));
    }
    let exponential = Duration::from_millis(500).saturating_mul(2u32.saturating_pow(attempt));
    exponential.min(MAX_BACKOFF)
}

/// Reject ids that would not land as their own path segment.
///
/// Blank ids and the dot segments `.`/`..` would otherwise address the collection URL.
pub(crate) fn require_id<'a>(field: &str, id: &'a str) -> Result<&'a str> {
    if id.trim().is_empty() {
        return Err(StraddleError::invalid(field, "must not be empty"));
    }
    if id == "." || id == ".." {
        return Err(StraddleError::invalid(field, "must not be a dot segment"));
    }
    Ok(id)
}
