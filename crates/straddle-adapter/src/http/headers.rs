/*
[INPUT]:  Per-request tracing/idempotency/account identifiers
[OUTPUT]: Request builder with Straddle header conventions applied
[POS]:    HTTP layer - request header conventions
[UPDATE]: When the API adds or renames request headers
*/

use reqwest::RequestBuilder;

pub const CORRELATION_ID: &str = "Correlation-Id";
pub const IDEMPOTENCY_KEY: &str = "Idempotency-Key";
pub const REQUEST_ID: &str = "Request-Id";
pub const STRADDLE_ACCOUNT_ID: &str = "Straddle-Account-Id";

/// Optional headers accepted by every endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    /// Ties several requests together in Straddle's logs
    pub correlation_id: Option<String>,
    /// Makes a mutating request safe to repeat
    pub idempotency_key: Option<String>,
    pub request_id: Option<String>,
    /// Act on behalf of a connected account (platforms only)
    pub straddle_account_id: Option<String>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation_id(mut self, value: impl Into<String>) -> Self {
        self.correlation_id = Some(value.into());
        self
    }

    pub fn with_idempotency_key(mut self, value: impl Into<String>) -> Self {
        self.idempotency_key = Some(value.into());
        self
    }

    pub fn with_request_id(mut self, value: impl Into<String>) -> Self {
        self.request_id = Some(value.into());
        self
    }

    pub fn with_straddle_account_id(mut self, value: impl Into<String>) -> Self {
        self.straddle_account_id = Some(value.into());
        self
    }

    /// Fill unset members from `defaults`.
    pub fn or(&self, defaults: &RequestHeaders) -> RequestHeaders {
        RequestHeaders {
            correlation_id: self
                .correlation_id
                .clone()
                .or_else(|| defaults.correlation_id.clone()),
            idempotency_key: self
                .idempotency_key
                .clone()
                .or_else(|| defaults.idempotency_key.clone()),
            request_id: self
                .request_id
                .clone()
                .or_else(|| defaults.request_id.clone()),
            straddle_account_id: self
                .straddle_account_id
                .clone()
                .or_else(|| defaults.straddle_account_id.clone()),
        }
    }

    pub(crate) fn apply(&self, mut builder: RequestBuilder) -> RequestBuilder {
        let pairs = [
            (CORRELATION_ID, &self.correlation_id),
            (IDEMPOTENCY_KEY, &self.idempotency_key),
            (REQUEST_ID, &self.request_id),
            (STRADDLE_ACCOUNT_ID, &self.straddle_account_id),
        ];
        for (name, value) in pairs {
            if let Some(value) = value {
                builder = builder.header(name, value.as_str());
            }
        }
        builder
    }
}
