/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response envelopes with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ResponseType, SortOrder};
use super::models::ExtraFields;
use super::validate::{Validate, field_path};
use crate::http::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Server-assigned id, quote it when contacting support
    pub api_request_id: String,
    pub api_request_timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Envelope around a single object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub meta: ResponseMeta,
    pub response_type: ResponseType,
    pub data: T,
}

impl<T: Validate> Validate for ApiResponse<T> {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.response_type
            .validate_at(&field_path(path, "response_type"))?;
        self.data.validate_at(&field_path(path, "data"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub api_request_id: String,
    pub api_request_timestamp: DateTime<Utc>,
    pub max_page_size: u32,
    pub page_number: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub response_type: ResponseType,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// More pages follow this one.
    ///
    /// An empty page never has a successor, whatever `total_pages` claims.
    pub fn has_next_page(&self) -> bool {
        !self.data.is_empty() && self.meta.page_number < self.meta.total_pages
    }

    pub fn next_page_number(&self) -> Option<u32> {
        self.has_next_page().then(|| self.meta.page_number + 1)
    }
}

impl<T: Validate> Validate for Page<T> {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.response_type
            .validate_at(&field_path(path, "response_type"))?;
        self.meta
            .sort_order
            .validate_at(&field_path(path, "meta.sort_order"))?;
        self.data.validate_at(&field_path(path, "data"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorItem {
    /// Field or parameter the problem refers to
    pub reference: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub status: u16,
    pub title: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ErrorItem>,
}

impl ErrorDetail {
    /// `title: detail`, or the title alone
    pub fn summary(&self) -> String {
        match self.detail.as_deref() {
            Some(detail) if !detail.is_empty() => format!("{}: {}", self.title, detail),
            _ => self.title.clone(),
        }
    }
}

/// Body sent with non-2xx responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    pub response_type: ResponseType,
}
