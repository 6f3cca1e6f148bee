/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::compliance::ComplianceProfile;
use super::enums::{
    CustomerStatus, CustomerType, IdentityDecision, ProcessingMethod, SandboxOutcome,
};
use super::field::Nullable;
use super::validate::{Validate, field_path, require_non_empty};
use crate::http::Result;

/// Members of a JSON object that this client does not model.
pub type ExtraFields = Map<String, Value>;

/// Free-form string key/value pairs stored alongside a resource.
pub type Metadata = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub address1: String,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub address2: Nullable<String>,
    pub city: String,
    /// Two-letter state code
    pub state: String,
    pub zip: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Address {
    pub fn new(
        address1: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            address1: address1.into(),
            address2: Nullable::Absent,
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
            extra: ExtraFields::new(),
        }
    }
}

impl Validate for Address {
    fn validate_at(&self, path: &str) -> Result<()> {
        require_non_empty(path, "address1", &self.address1)?;
        require_non_empty(path, "city", &self.city)?;
        require_non_empty(path, "state", &self.state)?;
        require_non_empty(path, "zip", &self.zip)
    }
}

/// Device the customer used when signing up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub ip_address: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Device {
    pub fn new(ip_address: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            extra: ExtraFields::new(),
        }
    }
}

impl Validate for Device {
    fn validate_at(&self, path: &str) -> Result<()> {
        require_non_empty(path, "ip_address", &self.ip_address)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_method: Option<ProcessingMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_outcome: Option<SandboxOutcome>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Validate for CustomerConfig {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.processing_method
            .validate_at(&field_path(path, "processing_method"))?;
        self.sandbox_outcome
            .validate_at(&field_path(path, "sandbox_outcome"))
    }
}

/// Full customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub email: String,
    pub phone: String,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub address: Nullable<Address>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub compliance_profile: Nullable<ComplianceProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<CustomerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub external_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub metadata: Nullable<Metadata>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Validate for Customer {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.customer_type.validate_at(&field_path(path, "type"))?;
        self.status.validate_at(&field_path(path, "status"))?;
        self.compliance_profile
            .validate_at(&field_path(path, "compliance_profile"))?;
        self.config.validate_at(&field_path(path, "config"))
    }
}

/// Customer row returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub email: String,
    pub phone: String,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub external_id: Nullable<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Validate for CustomerSummary {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.customer_type.validate_at(&field_path(path, "type"))?;
        self.status.validate_at(&field_path(path, "status"))
    }
}

/// Result of a single identity check (email, phone, fraud, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<IdentityDecision>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub risk_score: Nullable<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub correlation: Nullable<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Validate for BreakdownCheck {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.decision.validate_at(&field_path(path, "decision"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityDetails {
    pub review_id: String,
    pub decision: IdentityDecision,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Checks keyed by name
    #[serde(default)]
    pub breakdown: BTreeMap<String, BreakdownCheck>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub messages: Nullable<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Validate for IdentityDetails {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.decision.validate_at(&field_path(path, "decision"))?;
        self.breakdown.validate_at(&field_path(path, "breakdown"))
    }
}

/// Identity review of a customer and the checks behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerReview {
    pub customer_details: Customer,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub identity_details: Nullable<IdentityDetails>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Validate for CustomerReview {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.customer_details
            .validate_at(&field_path(path, "customer_details"))?;
        self.identity_details
            .validate_at(&field_path(path, "identity_details"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub external_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub metadata: Nullable<Metadata>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Validate for Organization {
    fn validate_at(&self, _path: &str) -> Result<()> {
        Ok(())
    }
}

/// Customer counts per verification status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomersByStatus {
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub review: u64,
    #[serde(default)]
    pub verified: u64,
    #[serde(default)]
    pub inactive: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl CustomersByStatus {
    pub fn total(&self) -> u64 {
        self.pending + self.review + self.verified + self.inactive + self.rejected
    }
}

impl Validate for CustomersByStatus {
    fn validate_at(&self, _path: &str) -> Result<()> {
        Ok(())
    }
}
