/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::compliance::ComplianceProfileParams;
use super::enums::{
    CustomerSortBy, CustomerStatus, CustomerType, OrganizationSortBy, ReviewDecision, SortOrder,
};
use super::field::Nullable;
use super::models::{Address, CustomerConfig, Device, ExtraFields, Metadata};
use super::validate::{Validate, field_path, require_email, require_non_empty, require_positive};
use crate::http::headers::RequestHeaders;
use crate::http::pagination::Paginated;
use crate::http::query::{QueryBuilder, QueryParams};
use crate::http::{Result, StraddleError};

/// Body of `POST /v1/customers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerCreateParams {
    #[serde(skip)]
    pub headers: RequestHeaders,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub name: String,
    pub email: String,
    /// E.164 phone number
    pub phone: String,
    pub device: Device,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_profile: Option<ComplianceProfileParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<CustomerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl CustomerCreateParams {
    pub fn new(
        customer_type: CustomerType,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            headers: RequestHeaders::default(),
            customer_type,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            device: Device::new(ip_address),
            address: None,
            compliance_profile: None,
            config: None,
            external_id: None,
            metadata: None,
            extra: ExtraFields::new(),
        }
    }
}

impl Validate for CustomerCreateParams {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.customer_type.validate_at(&field_path(path, "type"))?;
        require_non_empty(path, "name", &self.name)?;
        require_email(path, "email", &self.email)?;
        require_non_empty(path, "phone", &self.phone)?;
        self.device.validate_at(&field_path(path, "device"))?;
        self.address.validate_at(&field_path(path, "address"))?;
        self.compliance_profile
            .validate_at(&field_path(path, "compliance_profile"))?;
        self.config.validate_at(&field_path(path, "config"))
    }
}

/// Body of `PATCH /v1/customers/{id}`.
///
/// Unset members are left untouched by the API; `Nullable::Null` clears a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerUpdateParams {
    #[serde(skip)]
    pub headers: RequestHeaders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub address: Nullable<Address>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub compliance_profile: Nullable<ComplianceProfileParams>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub external_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub metadata: Nullable<Metadata>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Validate for CustomerUpdateParams {
    fn validate_at(&self, path: &str) -> Result<()> {
        if let Some(name) = &self.name {
            require_non_empty(path, "name", name)?;
        }
        if let Some(email) = &self.email {
            require_email(path, "email", email)?;
        }
        if let Some(phone) = &self.phone {
            require_non_empty(path, "phone", phone)?;
        }
        self.status.validate_at(&field_path(path, "status"))?;
        self.device.validate_at(&field_path(path, "device"))?;
        self.address.validate_at(&field_path(path, "address"))?;
        self.compliance_profile
            .validate_at(&field_path(path, "compliance_profile"))
    }
}

/// Query of `GET /v1/customers`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerListParams {
    pub headers: RequestHeaders,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub email: Option<String>,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    /// Matches name, email, phone and external id
    pub search_text: Option<String>,
    pub sort_by: Option<CustomerSortBy>,
    pub sort_order: Option<SortOrder>,
    pub status: Vec<CustomerStatus>,
    pub types: Vec<CustomerType>,
}

impl QueryParams for CustomerListParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        QueryBuilder::new()
            .timestamp("created_from", self.created_from.as_ref())
            .timestamp("created_to", self.created_to.as_ref())
            .opt("email", self.email.as_ref())
            .opt("external_id", self.external_id.as_ref())
            .opt("name", self.name.as_ref())
            .opt("page_number", self.page_number.as_ref())
            .opt("page_size", self.page_size.as_ref())
            .opt("search_text", self.search_text.as_ref())
            .opt("sort_by", self.sort_by.as_ref())
            .opt("sort_order", self.sort_order.as_ref())
            .each("status", &self.status)
            .each("types", &self.types)
            .build()
    }
}

impl Paginated for CustomerListParams {
    fn page_number(&self) -> Option<u32> {
        self.page_number
    }

    fn with_page_number(&self, page_number: u32) -> Self {
        Self {
            page_number: Some(page_number),
            ..self.clone()
        }
    }
}

impl Validate for CustomerListParams {
    fn validate_at(&self, path: &str) -> Result<()> {
        require_positive(path, "page_number", self.page_number)?;
        require_positive(path, "page_size", self.page_size)?;
        self.sort_by.validate_at(&field_path(path, "sort_by"))?;
        self.sort_order.validate_at(&field_path(path, "sort_order"))?;
        self.status.validate_at(&field_path(path, "status"))?;
        self.types.validate_at(&field_path(path, "types"))?;
        if let (Some(from), Some(to)) = (self.created_from, self.created_to) {
            if from > to {
                return Err(StraddleError::invalid(
                    field_path(path, "created_from"),
                    "must not be after created_to",
                ));
            }
        }
        Ok(())
    }
}

/// Body of `PATCH /v1/customers/{id}/review`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerReviewDecisionParams {
    #[serde(skip)]
    pub headers: RequestHeaders,
    pub status: ReviewDecision,
}

impl CustomerReviewDecisionParams {
    pub fn new(status: ReviewDecision) -> Self {
        Self {
            headers: RequestHeaders::default(),
            status,
        }
    }
}

impl Validate for CustomerReviewDecisionParams {
    fn validate_at(&self, path: &str) -> Result<()> {
        self.status.validate_at(&field_path(path, "status"))
    }
}

/// Body of `POST /v1/organizations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationCreateParams {
    #[serde(skip)]
    pub headers: RequestHeaders,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl OrganizationCreateParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            headers: RequestHeaders::default(),
            name: name.into(),
            external_id: None,
            metadata: None,
            extra: ExtraFields::new(),
        }
    }
}

impl Validate for OrganizationCreateParams {
    fn validate_at(&self, path: &str) -> Result<()> {
        require_non_empty(path, "name", &self.name)
    }
}

/// Query of `GET /v1/organizations`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationListParams {
    pub headers: RequestHeaders,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<OrganizationSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl QueryParams for OrganizationListParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        QueryBuilder::new()
            .opt("external_id", self.external_id.as_ref())
            .opt("name", self.name.as_ref())
            .opt("page_number", self.page_number.as_ref())
            .opt("page_size", self.page_size.as_ref())
            .opt("sort_by", self.sort_by.as_ref())
            .opt("sort_order", self.sort_order.as_ref())
            .build()
    }
}

impl Paginated for OrganizationListParams {
    fn page_number(&self) -> Option<u32> {
        self.page_number
    }

    fn with_page_number(&self, page_number: u32) -> Self {
        Self {
            page_number: Some(page_number),
            ..self.clone()
        }
    }
}

impl Validate for OrganizationListParams {
    fn validate_at(&self, path: &str) -> Result<()> {
        require_positive(path, "page_number", self.page_number)?;
        require_positive(path, "page_size", self.page_size)?;
        self.sort_by.validate_at(&field_path(path, "sort_by"))?;
        self.sort_order.validate_at(&field_path(path, "sort_order"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_params() -> CustomerCreateParams {
        CustomerCreateParams::new(
            CustomerType::Individual,
            "Ada Lovelace",
            "ada@example.com",
            "+12125550123",
            "192.168.1.1",
        )
    }

    #[test]
    fn create_params_serialize_minimal_body() {
        let mut params = create_params();
        params.headers = RequestHeaders::default().with_idempotency_key("idem-1");

        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(
            body,
            json!({
                "type": "individual",
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "+12125550123",
                "device": { "ip_address": "192.168.1.1" }
            })
        );
    }

    #[test]
    fn create_params_validation_reports_field() {
        let mut params = create_params();
        params.email = "ada.example.com".to_string();
        let err = params.validate().unwrap_err();
        assert!(matches!(err, StraddleError::InvalidData { ref field, .. } if field == "email"));

        let mut params = create_params();
        params.device.ip_address.clear();
        let err = params.validate().unwrap_err();
        assert!(
            matches!(err, StraddleError::InvalidData { ref field, .. } if field == "device.ip_address")
        );

        let mut params = create_params();
        params.customer_type = "partnership".parse().unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn update_params_distinguish_clear_from_untouched() {
        let params = CustomerUpdateParams {
            email: Some("new@example.com".to_string()),
            external_id: Nullable::Null,
            metadata: Nullable::Value(Metadata::from([("tier".to_string(), "gold".to_string())])),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "email": "new@example.com",
                "external_id": null,
                "metadata": { "tier": "gold" }
            })
        );
        assert!(params.validate().is_ok());
    }

    #[test]
    fn list_params_query_pairs() {
        let params = CustomerListParams {
            created_from: Some("2024-01-01T00:00:00Z".parse().unwrap()),
            page_size: Some(50),
            search_text: Some("ada".to_string()),
            sort_by: Some(CustomerSortBy::CreatedAt),
            sort_order: Some(SortOrder::Desc),
            status: vec![CustomerStatus::Pending, CustomerStatus::Review],
            ..Default::default()
        };

        assert_eq!(
            params.query_pairs(),
            vec![
                ("created_from", "2024-01-01T00:00:00Z".to_string()),
                ("page_size", "50".to_string()),
                ("search_text", "ada".to_string()),
                ("sort_by", "created_at".to_string()),
                ("sort_order", "desc".to_string()),
                ("status", "pending".to_string()),
                ("status", "review".to_string()),
            ]
        );
    }

    #[test]
    fn list_params_reject_zero_page_and_inverted_range() {
        let params = CustomerListParams {
            page_number: Some(0),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = CustomerListParams {
            created_from: Some("2024-02-01T00:00:00Z".parse().unwrap()),
            created_to: Some("2024-01-01T00:00:00Z".parse().unwrap()),
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("created_from"));
    }

    #[test]
    fn with_page_number_keeps_filters() {
        let params = OrganizationListParams {
            name: Some("Acme".to_string()),
            page_size: Some(10),
            ..Default::default()
        };
        let next = params.with_page_number(3);
        assert_eq!(next.page_number, Some(3));
        assert_eq!(next.name.as_deref(), Some("Acme"));
        assert_eq!(next.page_size, Some(10));
    }
}
