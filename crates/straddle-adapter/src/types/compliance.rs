/*
[INPUT]:  Compliance profile JSON objects (individual or business shape)
[OUTPUT]: One-of wrapper picking the variant from the keys present
[POS]:    Data layer - polymorphic identity verification data
[UPDATE]: When a compliance profile shape gains or loses discriminating keys
*/

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::field::Nullable;
use super::models::ExtraFields;
use super::validate::{Validate, field_path, require_digits, require_non_empty};
use crate::http::Result;

const BUSINESS_KEYS: &[&str] = &["ein", "legal_business_name", "representatives", "website"];
const INDIVIDUAL_KEYS: &[&str] = &["ssn", "dob"];

/// Person whose identity backs a business profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Representative {
    pub name: String,
    pub ssn_last4: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Representative {
    pub fn new(name: impl Into<String>, ssn_last4: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ssn_last4: ssn_last4.into(),
            extra: ExtraFields::new(),
        }
    }
}

impl Validate for Representative {
    fn validate_at(&self, path: &str) -> Result<()> {
        require_non_empty(path, "name", &self.name)?;
        require_digits(path, "ssn_last4", &self.ssn_last4, 4)
    }
}

/// Individual profile as returned by the API.
///
/// Values are masked (`***-**-****`) except on the unmasked customer endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualComplianceProfile {
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub ssn: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Business profile as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessComplianceProfile {
    #[serde(default)]
    pub ein: Option<String>,
    #[serde(default)]
    pub legal_business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub website: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representatives: Option<Vec<Representative>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Compliance data attached to a customer.
///
/// The wire format carries no tag; the variant is inferred from the keys present.
/// Objects matching neither shape are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComplianceProfile {
    Individual(IndividualComplianceProfile),
    Business(BusinessComplianceProfile),
    Other(Map<String, Value>),
}

impl ComplianceProfile {
    pub fn as_individual(&self) -> Option<&IndividualComplianceProfile> {
        match self {
            ComplianceProfile::Individual(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn as_business(&self) -> Option<&BusinessComplianceProfile> {
        match self {
            ComplianceProfile::Business(profile) => Some(profile),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ComplianceProfile {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        let has_any = |keys: &[&str]| keys.iter().any(|key| object.contains_key(*key));

        if has_any(BUSINESS_KEYS) {
            serde_json::from_value(Value::Object(object))
                .map(ComplianceProfile::Business)
                .map_err(D::Error::custom)
        } else if has_any(INDIVIDUAL_KEYS) {
            serde_json::from_value(Value::Object(object))
                .map(ComplianceProfile::Individual)
                .map_err(D::Error::custom)
        } else {
            Ok(ComplianceProfile::Other(object))
        }
    }
}

/// Response profiles carry masked values and no enums, so nothing is checked.
impl Validate for ComplianceProfile {
    fn validate_at(&self, _path: &str) -> Result<()> {
        Ok(())
    }
}

/// Compliance data supplied when creating or updating a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComplianceProfileParams {
    Individual {
        dob: NaiveDate,
        ssn: String,
    },
    Business {
        ein: String,
        legal_business_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        website: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        representatives: Vec<Representative>,
    },
}

impl Validate for ComplianceProfileParams {
    fn validate_at(&self, path: &str) -> Result<()> {
        match self {
            ComplianceProfileParams::Individual { ssn, .. } => require_digits(path, "ssn", ssn, 9),
            ComplianceProfileParams::Business {
                ein,
                legal_business_name,
                representatives,
                ..
            } => {
                require_digits(path, "ein", ein, 9)?;
                require_non_empty(path, "legal_business_name", legal_business_name)?;
                representatives.validate_at(&field_path(path, "representatives"))
            }
        }
    }
}
