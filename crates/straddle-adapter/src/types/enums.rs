/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Open-set Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new enum values are published
*/

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validate::Validate;
use crate::http::{Result, StraddleError};

/// Declares a string-backed API enum that tolerates values it does not know.
///
/// Unknown wire values land in `Unknown(String)` and serialize back unchanged.
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[non_exhaustive]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
            /// Value not known to this version of the client (kept verbatim).
            #[serde(untagged)]
            Unknown(String),
        }

        impl $name {
            /// Every documented value, in declaration order.
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown(raw) => raw.as_str(),
                }
            }

            /// `false` for values that only parsed into `Unknown`
            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(match s {
                    $($wire => $name::$variant,)+
                    other => $name::Unknown(other.to_string()),
                })
            }
        }

        impl Validate for $name {
            fn validate_at(&self, path: &str) -> Result<()> {
                match self {
                    $name::Unknown(raw) => Err(StraddleError::invalid(
                        path,
                        format!(
                            "unknown {} value `{}` (expected one of: {})",
                            stringify!($name),
                            raw,
                            [$($wire),+].join(", ")
                        ),
                    )),
                    _ => Ok(()),
                }
            }
        }
    };
}

api_enum! {
    /// Whether a customer is a person or a company
    pub enum CustomerType {
        Individual => "individual",
        Business => "business",
    }
}

api_enum! {
    /// Lifecycle status of a customer's identity verification
    pub enum CustomerStatus {
        Pending => "pending",
        Review => "review",
        Verified => "verified",
        Inactive => "inactive",
        Rejected => "rejected",
    }
}

api_enum! {
    /// How identity verification runs when a customer is created
    pub enum ProcessingMethod {
        Inline => "inline",
        Background => "background",
        Skip => "skip",
    }
}

api_enum! {
    /// Forced verification result in the sandbox environment
    pub enum SandboxOutcome {
        Standard => "standard",
        Verified => "verified",
        Rejected => "rejected",
        Review => "review",
    }
}

api_enum! {
    /// Manual decision on a customer under review
    pub enum ReviewDecision {
        Verified => "verified",
        Rejected => "rejected",
    }
}

api_enum! {
    /// Outcome of an identity check
    pub enum IdentityDecision {
        Accept => "accept",
        Reject => "reject",
        Review => "review",
    }
}

api_enum! {
    pub enum SortOrder {
        Asc => "asc",
        Desc => "desc",
    }
}

api_enum! {
    pub enum CustomerSortBy {
        Name => "name",
        CreatedAt => "created_at",
    }
}

api_enum! {
    pub enum OrganizationSortBy {
        Name => "name",
        CreatedAt => "created_at",
    }
}

api_enum! {
    /// Shape of the `data` member in a response envelope
    pub enum ResponseType {
        Object => "object",
        Array => "array",
        Error => "error",
        None => "none",
    }
}
