/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Straddle adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod types;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    Environment,
    Paginated,
    RequestHeaders,
    Result,
    StraddleClient,
    StraddleError,
};

// Re-export all types
pub use types::*;
