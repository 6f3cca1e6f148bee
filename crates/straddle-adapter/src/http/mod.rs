/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod customers;
pub mod error;
pub mod headers;
pub mod organizations;
pub mod pagination;
pub mod query;
pub mod reports;
pub mod review;

pub use error::{Result, StraddleError};

pub use client::{ClientConfig, Environment, StraddleClient};
pub use headers::RequestHeaders;
pub use pagination::{Paginated, paginate};
pub use query::QueryParams;
