/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

pub mod compliance;
pub mod enums;
pub mod field;
pub mod models;
pub mod requests;
pub mod responses;
pub mod validate;

pub use compliance::*;
pub use enums::*;
pub use field::Nullable;
pub use models::*;
pub use requests::*;
pub use responses::*;
pub use validate::Validate;
