//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps and the error vocabulary used across the
//! operations assistant.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::RunId;
pub use timestamp::Timestamp;
