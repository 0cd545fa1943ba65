//! Completeness validation and confidence scoring for parsed notes.

pub mod schema;
pub mod score;

pub use schema::{CRITICAL_PREFIX, validate};
pub use score::{CRITICAL_WEIGHT, MISSING_WEIGHT, score};
