//! CleverTap importer common types and errors.
//!
//! This crate provides foundational types shared across the importer crates:
//! - Data type and account region vocabularies
//! - Output format and JSON schema versioning
//! - Common error type with stable codes

pub mod error;
pub mod kinds;
pub mod output;

pub use error::Error;
pub use kinds::{AccountRegion, DataType, UnknownValue};
pub use output::{OutputFormat, SCHEMA_VERSION};
