//! CleverTap importer configuration snapshot and validation.
//!
//! This crate provides:
//! - The raw option snapshot produced by the command line
//! - The cross-option validation rules and the validated [`ImportConfig`]
//! - Strict `yyyy-mm-dd` date parsing
//! - Schema file loading and the filter-event set

pub mod date;
pub mod filter;
pub mod import;
pub mod schema;
pub mod snapshot;
pub mod validate;

pub use filter::{build_filter_set, FilterSet};
pub use import::{DataSource, DateRange, ImportConfig, ImportService, S3Location};
pub use schema::{load_schema, SchemaError, SchemaMapping};
pub use snapshot::ConfigSnapshot;
pub use validate::{is_valid, validate, DateField, Rule, ValidationError};

/// Import service name that requires AWS/S3 credentials.
pub const MPARTICLE_SERVICE: &str = "mparticle";
