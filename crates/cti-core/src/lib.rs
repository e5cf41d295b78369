//! CleverTap importer command-line front end.
//!
//! Parses the importer's options, validates them, loads the optional column
//! schema and renders the run plan handed to the upload pipeline.

pub mod cli;
pub mod exit_codes;
pub mod logging;
pub mod plan;
pub mod run;

pub use cli::{normalize_args, parse, Cli};
pub use exit_codes::ExitCode;
pub use run::run;
