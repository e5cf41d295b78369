//! Exit codes for the cti CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.

/// Exit codes for cti operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Options valid, run plan produced
    Clean = 0,

    /// Usage error reported by the argument parser
    Usage = 2,

    /// Options failed validation
    ConfigInvalid = 10,

    /// Schema file could not be decoded
    SchemaInvalid = 11,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Exit code for an argument parser failure; help and version output
    /// are not failures.
    pub fn for_parse_error(err: &clap::Error) -> Self {
        if err.use_stderr() {
            ExitCode::Usage
        } else {
            ExitCode::Clean
        }
    }

    /// Map a unified error onto its exit code.
    pub fn for_error(err: &cti_common::Error) -> Self {
        match err {
            cti_common::Error::Config(_) => ExitCode::ConfigInvalid,
            cti_common::Error::InvalidSchema(_) => ExitCode::SchemaInvalid,
            cti_common::Error::Io(_) => ExitCode::IoError,
            cti_common::Error::Json(_) => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}
