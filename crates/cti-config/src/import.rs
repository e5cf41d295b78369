//! Validated, typed configuration handed to the import pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use cti_common::{AccountRegion, DataType};
use serde::Serialize;
use std::path::PathBuf;

use crate::filter::FilterSet;

/// Where records are read from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Local CSV file.
    Csv { path: PathBuf },
    /// Live export through the Mixpanel API.
    MixpanelExport { secret: String },
    /// Files previously exported from Mixpanel, in the order supplied.
    MixpanelFiles { paths: Vec<PathBuf> },
    /// A named external service.
    ImportService(ImportService),
}

impl DataSource {
    /// Short name used in logs and run plans.
    pub fn kind(&self) -> &'static str {
        match self {
            DataSource::Csv { .. } => "csv",
            DataSource::MixpanelExport { .. } => "mixpanel_export",
            DataSource::MixpanelFiles { .. } => "mixpanel_files",
            DataSource::ImportService(ImportService::Mparticle(_)) => "mparticle",
            DataSource::ImportService(ImportService::Other(_)) => "import_service",
        }
    }
}

/// External import services.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportService {
    /// mParticle exports delivered to S3.
    Mparticle(S3Location),
    /// Any other service name; no extra options are required for it.
    Other(String),
}

/// AWS credentials and bucket for an S3-delivered export.
#[derive(Clone, PartialEq)]
pub struct S3Location {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
}

impl std::fmt::Debug for S3Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Location")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[redacted]")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Inclusive export window. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| s <= date) && self.end.is_none_or(|e| date <= e)
    }
}

/// Destination account.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredentials {
    pub id: String,
    pub passcode: String,
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("id", &self.id)
            .field("passcode", &"[redacted]")
            .finish()
    }
}

/// Fully validated configuration for one run. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    pub source: DataSource,
    /// Additional sources that were supplied but are not read.
    pub ignored_sources: Vec<&'static str>,
    pub schema_path: Option<PathBuf>,
    pub account: AccountCredentials,
    pub region: AccountRegion,
    pub data_type: DataType,
    /// Required for CSV event uploads; optional otherwise.
    pub event_name: Option<String>,
    pub dates: DateRange,
    /// Unix seconds; `0` means "from the beginning".
    pub start_ts: f64,
    pub dry_run: bool,
    pub filter_events: FilterSet,
}

impl ImportConfig {
    /// `start_ts` as a UTC instant, if one was given.
    pub fn start_timestamp(&self) -> Option<DateTime<Utc>> {
        if !self.start_ts.is_finite() || self.start_ts <= 0.0 {
            return None;
        }
        let secs = self.start_ts.trunc() as i64;
        let nanos = (self.start_ts.fract() * 1e9).round() as u32;
        DateTime::from_timestamp(secs, nanos.min(999_999_999))
    }

    /// Whether records for `event_name` should be uploaded.
    pub fn accepts_event(&self, event_name: &str) -> bool {
        !self.filter_events.contains(event_name)
    }
}
