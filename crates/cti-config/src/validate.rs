//! Cross-option validation.
//!
//! Rules are evaluated in a fixed order and the first failure wins, so each
//! rejected snapshot produces exactly one diagnostic:
//!
//! 1. a data source plus account id and passcode are present
//! 2. CSV and Mixpanel export are not both selected
//! 3. data type is `profile` or `event`
//! 4. CSV event uploads name the event
//! 5. Mixpanel event exports have a start date
//! 6. Mixpanel event export dates are `yyyy-mm-dd`
//! 7. start date is not after end date
//! 8. Mixpanel event files are only used for events
//! 9. region is `eu` or `in`
//! 10. mParticle imports carry the full AWS/S3 credential set
//!
//! Later rules may assume earlier ones passed.

use chrono::NaiveDate;
use cti_common::{AccountRegion, DataType, UnknownValue};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::date::parse_date;
use crate::filter::FilterSet;
use crate::import::{
    AccountCredentials, DataSource, DateRange, ImportConfig, ImportService, S3Location,
};
use crate::snapshot::ConfigSnapshot;
use crate::MPARTICLE_SERVICE;

/// The validation rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    SourcePresence,
    SourceExclusivity,
    DataType,
    EventName,
    ExportStartDate,
    DateFormat,
    DateOrder,
    EventFileType,
    Region,
    MparticleCredentials,
}

impl Rule {
    pub const ALL: [Rule; 10] = [
        Rule::SourcePresence,
        Rule::SourceExclusivity,
        Rule::DataType,
        Rule::EventName,
        Rule::ExportStartDate,
        Rule::DateFormat,
        Rule::DateOrder,
        Rule::EventFileType,
        Rule::Region,
        Rule::MparticleCredentials,
    ];

    /// 1-based position in the evaluation order.
    pub fn number(self) -> u8 {
        match self {
            Rule::SourcePresence => 1,
            Rule::SourceExclusivity => 2,
            Rule::DataType => 3,
            Rule::EventName => 4,
            Rule::ExportStartDate => 5,
            Rule::DateFormat => 6,
            Rule::DateOrder => 7,
            Rule::EventFileType => 8,
            Rule::Region => 9,
            Rule::MparticleCredentials => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rule::SourcePresence => "source_presence",
            Rule::SourceExclusivity => "source_exclusivity",
            Rule::DataType => "data_type",
            Rule::EventName => "event_name",
            Rule::ExportStartDate => "export_start_date",
            Rule::DateFormat => "date_format",
            Rule::DateOrder => "date_order",
            Rule::EventFileType => "event_file_type",
            Rule::Region => "region",
            Rule::MparticleCredentials => "mparticle_credentials",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which date option a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    Start,
    End,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Start => write!(f, "start date"),
            DateField::End => write!(f, "end date"),
        }
    }
}

/// Why a snapshot was rejected. One variant per rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "a data source (csv file, Mixpanel secret, Mixpanel events file or import service), \
         account id and passcode are mandatory"
    )]
    MissingSourceOrCredentials,

    #[error("both Mixpanel secret and CSV file path detected; only one data source is allowed")]
    AmbiguousSource,

    #[error("type can be either profile or event, got '{0}'")]
    InvalidDataType(String),

    #[error("event name is mandatory for event csv uploads")]
    MissingEventName,

    #[error("start date is mandatory when exporting events from Mixpanel (format: yyyy-mm-dd)")]
    MissingStartDate,

    #[error("{field} '{value}' is not in correct format (format: yyyy-mm-dd)")]
    InvalidDateFormat { field: DateField, value: String },

    #[error("start date {start} cannot be after end date {end}")]
    StartAfterEnd { start: String, end: String },

    #[error("Mixpanel events files are supported only with events, got type '{data_type}'")]
    EventFilesRequireEventType { data_type: String },

    #[error("region can be either eu or in, got '{0}'")]
    InvalidRegion(String),

    #[error(
        "importing from mparticle requires AWS access key, secret key, region, and S3 bucket \
         (missing: {})",
        .missing.join(", ")
    )]
    IncompleteMparticleCredentials { missing: Vec<&'static str> },
}

impl ValidationError {
    /// The rule this error violates.
    pub fn rule(&self) -> Rule {
        match self {
            ValidationError::MissingSourceOrCredentials => Rule::SourcePresence,
            ValidationError::AmbiguousSource => Rule::SourceExclusivity,
            ValidationError::InvalidDataType(_) => Rule::DataType,
            ValidationError::MissingEventName => Rule::EventName,
            ValidationError::MissingStartDate => Rule::ExportStartDate,
            ValidationError::InvalidDateFormat { .. } => Rule::DateFormat,
            ValidationError::StartAfterEnd { .. } => Rule::DateOrder,
            ValidationError::EventFilesRequireEventType { .. } => Rule::EventFileType,
            ValidationError::InvalidRegion(_) => Rule::Region,
            ValidationError::IncompleteMparticleCredentials { .. } => Rule::MparticleCredentials,
        }
    }
}

impl From<ValidationError> for cti_common::Error {
    fn from(err: ValidationError) -> Self {
        cti_common::Error::Config(err.to_string())
    }
}

/// Check every rule against `snap` and build the typed configuration.
pub fn validate(snap: &ConfigSnapshot) -> Result<ImportConfig, ValidationError> {
    match check_rules(snap) {
        Ok(checked) => {
            let config = build_config(snap, checked);
            debug!(
                source = config.source.kind(),
                data_type = %config.data_type,
                region = %config.region,
                dry_run = config.dry_run,
                "configuration valid"
            );
            Ok(config)
        }
        Err(e) => {
            debug!(rule = %e.rule(), rule_number = e.rule().number(), "configuration rejected");
            Err(e)
        }
    }
}

/// Boolean form of [`validate`]. Logs one diagnostic line on failure.
pub fn is_valid(snap: &ConfigSnapshot) -> bool {
    match validate(snap) {
        Ok(_) => true,
        Err(e) => {
            error!(rule = %e.rule(), "{e}");
            false
        }
    }
}

/// Values parsed while checking, reused to build the config.
struct Checked {
    data_type: DataType,
    region: AccountRegion,
}

fn check_rules(snap: &ConfigSnapshot) -> Result<Checked, ValidationError> {
    if !snap.has_source() || !snap.has_credentials() {
        return Err(ValidationError::MissingSourceOrCredentials);
    }

    if !snap.csv_file_path.is_empty() && !snap.mixpanel_secret.is_empty() {
        return Err(ValidationError::AmbiguousSource);
    }

    let data_type: DataType = snap
        .data_type
        .parse()
        .map_err(|UnknownValue(v)| ValidationError::InvalidDataType(v))?;

    if !snap.csv_file_path.is_empty() && snap.event_name.is_empty() && data_type == DataType::Event
    {
        return Err(ValidationError::MissingEventName);
    }

    let exporting_events = !snap.mixpanel_secret.is_empty() && data_type == DataType::Event;

    if exporting_events && snap.start_date.is_empty() {
        return Err(ValidationError::MissingStartDate);
    }

    if exporting_events {
        check_date_format(DateField::Start, &snap.start_date)?;
        check_date_format(DateField::End, &snap.end_date)?;
    }

    if !snap.start_date.is_empty() && !snap.end_date.is_empty() {
        // Unparseable dates can only reach this point outside the Mixpanel
        // export path; they compare as 0001-01-01.
        let start = parse_date(&snap.start_date).unwrap_or_else(unparsed_date);
        let end = parse_date(&snap.end_date).unwrap_or_else(unparsed_date);
        if start > end {
            return Err(ValidationError::StartAfterEnd {
                start: snap.start_date.clone(),
                end: snap.end_date.clone(),
            });
        }
    }

    if !snap.mixpanel_event_file_paths.is_empty() && data_type != DataType::Event {
        return Err(ValidationError::EventFilesRequireEventType {
            data_type: data_type.to_string(),
        });
    }

    let region: AccountRegion = snap
        .account_region
        .parse()
        .map_err(|UnknownValue(v)| ValidationError::InvalidRegion(v))?;

    if snap.import_service == MPARTICLE_SERVICE {
        let missing: Vec<&'static str> = [
            ("awsSecretAccessKey", &snap.aws_secret_access_key),
            ("awsAccessKeyID", &snap.aws_access_key_id),
            ("s3Bucket", &snap.s3_bucket),
            ("awsRegion", &snap.aws_region),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(flag, _)| flag)
        .collect();
        if !missing.is_empty() {
            return Err(ValidationError::IncompleteMparticleCredentials { missing });
        }
    }

    Ok(Checked { data_type, region })
}

/// Stand-in for a date that failed to parse when ordering start and end.
fn unparsed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn check_date_format(field: DateField, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_date(value).is_some() {
        return Ok(());
    }
    Err(ValidationError::InvalidDateFormat {
        field,
        value: value.to_string(),
    })
}

fn build_config(snap: &ConfigSnapshot, checked: Checked) -> ImportConfig {
    let (source, ignored_sources) = select_source(snap);
    for kind in &ignored_sources {
        warn!(
            source = source.kind(),
            ignored = kind,
            "multiple data sources supplied; only the first is read"
        );
    }

    ImportConfig {
        source,
        ignored_sources,
        schema_path: non_empty(&snap.schema_file_path).map(PathBuf::from),
        account: AccountCredentials {
            id: snap.account_id.clone(),
            passcode: snap.account_passcode.clone(),
        },
        region: checked.region,
        data_type: checked.data_type,
        event_name: non_empty(&snap.event_name).map(str::to_string),
        dates: DateRange {
            start: lenient_date(DateField::Start, &snap.start_date),
            end: lenient_date(DateField::End, &snap.end_date),
        },
        start_ts: snap.start_ts,
        dry_run: snap.dry_run,
        filter_events: FilterSet::from_flags(&snap.filter_events),
    }
}

/// Pick the source to read. Precedence: CSV, Mixpanel export, Mixpanel
/// event files, import service. The kinds of any others are returned too.
fn select_source(snap: &ConfigSnapshot) -> (DataSource, Vec<&'static str>) {
    let mut found: Vec<DataSource> = Vec::new();

    if !snap.csv_file_path.is_empty() {
        found.push(DataSource::Csv {
            path: PathBuf::from(&snap.csv_file_path),
        });
    }
    if !snap.mixpanel_secret.is_empty() {
        found.push(DataSource::MixpanelExport {
            secret: snap.mixpanel_secret.clone(),
        });
    }
    if !snap.mixpanel_event_file_paths.is_empty() {
        found.push(DataSource::MixpanelFiles {
            paths: snap
                .mixpanel_event_file_paths
                .iter()
                .map(PathBuf::from)
                .collect(),
        });
    }
    if !snap.import_service.is_empty() {
        let service = if snap.import_service == MPARTICLE_SERVICE {
            ImportService::Mparticle(S3Location {
                access_key_id: snap.aws_access_key_id.clone(),
                secret_access_key: snap.aws_secret_access_key.clone(),
                region: snap.aws_region.clone(),
                bucket: snap.s3_bucket.clone(),
            })
        } else {
            ImportService::Other(snap.import_service.clone())
        };
        found.push(DataSource::ImportService(service));
    }

    let mut found = found.into_iter();
    // Rule 1 guarantees at least one source.
    let primary = found.next().unwrap_or(DataSource::Csv {
        path: PathBuf::new(),
    });
    let ignored = found.map(|s| s.kind()).collect();
    (primary, ignored)
}

fn lenient_date(field: DateField, value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    let parsed = parse_date(value);
    if parsed.is_none() {
        warn!(%field, value, "ignoring date not in yyyy-mm-dd format");
    }
    parsed
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
