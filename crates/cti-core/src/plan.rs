//! Run plan: what a validated invocation is going to do.
//!
//! The plan is a pure data struct rendered either as aligned text or JSON.
//! Secrets never appear in it.

use cti_common::{AccountRegion, DataType, SCHEMA_VERSION};
use cti_config::date::format_date;
use cti_config::{DataSource, ImportConfig, ImportService, Rule, SchemaMapping, ValidationError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Source description without credentials.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourcePlan {
    Csv {
        path: String,
    },
    MixpanelExport,
    MixpanelFiles {
        paths: Vec<String>,
    },
    Mparticle {
        bucket: String,
        aws_region: String,
        access_key_id: String,
    },
    ImportService {
        name: String,
    },
}

impl SourcePlan {
    fn from_source(source: &DataSource) -> Self {
        match source {
            DataSource::Csv { path } => SourcePlan::Csv {
                path: path.display().to_string(),
            },
            DataSource::MixpanelExport { .. } => SourcePlan::MixpanelExport,
            DataSource::MixpanelFiles { paths } => SourcePlan::MixpanelFiles {
                paths: paths.iter().map(|p| p.display().to_string()).collect(),
            },
            DataSource::ImportService(ImportService::Mparticle(loc)) => SourcePlan::Mparticle {
                bucket: loc.bucket.clone(),
                aws_region: loc.region.clone(),
                access_key_id: loc.access_key_id.clone(),
            },
            DataSource::ImportService(ImportService::Other(name)) => {
                SourcePlan::ImportService { name: name.clone() }
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            SourcePlan::Csv { path } => format!("csv file {path}"),
            SourcePlan::MixpanelExport => "Mixpanel export API".to_string(),
            SourcePlan::MixpanelFiles { paths } => {
                format!("Mixpanel event files ({}): {}", paths.len(), paths.join(", "))
            }
            SourcePlan::Mparticle {
                bucket, aws_region, ..
            } => format!("mparticle via s3://{bucket} ({aws_region})"),
            SourcePlan::ImportService { name } => format!("import service {name}"),
        }
    }
}

/// Schema columns attached to the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaPlan {
    pub path: String,
    pub columns: BTreeMap<String, String>,
}

/// Everything the upload pipeline will be handed, minus secrets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunPlan {
    pub schema_version: &'static str,
    pub status: &'static str,
    pub source: SourcePlan,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored_sources: Vec<&'static str>,
    pub data_type: DataType,
    pub event_name: Option<String>,
    pub account_id: String,
    pub region: AccountRegion,
    pub api_host: &'static str,
    pub dry_run: bool,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_timestamp: Option<String>,
    pub filter_events: Vec<String>,
    pub schema: Option<SchemaPlan>,
}

impl RunPlan {
    pub fn new(config: &ImportConfig, schema: Option<&SchemaMapping>) -> Self {
        let schema = match (&config.schema_path, schema) {
            (Some(path), Some(mapping)) => Some(SchemaPlan {
                path: path.display().to_string(),
                columns: mapping
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }),
            _ => None,
        };

        Self {
            schema_version: SCHEMA_VERSION,
            status: "ok",
            source: SourcePlan::from_source(&config.source),
            ignored_sources: config.ignored_sources.clone(),
            data_type: config.data_type,
            event_name: config.event_name.clone(),
            account_id: config.account.id.clone(),
            region: config.region,
            api_host: config.region.api_host(),
            dry_run: config.dry_run,
            start_date: config.dates.start.map(format_date),
            end_date: config.dates.end.map(format_date),
            start_timestamp: config.start_timestamp().map(|ts| ts.to_rfc3339()),
            filter_events: config
                .filter_events
                .sorted()
                .into_iter()
                .map(str::to_string)
                .collect(),
            schema,
        }
    }

    /// Aligned text block for terminals.
    pub fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<15}{}", "source:", self.source.describe());
        if !self.ignored_sources.is_empty() {
            let _ = writeln!(out, "{:<15}{}", "ignored:", self.ignored_sources.join(", "));
        }
        let data_type = match &self.event_name {
            Some(name) => format!("{} ({name})", self.data_type),
            None => self.data_type.to_string(),
        };
        let _ = writeln!(out, "{:<15}{}", "data type:", data_type);
        let _ = writeln!(
            out,
            "{:<15}{} ({}, {})",
            "account:", self.account_id, self.region, self.api_host
        );
        let _ = writeln!(
            out,
            "{:<15}{}",
            "dry run:",
            if self.dry_run { "yes" } else { "no" }
        );
        if self.start_date.is_some() || self.end_date.is_some() {
            let _ = writeln!(
                out,
                "{:<15}{} .. {}",
                "dates:",
                self.start_date.as_deref().unwrap_or("open"),
                self.end_date.as_deref().unwrap_or("open")
            );
        }
        if let Some(ts) = &self.start_timestamp {
            let _ = writeln!(out, "{:<15}{}", "start ts:", ts);
        }
        if !self.filter_events.is_empty() {
            let _ = writeln!(out, "{:<15}{}", "filtered:", self.filter_events.join(", "));
        }
        if let Some(schema) = &self.schema {
            let _ = writeln!(
                out,
                "{:<15}{} ({} columns)",
                "schema:",
                schema.path,
                schema.columns.len()
            );
        }
        out
    }
}

/// JSON body emitted when validation rejects the options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidReport {
    pub schema_version: &'static str,
    pub status: &'static str,
    pub rule: Rule,
    pub rule_number: u8,
    pub message: String,
}

impl InvalidReport {
    pub fn new(err: &ValidationError) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            status: "invalid",
            rule: err.rule(),
            rule_number: err.rule().number(),
            message: err.to_string(),
        }
    }
}

/// JSON body emitted for any other failure after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub schema_version: &'static str,
    pub status: &'static str,
    pub code: u32,
    pub message: String,
}

impl ErrorReport {
    pub fn new(err: &cti_common::Error) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            status: "error",
            code: err.code(),
            message: err.to_string(),
        }
    }
}
