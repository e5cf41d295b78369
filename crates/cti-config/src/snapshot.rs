//! Raw option snapshot, as parsed from the command line.
//!
//! Every string field uses the empty string for "not supplied", matching the
//! flag defaults. Nothing here is checked; see [`crate::validate`].

use serde::{Deserialize, Serialize};

/// Options for one importer run, before validation.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSnapshot {
    pub csv_file_path: String,
    pub schema_file_path: String,
    pub mixpanel_secret: String,
    /// Pre-exported Mixpanel event files, in the order supplied.
    pub mixpanel_event_file_paths: Vec<String>,
    pub import_service: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_region: String,
    pub s3_bucket: String,
    /// `yyyy-mm-dd`
    pub start_date: String,
    /// `yyyy-mm-dd`
    pub end_date: String,
    pub start_ts: f64,
    pub account_id: String,
    pub account_passcode: String,
    pub event_name: String,
    /// `profile` or `event`; kept verbatim so validation can report bad input.
    pub data_type: String,
    /// `eu` or `in`; kept verbatim so validation can report bad input.
    pub account_region: String,
    pub dry_run: bool,
    /// Events to drop before upload, in the order supplied, duplicates kept.
    pub filter_events: Vec<String>,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            csv_file_path: String::new(),
            schema_file_path: String::new(),
            mixpanel_secret: String::new(),
            mixpanel_event_file_paths: Vec::new(),
            import_service: String::new(),
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            aws_region: String::new(),
            s3_bucket: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            start_ts: 0.0,
            account_id: String::new(),
            account_passcode: String::new(),
            event_name: String::new(),
            data_type: "profile".to_string(),
            account_region: "eu".to_string(),
            dry_run: false,
            filter_events: Vec::new(),
        }
    }
}

impl ConfigSnapshot {
    /// Whether any data source option is set.
    pub fn has_source(&self) -> bool {
        !self.csv_file_path.is_empty()
            || !self.mixpanel_secret.is_empty()
            || !self.mixpanel_event_file_paths.is_empty()
            || !self.import_service.is_empty()
    }

    pub fn has_credentials(&self) -> bool {
        !self.account_id.is_empty() && !self.account_passcode.is_empty()
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSnapshot")
            .field("csv_file_path", &self.csv_file_path)
            .field("schema_file_path", &self.schema_file_path)
            .field("mixpanel_secret", &redacted(&self.mixpanel_secret))
            .field("mixpanel_event_file_paths", &self.mixpanel_event_file_paths)
            .field("import_service", &self.import_service)
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &redacted(&self.aws_secret_access_key))
            .field("aws_region", &self.aws_region)
            .field("s3_bucket", &self.s3_bucket)
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("start_ts", &self.start_ts)
            .field("account_id", &self.account_id)
            .field("account_passcode", &redacted(&self.account_passcode))
            .field("event_name", &self.event_name)
            .field("data_type", &self.data_type)
            .field("account_region", &self.account_region)
            .field("dry_run", &self.dry_run)
            .field("filter_events", &self.filter_events)
            .finish()
    }
}

pub(crate) fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "[redacted]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_flag_defaults() {
        let snap = ConfigSnapshot::default();
        assert_eq!(snap.data_type, "profile");
        assert_eq!(snap.account_region, "eu");
        assert_eq!(snap.start_ts, 0.0);
        assert!(!snap.dry_run);
        assert!(!snap.has_source());
        assert!(!snap.has_credentials());
    }

    #[test]
    fn any_source_counts() {
        let snap = ConfigSnapshot {
            mixpanel_event_file_paths: vec!["a.json".into()],
            ..Default::default()
        };
        assert!(snap.has_source());

        let snap = ConfigSnapshot {
            import_service: "mparticle".into(),
            ..Default::default()
        };
        assert!(snap.has_source());
    }

    #[test]
    fn debug_hides_secrets() {
        let snap = ConfigSnapshot {
            account_passcode: "hunter2".into(),
            mixpanel_secret: "mp-secret".into(),
            aws_secret_access_key: "aws-secret".into(),
            ..Default::default()
        };
        let dbg = format!("{:?}", snap);
        assert!(!dbg.contains("hunter2"));
        assert!(!dbg.contains("mp-secret"));
        assert!(!dbg.contains("aws-secret"));
        assert!(dbg.contains("[redacted]"));
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let snap: ConfigSnapshot =
            serde_json::from_str(r#"{"csv_file_path":"f.csv","account_id":"a"}"#).unwrap();
        assert_eq!(snap.csv_file_path, "f.csv");
        assert_eq!(snap.data_type, "profile");
    }
}
