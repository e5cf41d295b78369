//! Command-line options.
//!
//! Flag names follow the importer's historical spelling (`--mixpanelSecret`,
//! `--evtName`, ...). The original tool also accepted single-dash long flags
//! such as `-csv f.csv`; [`normalize_args`] rewrites those before clap parses.

use clap::{ArgAction, CommandFactory, Parser};
use cti_common::OutputFormat;
use cti_config::ConfigSnapshot;
use std::ffi::OsString;

/// Validate importer options and print the resulting run plan.
#[derive(Parser, Debug)]
#[command(name = "cti", version, about, long_about = None)]
pub struct Cli {
    /// Absolute path to a Mixpanel events file (repeatable)
    #[arg(long = "mixpanelEventsFile", value_name = "PATH")]
    pub mixpanel_events_files: Vec<String>,

    /// Event to be filtered, i.e. not uploaded (repeatable)
    #[arg(long = "filterEvent", value_name = "EVENT")]
    pub filter_events: Vec<String>,

    /// Absolute path to the csv file
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<String>,

    /// Absolute path to the schema file
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<String>,

    /// Mixpanel API secret key
    #[arg(
        long = "mixpanelSecret",
        env = "MIXPANEL_SECRET",
        hide_env_values = true
    )]
    pub mixpanel_secret: Option<String>,

    /// Service to import data from (e.g. mparticle)
    #[arg(long = "importService", value_name = "NAME")]
    pub import_service: Option<String>,

    /// AWS access key id
    #[arg(
        long = "awsAccessKeyID",
        env = "AWS_ACCESS_KEY_ID",
        hide_env_values = true
    )]
    pub aws_access_key_id: Option<String>,

    /// AWS secret access key
    #[arg(
        long = "awsSecretAccessKey",
        env = "AWS_SECRET_ACCESS_KEY",
        hide_env_values = true
    )]
    pub aws_secret_access_key: Option<String>,

    /// AWS region
    #[arg(long = "awsRegion")]
    pub aws_region: Option<String>,

    /// S3 bucket
    #[arg(long = "s3Bucket")]
    pub s3_bucket: Option<String>,

    /// Start date for exporting events <yyyy-mm-dd>
    #[arg(long = "startDate", value_name = "DATE")]
    pub start_date: Option<String>,

    /// End date for exporting events <yyyy-mm-dd>
    #[arg(long = "endDate", value_name = "DATE")]
    pub end_date: Option<String>,

    /// Start timestamp for events upload
    #[arg(long = "startTs", value_name = "SECONDS", default_value_t = 0.0, allow_negative_numbers = true)]
    pub start_ts: f64,

    /// CleverTap account id
    #[arg(long = "id", env = "CLEVERTAP_ACCOUNT_ID", hide_env_values = true)]
    pub account_id: Option<String>,

    /// CleverTap account passcode
    #[arg(
        short = 'p',
        long = "passcode",
        alias = "p",
        env = "CLEVERTAP_ACCOUNT_PASSCODE",
        hide_env_values = true
    )]
    pub account_passcode: Option<String>,

    /// Event name
    #[arg(long = "evtName", value_name = "NAME")]
    pub event_name: Option<String>,

    /// The type of data, either profile or event
    #[arg(short = 't', long = "type", alias = "t", default_value = "profile")]
    pub data_type: String,

    /// The account region, either eu or in
    #[arg(short = 'r', long = "region", alias = "r", default_value = "eu")]
    pub region: String,

    /// Do a dry run, process records but do not upload
    #[arg(
        long = "dryrun",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub dry_run: bool,

    /// Output format for the run plan
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

impl Cli {
    /// Parse process-style arguments, accepting single-dash long flags.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// The raw option snapshot for validation.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            csv_file_path: text(&self.csv),
            schema_file_path: text(&self.schema),
            mixpanel_secret: text(&self.mixpanel_secret),
            mixpanel_event_file_paths: self.mixpanel_events_files.clone(),
            import_service: text(&self.import_service),
            aws_access_key_id: text(&self.aws_access_key_id),
            aws_secret_access_key: text(&self.aws_secret_access_key),
            aws_region: text(&self.aws_region),
            s3_bucket: text(&self.s3_bucket),
            start_date: text(&self.start_date),
            end_date: text(&self.end_date),
            start_ts: self.start_ts,
            account_id: text(&self.account_id),
            account_passcode: text(&self.account_passcode),
            event_name: text(&self.event_name),
            data_type: self.data_type.clone(),
            account_region: self.region.clone(),
            dry_run: self.dry_run,
            filter_events: self.filter_events.clone(),
        }
    }
}

/// Parse `argv` straight into a snapshot.
pub fn parse<I, T>(args: I) -> Result<ConfigSnapshot, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Ok(Cli::try_parse_args(args)?.snapshot())
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Rewrite `-name` / `-name=value` into `--name...` for every registered
/// long flag of two or more characters.
///
/// The first argument (program name) and everything after a bare `--` pass
/// through untouched, as do single-character shorts like `-p`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Cli::command();
    let longs: Vec<&str> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .filter(|long| long.len() > 1)
        .collect();

    let mut out = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().map(Into::into).enumerate() {
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let rewritten = arg.to_str().and_then(|s| {
            let rest = s.strip_prefix('-')?;
            if rest.starts_with('-') {
                return None;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            longs.contains(&name).then(|| OsString::from(format!("-{s}")))
        });
        out.push(rewritten.unwrap_or(arg));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(args: &[&str]) -> ConfigSnapshot {
        let mut argv = vec!["cti"];
        argv.extend_from_slice(args);
        parse(argv).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_flag_table() {
        let snap = parse_ok(&[]);
        assert_eq!(snap.data_type, "profile");
        assert_eq!(snap.account_region, "eu");
        assert_eq!(snap.start_ts, 0.0);
        assert!(!snap.dry_run);
        assert!(snap.csv_file_path.is_empty());
        assert!(snap.filter_events.is_empty());
        assert!(snap.mixpanel_event_file_paths.is_empty());
    }

    #[test]
    fn double_dash_flags_parse() {
        let snap = parse_ok(&[
            "--csv",
            "f.csv",
            "--id",
            "acc",
            "-p",
            "pass",
            "-t",
            "event",
            "--evtName",
            "Charged",
            "-r",
            "in",
            "--dryrun",
            "--startTs",
            "1700000000.5",
        ]);
        assert_eq!(snap.csv_file_path, "f.csv");
        assert_eq!(snap.account_id, "acc");
        assert_eq!(snap.account_passcode, "pass");
        assert_eq!(snap.data_type, "event");
        assert_eq!(snap.event_name, "Charged");
        assert_eq!(snap.account_region, "in");
        assert!(snap.dry_run);
        assert_eq!(snap.start_ts, 1_700_000_000.5);
    }

    #[test]
    fn single_dash_long_flags_parse() {
        let snap = parse_ok(&[
            "-csv",
            "f.csv",
            "-id=acc",
            "-p",
            "pass",
            "-startDate",
            "2023-01-01",
            "-dryrun",
        ]);
        assert_eq!(snap.csv_file_path, "f.csv");
        assert_eq!(snap.account_id, "acc");
        assert_eq!(snap.start_date, "2023-01-01");
        assert!(snap.dry_run);
    }

    #[test]
    fn one_letter_flags_accept_double_dash() {
        let snap = parse_ok(&[
            "--csv", "f.csv", "--id", "a", "--p", "pass", "--t", "event", "--r", "in",
        ]);
        assert_eq!(snap.account_passcode, "pass");
        assert_eq!(snap.data_type, "event");
        assert_eq!(snap.account_region, "in");
    }

    #[test]
    fn dryrun_accepts_explicit_values() {
        assert!(parse_ok(&["-csv", "f.csv", "-dryrun"]).dry_run);
        assert!(parse_ok(&["-csv", "f.csv", "-dryrun=true"]).dry_run);
        assert!(!parse_ok(&["-csv", "f.csv", "-dryrun=false"]).dry_run);
        assert!(!parse_ok(&["-csv", "f.csv"]).dry_run);

        // A bare flag does not swallow the next argument.
        let snap = parse_ok(&["--dryrun", "--csv", "f.csv"]);
        assert!(snap.dry_run);
        assert_eq!(snap.csv_file_path, "f.csv");
    }

    #[test]
    fn repeatable_flags_keep_order_and_duplicates() {
        let snap = parse_ok(&[
            "--filterEvent",
            "e1",
            "--filterEvent",
            "e1",
            "-filterEvent",
            "e2",
            "--mixpanelEventsFile",
            "/b.json",
            "--mixpanelEventsFile",
            "/a.json",
        ]);
        assert_eq!(snap.filter_events, vec!["e1", "e1", "e2"]);
        assert_eq!(snap.mixpanel_event_file_paths, vec!["/b.json", "/a.json"]);
    }

    #[test]
    fn empty_string_means_unset() {
        let snap = parse_ok(&["--csv", "", "--evtName="]);
        assert!(snap.csv_file_path.is_empty());
        assert!(snap.event_name.is_empty());
    }

    #[test]
    fn enum_like_flags_are_not_checked_here() {
        let snap = parse_ok(&["-t", "bogus", "-r", "us"]);
        assert_eq!(snap.data_type, "bogus");
        assert_eq!(snap.account_region, "us");
    }

    #[test]
    fn unknown_flags_are_usage_errors() {
        let err = Cli::try_parse_args(["cti", "--nope"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn malformed_float_is_usage_error() {
        assert!(Cli::try_parse_args(["cti", "--startTs", "soon"]).is_err());
    }

    #[test]
    fn normalize_leaves_values_and_shorts_alone() {
        let out = normalize_args(["cti", "-p", "-csv", "--", "-csv"]);
        assert_eq!(out, vec!["cti", "-p", "--csv", "--", "-csv"]);

        let out = normalize_args(["-csv", "-unknown", "-csv=x", "--csv"]);
        assert_eq!(out, vec!["-csv", "-unknown", "--csv=x", "--csv"]);
    }
}
