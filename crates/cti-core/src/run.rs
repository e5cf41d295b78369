//! One invocation: validate, load the schema, emit the plan.

use cti_common::OutputFormat;
use cti_config::{validate, SchemaMapping};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, error, info};

use crate::cli::Cli;
use crate::exit_codes::ExitCode;
use crate::plan::{ErrorReport, InvalidReport, RunPlan};

/// Execute a parsed command line, writing results to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> ExitCode {
    let snapshot = cli.snapshot();
    debug!(?snapshot, "options parsed");

    let config = match validate(&snapshot) {
        Ok(config) => config,
        Err(e) => {
            error!(rule = %e.rule(), "{e}");
            if cli.format == OutputFormat::Json {
                return emit_json(out, &InvalidReport::new(&e), ExitCode::ConfigInvalid);
            }
            return ExitCode::ConfigInvalid;
        }
    };

    // The loader logs its own diagnostics.
    let schema = match &config.schema_path {
        Some(path) => match SchemaMapping::from_path(path) {
            Ok(mapping) => Some(mapping),
            Err(e) => {
                let err = cti_common::Error::from(e);
                let code = ExitCode::for_error(&err);
                if cli.format == OutputFormat::Json {
                    return emit_json(out, &ErrorReport::new(&err), code);
                }
                return code;
            }
        },
        None => None,
    };

    let plan = RunPlan::new(&config, schema.as_ref());
    info!(
        source = config.source.kind(),
        data_type = %config.data_type,
        dry_run = config.dry_run,
        filtered = config.filter_events.len(),
        "configuration validated"
    );

    match cli.format {
        OutputFormat::Human => match out.write_all(plan.render_human().as_bytes()) {
            Ok(()) => ExitCode::Clean,
            Err(e) => {
                error!(error = %e, "failed to write run plan");
                ExitCode::IoError
            }
        },
        OutputFormat::Json => emit_json(out, &plan, ExitCode::Clean),
    }
}

fn emit_json<T: Serialize>(out: &mut dyn Write, body: &T, code: ExitCode) -> ExitCode {
    let written = serde_json::to_writer_pretty(&mut *out, body)
        .map_err(cti_common::Error::from)
        .and_then(|()| writeln!(out).map_err(cti_common::Error::from));
    match written {
        Ok(()) => code,
        Err(e) => {
            error!(error = %e, "failed to write output");
            ExitCode::for_error(&e)
        }
    }
}
