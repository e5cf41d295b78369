use cti_common::OutputFormat;
use cti_core::logging::{self, LogFormat};
use cti_core::{run, Cli, ExitCode};

fn main() {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors go to stderr; help and version to stdout.
            let _ = e.print();
            std::process::exit(ExitCode::for_parse_error(&e).as_i32());
        }
    };

    logging::init(match cli.format {
        OutputFormat::Human => LogFormat::Text,
        OutputFormat::Json => LogFormat::Json,
    });

    let mut stdout = std::io::stdout().lock();
    let code: ExitCode = run(&cli, &mut stdout);
    drop(stdout);
    std::process::exit(code.as_i32());
}
