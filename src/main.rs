use anyhow::Result;
use clap::Parser;
use logsift::cli::{Cli, Commands};
use logsift::commands::{resolve_options, run_search, SearchArgs};
use logsift::config::load_config;
use logsift::observability::init_tracing;
use std::io::{self, BufWriter};
use std::process::ExitCode;

/// Exit code for errors, distinct from "no match" (1)
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Search {
            pattern,
            root,
            glob,
            ignore_case,
            invert_match,
            max_count,
            with_path,
            skip_unreadable,
            skip_traversal_errors,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let options = resolve_options(
                SearchArgs {
                    pattern,
                    root,
                    glob,
                    ignore_case,
                    invert_match,
                    max_count,
                    with_path,
                    skip_unreadable,
                    skip_traversal_errors,
                },
                &config,
            );

            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let outcome = run_search(&options, &mut out)?;
            Ok(outcome.exit_code() as u8)
        }
        Commands::Init { force } => {
            logsift::commands::init_config(force)?;
            Ok(0)
        }
    }
}
