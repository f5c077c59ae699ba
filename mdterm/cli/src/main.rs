use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Context, Result};
use mdterm_cli::{Cli, run};
use mdterm_lib::markdown::RenderOptions;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber based on verbosity level.
///
/// Verbosity levels:
/// - 0 (default): no logging
/// - 1 (-v): INFO
/// - 2 (-vv): DEBUG
/// - 3 (-vvv): TRACE
/// - 4+ (-vvvv): TRACE with file/line numbers
fn init_tracing(verbose: u8) {
    if verbose == 0 {
        return;
    }

    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            1 => "warn,mdterm=info,mdterm_cli=info,mdterm_lib=info".to_string(),
            2 => "info,mdterm=debug,mdterm_cli=debug,mdterm_lib=debug".to_string(),
            _ => "debug,mdterm=trace,mdterm_cli=trace,mdterm_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "mdterm", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let options = cli.resolve_options(RenderOptions::detect());
    let stdout = io::stdout();
    let stderr = io::stderr();
    let ok = run(
        &cli.input_paths(),
        &options,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
    .wrap_err("Failed to write output")?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
