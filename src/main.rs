//! ConnectWise Latency Probe - CLI entry point
//!
//! Prompts for the probe kind, interval and parallelism, then times probe
//! rounds until a termination signal arrives.

use chrono::Local;
use cw_latency_probe::{
    cli,
    config::env::{ApiEnv, DbEnv},
    config::{self, ProbeKind},
    error::{AppError, Result},
    probe::{ApiProbe, Probe, SqlProbe},
    session::{SessionContext, SessionController},
    shutdown,
    sink::ResultSink,
    Logger, PKG_NAME, VERSION,
};
use std::path::Path;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // A panic in a probe task is caught at the round boundary; this hook only
    // makes sure whatever panics do surface are readable.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
    }));

    if let Err(e) = run_application().await {
        eprintln!("Error: {}", e.format_for_console(true));
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }

    // Graceful shutdown always exits 0.
    process::exit(0);
}

async fn run_application() -> Result<()> {
    let log = Logger::new("MAIN");
    log.info(&format!("{} v{}", PKG_NAME, VERSION));

    if config::env::load_env_file()? {
        log.info("Loaded configuration from .env file");
    }

    // AwaitingInput: three sequential prompts, defaults on unrecognized input.
    let run_config = cli::prompt_run_config()?;

    log.info("Starting tests.  Ctrl-C to exit.");
    log.info(&format!(
        "Test Settings: test={} interval={}ms parallelism={}",
        run_config.kind,
        run_config.interval.as_millis(),
        run_config.parallelism,
    ));

    let started = Local::now();
    let file_name = run_config.output_file_name(started);
    let mut sink = ResultSink::open(Path::new(&file_name))?;
    sink.write_header()?;
    log.info(&format!("Appending results to {}", file_name));

    // Connecting (SQL only): a connect failure is logged and the session
    // proceeds; probes then fail individually.
    let probe: Arc<dyn Probe> = match run_config.kind {
        ProbeKind::Mssql => {
            let sql = SqlProbe::new(&DbEnv::from_env(), run_config.parallelism);
            if let Err(e) = sql.warm_connect().await {
                log.error(&format!("Error connecting to SQL Server: {}", e));
            }
            Arc::new(sql)
        }
        ProbeKind::CwApi => Arc::new(ApiProbe::new(&ApiEnv::from_env())?),
    };

    let ctx = SessionContext {
        config: run_config,
        probe,
        log: log.for_component("SESSION"),
    };
    SessionController::new(ctx)
        .run(sink, shutdown::wait_for_signal())
        .await?;

    log.info("Shutdown complete");
    Ok(())
}

/// Print helpful suggestions for common setup errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - MSSQL probes need DB_USER, DB_PASS, DB_NAME, DB_SERVER");
            eprintln!("  - API probes need API_PUBLIC, API_PRIVATE, API_COMPANY, API_SERVER");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("Output troubleshooting:");
            eprintln!("  - Check write permissions in the working directory");
            eprintln!("  - Check available disk space");
        }
        _ => {}
    }
}
