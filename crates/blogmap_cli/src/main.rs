//! Runs the blogmap walkthrough against a fresh in-memory store.
//!
//! # Responsibility
//! - Set up file logging under the system temp directory.
//! - Print the narrated walkthrough to stdout.
//! - Exit non-zero on the first failure.

use blogmap_core::{default_log_level, init_logging, run_walkthrough, StoreConfig, StoreContext};
use log::{error, info};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let log_dir = std::env::temp_dir().join("blogmap").join("logs");
    if let Err(err) = init_logging(default_log_level(), &log_dir) {
        eprintln!("logging disabled: {err}");
    }
    info!(
        "event=cli_run module=cli status=start core_version={}",
        blogmap_core::core_version()
    );
    eprintln!("blogmap_core version={}", blogmap_core::core_version());

    let ctx = match StoreContext::open(&StoreConfig::in_memory()) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("event=cli_run module=cli status=error stage=open error={err}");
            eprintln!("failed to open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run_walkthrough(&ctx, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error stage=walkthrough error={err}");
            eprintln!("walkthrough aborted: {err}");
            ExitCode::FAILURE
        }
    }
}
