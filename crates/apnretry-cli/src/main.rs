use apnretry_core::{config, logging};

mod cli;

use crate::cli::CliCommand;

fn main() {
    let cfg = match config::load_or_init() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("apnretry error: {:#}", err);
            std::process::exit(1);
        }
    };

    // Initialize logging as early as possible; fall back to stderr.
    if logging::init_logging(cfg.log_filter.as_deref()).is_err() {
        logging::init_logging_stderr(cfg.log_filter.as_deref());
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args(&cfg) {
        eprintln!("apnretry error: {:#}", err);
        std::process::exit(1);
    }
}
