pub mod actions;
pub mod analytics;
pub mod camera;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod events;
pub mod gesture;
pub mod landmarks;
pub mod library;
mod logging;
pub mod service;
pub mod views;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    match cli::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
