//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use eventwise_cli::CliError;

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match eventwise_cli::run() {
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        outcome => Ok(outcome?),
    }
}
