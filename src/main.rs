use clap::Parser;
use ragctx::cli::Cli;
use ragctx::env::logging as env_logging;
use ragctx::logging::{init_logging, LoggingConfig};
use tracing::Level;

fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (ignore errors if missing)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level(Level::DEBUG);
    } else if std::env::var(env_logging::LOG_LEVEL).is_err() {
        // Keep stderr quiet unless asked
        logging = logging.with_level(Level::WARN);
    }
    let _guard = init_logging(&logging)?;

    cli.run()
}
