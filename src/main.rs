use clap::Parser;
use lazarus::cli::{Config, Runner};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    if let Err(err) = Runner::new(config).run().await {
        lazarus::cli::die(1, &err.to_string());
    }
}
