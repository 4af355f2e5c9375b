use boardmaus::config::{Args, Config};
use clap::Parser;
use env_logger;
use log;

/// START
fn main() {
    // CLI args
    let args = Args::parse();

    let config = match Config::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    // log config
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter()),
    )
    .init();

    if config.verbosity > 1 {
        log::info!("Running in DEBUG mode. Turn off for normal operation.");
    }
    log::debug!("Start boardmaus");

    match boardmaus::maus::run(&config) {
        Ok(()) => log::info!("Stopped boardmaus"),
        Err(e) => {
            log::error!("boardmaus stopped with an error: {}", e);
            std::process::exit(1);
        }
    }
}
