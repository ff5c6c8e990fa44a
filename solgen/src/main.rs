use clap::Parser;
use solgen::{Config, GoBindings};

fn main() {
    let config = Config::parse();

    let level = if config.verbose {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };

    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = solgen::run(&config, &GoBindings) {
        log::error!("solgen exit with error: {}", err);
        std::process::exit(1);
    }
}
