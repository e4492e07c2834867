mod args;
mod commands;
mod config;

use args::Cli;
use clap::Parser;
use config::IntakeConfig;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = IntakeConfig::load(cli.config.as_deref())
        .and_then(|config| commands::run(cli.command, config));
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
