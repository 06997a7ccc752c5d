mod commands;
mod handlers;
mod output;

use clap::Parser;
use commands::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RTCHART_LOG")
        .init();

    let cli = Cli::parse();
    handlers::handle_command(cli.command)
}
