//! Burnup CLI: the `burnup` command.

mod cli;
mod commands;
mod config;
mod support;

use burnup_report::RangeEnd;
use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        None => commands::report::run(commands::report::Args::default()),

        Some(Commands::Report {
            input,
            out_dir,
            as_of,
            range_end,
            inclusive_end,
            config,
            json,
        }) => commands::report::run(commands::report::Args {
            input,
            out_dir,
            as_of,
            range_end: range_end
                .map(RangeEnd::from)
                .or(inclusive_end.then_some(RangeEnd::Inclusive)),
            config,
            json,
        }),

        Some(Commands::Summary {
            input,
            config,
            json,
        }) => commands::summary::run(input, config, json),
    }
}
