use clap::Parser;
use log::debug;
use std::error::Error;

mod args;
mod scoring;

use crate::scoring::RunSettings;

fn main() {
    let args = args::Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("args: {:?}", args);

    let settings = RunSettings {
        config: args.config,
        input: args.input,
        input_type: args.input_type,
        out: args.out,
        reference: args.reference,
        excel_worksheet_name: args.excel_worksheet_name,
    };

    if let Err(e) = scoring::run_contest(&settings) {
        eprintln!("An error occurred: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}
