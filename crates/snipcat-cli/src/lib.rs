pub mod cli;
pub mod commands;
pub mod utils;

use clap::Parser;
use cli::Snipcat;
use commands::handle_command;
use std::process;

/// Run the snipcat CLI application
pub fn run_main() {
    let args = Snipcat::parse();
    let result = handle_command(args.commands);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
