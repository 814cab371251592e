//! rtedit - rich-text document editor with undo/redo
//!
//! This is the main entry point. It parses CLI arguments, sets up logging
//! and configuration, and hands over to the script runner.

mod cli;
mod logger;
mod run;

use rtedit::{config, user_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let cli = cli::Cli::parse()?;

    logger::init(cli.verbose)?;

    // Load configuration
    let mut config = config::Config::default();
    user_config::configure(&mut config);

    // Apply CLI overrides
    cli.apply_to_config(&mut config);

    run::run_script_mode(&cli, &config)?;

    Ok(())
}
