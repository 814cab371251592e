//! Command-line argument parsing for rtedit.
//!
//! This module provides the `Cli` struct which encapsulates all command-line
//! options and methods for parsing them.

use rtedit::config::{Config, ConfigValue, FONT_FAMILY, HISTORY_MAX_DEPTH};
use std::path::PathBuf;

/// Command-line interface configuration.
#[derive(Debug, Default)]
pub struct Cli {
    /// Document to open
    pub file: Option<PathBuf>,

    /// Scripts to execute (-e flag)
    pub expression: Vec<String>,

    /// Script file path (-f flag)
    pub script_file: Option<PathBuf>,

    /// Save the document back to FILE after the script
    pub in_place: bool,

    /// Stop at the first failing command
    pub strict: bool,

    /// Undo depth override
    pub max_undo: Option<i64>,

    /// Font family override for the default palette
    pub font: Option<String>,

    /// Log verbosity (-v, -vv)
    pub verbose: u8,
}

impl Cli {
    /// Parse the process arguments.
    pub fn parse() -> Result<Self, Box<dyn std::error::Error>> {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse an argument list (without the program name).
    ///
    /// Returns an error if a flag is unknown or its value is missing.
    pub fn parse_from<I>(args: I) -> Result<Self, Box<dyn std::error::Error>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cli = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-i" | "--in-place" => cli.in_place = true,
                "--strict" => cli.strict = true,
                "-v" | "--verbose" => cli.verbose = cli.verbose.saturating_add(1),
                "-vv" => cli.verbose = cli.verbose.saturating_add(2),
                "-e" | "--expression" => {
                    if let Some(expr) = args.next() {
                        cli.expression.push(expr);
                    } else {
                        return Err("--expression requires a value".into());
                    }
                }
                "-f" | "--file" => {
                    if let Some(path) = args.next() {
                        cli.script_file = Some(PathBuf::from(path));
                    } else {
                        return Err("--file requires a value".into());
                    }
                }
                "--max-undo" => {
                    let value = args.next().ok_or("--max-undo requires a value")?;
                    let depth = value
                        .parse::<i64>()
                        .map_err(|_| format!("--max-undo expects a number, got {}", value))?;
                    cli.max_undo = Some(depth);
                }
                "--font" => {
                    if let Some(font) = args.next() {
                        cli.font = Some(font);
                    } else {
                        return Err("--font requires a value".into());
                    }
                }
                "-h" | "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    return Err(format!("Unknown flag: {}. Use --help for usage.", arg).into());
                }
                _ => {
                    if cli.file.is_some() {
                        return Err(format!("Only one document may be given, found {}", arg).into());
                    }
                    cli.file = Some(PathBuf::from(arg));
                }
            }
        }

        if cli.in_place && cli.file.is_none() {
            return Err("--in-place requires a FILE".into());
        }

        Ok(cli)
    }

    /// Apply CLI overrides to a configuration object.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(depth) = self.max_undo {
            config.set(HISTORY_MAX_DEPTH, ConfigValue::Int(depth));
        }
        if let Some(font) = &self.font {
            config.set(FONT_FAMILY, ConfigValue::String(font.clone()));
        }
    }
}

fn print_help() {
    println!("rtedit - rich-text document editor with undo/redo");
    println!();
    println!("Usage: rtedit [OPTIONS] [FILE]");
    println!();
    println!("Options:");
    println!("  -h, --help            Show this help message");
    println!("  -e, --expression CMD  Add script commands");
    println!("  -f, --file PATH       Read script commands from a file");
    println!("  -i, --in-place        Save FILE after the script");
    println!("      --strict          Stop at the first failing command");
    println!("      --max-undo N      Undo depth (0 = unlimited)");
    println!("      --font NAME       Font family for the default palette");
    println!("  -v, --verbose         More logging (repeatable)");
    println!();
    println!("Without -e or -f, commands are read from standard input.");
}
