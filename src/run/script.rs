//! Script mode implementation.

use crate::cli::Cli;
use rtedit::config::Config;
use rtedit::core::Editor;
use rtedit::script::ScriptConfig;
use rtedit::user_config;
use std::fs;
use std::io::{self, Write};

use super::validate_file_path;

/// Run one editing session driven by script commands.
pub fn run_script_mode(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let table = user_config::palette(config)?;
    let mut editor = Editor::with_config(table, config.history_config());

    let document = match &cli.file {
        Some(path) => {
            let validated_path = validate_file_path(path)?;
            if validated_path.exists() {
                editor.open(&validated_path)?;
            }
            Some(validated_path)
        }
        None => None,
    };

    let mut script_config = ScriptConfig::new();
    script_config.strict = cli.strict;

    for script in &cli.expression {
        script_config
            .add_script(script)
            .map_err(|e| format!("Error parsing script: {}", e))?;
    }

    if let Some(script_path) = &cli.script_file {
        let validated_path = validate_file_path(script_path)?;
        let script = fs::read_to_string(&validated_path)?;
        script_config
            .add_script(&script)
            .map_err(|e| format!("Error parsing script file: {}", e))?;
    }

    let stdout = io::stdout();
    let mut stdout_lock = stdout.lock();
    if cli.expression.is_empty() && cli.script_file.is_none() {
        let stdin = io::stdin();
        script_config.execute_stream(&mut editor, stdin.lock(), &mut stdout_lock)?;
    } else {
        script_config.execute(&mut editor, &mut stdout_lock)?;
    }
    stdout_lock.flush()?;

    if cli.in_place {
        if let Some(path) = document {
            let written = editor.save_as(&path)?;
            tracing::debug!(path = %written.display(), "in-place save");
        }
    }

    Ok(())
}
