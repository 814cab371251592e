//! Script mode: a line-oriented front end for the editing core.
//!
//! One command per line; blank lines and `#` comments are skipped.
//! Positions are `line.column` or `end`; text and tag names are JSON string
//! literals so they can carry spaces, quotes and `\n`.
//!
//! ```text
//! insert 1.0 "Hello World"
//! tag add "bold" 1.0 1.5
//! toggle size "larger" 1.6 end
//! undo
//! save "notes.rte"
//! ```
//!
//! A leading `!` runs a mutation without recording it.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::core::command::Command;
use crate::core::editor::Editor;
use crate::core::error::{EditorError, Result};
use crate::core::position::{Range, TextIndex};
use crate::core::tags::TagGroup;

mod lexer;

use lexer::Tokens;

/// Script command types
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Insert { at: TextIndex, text: String },
    Delete { start: TextIndex, end: TextIndex },
    Tag {
        add: bool,
        name: String,
        spans: Vec<(TextIndex, TextIndex)>,
    },
    Toggle {
        group: TagGroup,
        name: String,
        start: TextIndex,
        end: TextIndex,
    },
    Replace {
        start: TextIndex,
        end: TextIndex,
        text: String,
    },
    Select { start: TextIndex, end: TextIndex },
    Undo,
    Redo,
    /// Print the buffer content
    Print,
    /// Print the tags at a position
    Tags { at: TextIndex },
    /// Print undo/redo availability
    Status,
    /// Print the document JSON
    Dump,
    New,
    Save { path: Option<PathBuf> },
    Load { path: PathBuf },
}

impl ScriptCommand {
    fn is_mutation(&self) -> bool {
        matches!(
            self,
            ScriptCommand::Insert { .. }
                | ScriptCommand::Delete { .. }
                | ScriptCommand::Tag { .. }
                | ScriptCommand::Toggle { .. }
                | ScriptCommand::Replace { .. }
        )
    }
}

/// A script command and whether it is recorded in history
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub recorded: bool,
    pub command: ScriptCommand,
}

/// Script executor configuration
#[derive(Debug, Default)]
pub struct ScriptConfig {
    /// Stop at the first failing command instead of reporting and going on
    pub strict: bool,
    /// Commands to execute
    pub commands: Vec<ScriptLine>,
}

impl ScriptConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse script text (one or more lines) and add it to commands
    pub fn add_script(&mut self, script: &str) -> std::result::Result<(), String> {
        for (number, line) in script.lines().enumerate() {
            if let Some(parsed) = parse_line(line).map_err(|e| format!("line {}: {}", number + 1, e))? {
                self.commands.push(parsed);
            }
        }
        Ok(())
    }

    /// Run every command against `editor`, writing output to `writer`
    pub fn execute<W: Write>(&self, editor: &mut Editor, writer: &mut W) -> Result<()> {
        for line in &self.commands {
            run_line(editor, line, self.strict, writer)?;
        }
        Ok(())
    }

    /// Read, parse and run commands one line at a time
    pub fn execute_stream<R: BufRead, W: Write>(
        &self,
        editor: &mut Editor,
        reader: R,
        writer: &mut W,
    ) -> Result<()> {
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            match parse_line(&line) {
                Ok(Some(parsed)) => run_line(editor, &parsed, self.strict, writer)?,
                Ok(None) => {}
                Err(e) if self.strict => {
                    return Err(EditorError::Io(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("line {}: {}", number + 1, e),
                    )));
                }
                Err(e) => writeln!(writer, "error: line {}: {}", number + 1, e)?,
            }
        }
        Ok(())
    }
}

fn run_line<W: Write>(
    editor: &mut Editor,
    line: &ScriptLine,
    strict: bool,
    writer: &mut W,
) -> Result<()> {
    let result = if line.recorded {
        run_command(editor, &line.command, writer)
    } else {
        editor.without_recording(|ed| run_command(ed, &line.command, writer))
    };
    match result {
        Ok(()) => Ok(()),
        Err(EditorError::Io(e)) if !is_document_command(&line.command) => Err(EditorError::Io(e)),
        Err(e) if strict => Err(e),
        Err(e) => {
            tracing::warn!(error = %e, "script command failed");
            writeln!(writer, "error: {}", e)?;
            Ok(())
        }
    }
}

/// Load/save failures are reported like any other command error; other
/// I/O errors come from the output writer and always abort.
fn is_document_command(command: &ScriptCommand) -> bool {
    matches!(
        command,
        ScriptCommand::Save { .. } | ScriptCommand::Load { .. }
    )
}

fn span(editor: &Editor, start: TextIndex, end: TextIndex) -> Result<Range> {
    Range::new(editor.position_of(start)?, editor.position_of(end)?)
}

fn run_command<W: Write>(editor: &mut Editor, command: &ScriptCommand, writer: &mut W) -> Result<()> {
    match command {
        ScriptCommand::Insert { at, text } => {
            let at = editor.position_of(*at)?;
            editor.insert(at, text)?;
        }
        ScriptCommand::Delete { start, end } => {
            let range = span(editor, *start, *end)?;
            editor.delete(range)?;
        }
        ScriptCommand::Tag { add, name, spans } => {
            let ranges = spans
                .iter()
                .map(|(start, end)| span(editor, *start, *end))
                .collect::<Result<Vec<_>>>()?;
            let command = if *add {
                Command::tag_add(name.as_str(), ranges)
            } else {
                Command::tag_remove(name.as_str(), ranges)
            };
            editor.execute(command)?;
        }
        ScriptCommand::Toggle {
            group,
            name,
            start,
            end,
        } => {
            // An unresolvable selection is ignored, like an empty one.
            if let Ok(range) = span(editor, *start, *end) {
                editor.toggle_tag(name, *group, range)?;
            }
        }
        ScriptCommand::Replace { start, end, text } => {
            let range = span(editor, *start, *end)?;
            editor.replace(range, text)?;
        }
        ScriptCommand::Select { start, end } => {
            let range = span(editor, *start, *end)?;
            editor.select(Some(range))?;
        }
        ScriptCommand::Undo => {
            if !editor.undo()? {
                writeln!(writer, "nothing to undo")?;
            }
        }
        ScriptCommand::Redo => {
            if !editor.redo()? {
                writeln!(writer, "nothing to redo")?;
            }
        }
        ScriptCommand::Print => {
            writeln!(writer, "{}", editor.content())?;
        }
        ScriptCommand::Tags { at } => {
            let at = editor.position_of(*at)?;
            let names: Vec<String> = editor.tags_at(at).iter().map(ToString::to_string).collect();
            writeln!(writer, "{}", names.join(", "))?;
        }
        ScriptCommand::Status => {
            writeln!(
                writer,
                "undo: {} redo: {} modified: {}",
                editor.can_undo(),
                editor.can_redo(),
                editor.is_modified()
            )?;
        }
        ScriptCommand::Dump => {
            writeln!(writer, "{}", editor.to_document()?.to_json()?)?;
        }
        ScriptCommand::New => editor.new_document(),
        ScriptCommand::Save { path } => {
            let written = match path {
                Some(path) => editor.save_as(path)?,
                None => editor.save()?,
            };
            writeln!(writer, "saved {}", written.display())?;
        }
        ScriptCommand::Load { path } => {
            editor.open(path)?;
        }
    }
    Ok(())
}

/// Parse one script line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> std::result::Result<Option<ScriptLine>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let (recorded, body) = match trimmed.strip_prefix('!') {
        Some(rest) => (false, rest),
        None => (true, trimmed),
    };

    let mut tokens = Tokens::new(body);
    let verb = tokens.word()?.ok_or("missing command")?;
    let command = match verb.as_str() {
        "insert" => ScriptCommand::Insert {
            at: tokens.index()?,
            text: tokens.string()?,
        },
        "delete" => ScriptCommand::Delete {
            start: tokens.index()?,
            end: tokens.index()?,
        },
        "tag" => {
            let add = match tokens.word()?.as_deref() {
                Some("add") => true,
                Some("remove") => false,
                other => return Err(format!("expected add or remove, found {:?}", other)),
            };
            let name = tokens.string()?;
            let mut spans = vec![(tokens.index()?, tokens.index()?)];
            while !tokens.is_empty() {
                spans.push((tokens.index()?, tokens.index()?));
            }
            ScriptCommand::Tag { add, name, spans }
        }
        "toggle" => ScriptCommand::Toggle {
            group: tokens.word()?.ok_or("missing tag group")?.parse::<TagGroup>()?,
            name: tokens.string()?,
            start: tokens.index()?,
            end: tokens.index()?,
        },
        "replace" => ScriptCommand::Replace {
            start: tokens.index()?,
            end: tokens.index()?,
            text: tokens.string()?,
        },
        "select" => ScriptCommand::Select {
            start: tokens.index()?,
            end: tokens.index()?,
        },
        "undo" => ScriptCommand::Undo,
        "redo" => ScriptCommand::Redo,
        "print" => ScriptCommand::Print,
        "tags" => ScriptCommand::Tags {
            at: tokens.index()?,
        },
        "status" => ScriptCommand::Status,
        "dump" => ScriptCommand::Dump,
        "new" => ScriptCommand::New,
        "save" => ScriptCommand::Save {
            path: if tokens.is_empty() {
                None
            } else {
                Some(PathBuf::from(tokens.string()?))
            },
        },
        "load" => ScriptCommand::Load {
            path: PathBuf::from(tokens.string()?),
        },
        other => return Err(format!("unknown command: {}", other)),
    };

    if !tokens.is_empty() {
        return Err(format!("trailing input after {}", verb));
    }
    if !recorded && !command.is_mutation() {
        return Err(format!("'!' only applies to edits, not {}", verb));
    }
    Ok(Some(ScriptLine { recorded, command }))
}
