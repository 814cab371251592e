//! Document serializer: buffer content + tag coverage to and from the
//! persisted `.rte` form.
//!
//! ```json
//! { "content": "Hello World", "tags": { "bold": [["1.0", "1.5"]], "code": [] } }
//! ```
//!
//! Positions are written as `"line.column"` (1-indexed line, 0-indexed
//! column); `"end"` is accepted on load.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::core::buffer::Buffer;
use crate::core::error::{EditorError, Result};
use crate::core::position::{Range, TextIndex};
use crate::core::tags::{TagName, TagTable};

/// File extension for persisted documents
pub const EXTENSION: &str = "rte";

/// The persisted unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub tags: BTreeMap<String, Vec<[String; 2]>>,
}

impl Document {
    /// Parse a document from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a whole document file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Write the document atomically and return the path written.
    ///
    /// The JSON goes to a temp file beside the target, is synced, then
    /// renamed over it, so a failed save leaves the previous file intact.
    /// `.rte` is appended when the path lacks it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = with_extension(path.as_ref());
        let json = self.to_json()?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;

        // sync_all() before the rename so a crash cannot leave a renamed but
        // empty file behind.
        temp_file.as_file().sync_all()?;
        temp_file.persist(&path)?;

        tracing::info!(path = %path.display(), bytes = json.len(), "document saved");
        Ok(path)
    }
}

/// `path` with `.rte` appended unless it already ends in it
pub fn with_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == EXTENSION => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".");
            name.push(EXTENSION);
            PathBuf::from(name)
        }
    }
}

/// Snapshot `buffer` into a document.
///
/// Every tag the table defines appears in the output, with an empty list
/// when it covers nothing. Ranges are position-ascending. The selection is
/// not a tag and never appears.
pub fn to_document(buffer: &Buffer, table: &TagTable) -> Result<Document> {
    let mut tags = BTreeMap::new();
    for name in table.all_names() {
        let ranges = buffer
            .tags()
            .ranges(name)
            .iter()
            .map(|range| {
                Ok([
                    buffer.index_of(range.start())?.to_string(),
                    buffer.index_of(range.end())?.to_string(),
                ])
            })
            .collect::<Result<Vec<_>>>()?;
        tags.insert(name.to_string(), ranges);
    }
    Ok(Document {
        content: buffer.to_string(),
        tags,
    })
}

/// Build a fresh buffer from `document`.
///
/// Nothing outside the returned buffer is touched, so a failure here leaves
/// the caller's current buffer as it was. Tags with ranges must be defined
/// in `table`; undefined names with no ranges are skipped.
pub fn from_document(document: &Document, table: &TagTable) -> Result<Buffer> {
    let mut buffer = Buffer::from_string(&document.content);

    let mut applications: Vec<(TagName, Range)> = Vec::new();
    for (name, pairs) in &document.tags {
        let tag = TagName::new(name);
        if pairs.is_empty() {
            continue;
        }
        if tag.is_selection() {
            continue;
        }
        table.lookup(&tag)?;

        for [start, end] in pairs {
            let range = parse_range(&buffer, start, end).map_err(|err| {
                EditorError::serialization(format!(
                    "tag {:?} range [{:?}, {:?}]: {}",
                    name, start, end, err
                ))
            })?;
            applications.push((tag.clone(), range));
        }
    }

    for (tag, range) in &applications {
        buffer.add_tag(tag, *range)?;
    }
    Ok(buffer)
}

fn parse_range(buffer: &Buffer, start: &str, end: &str) -> Result<Range> {
    let start = buffer.position_of(start.parse::<TextIndex>()?)?;
    let end = buffer.position_of(end.parse::<TextIndex>()?)?;
    Range::new(start, end)
}
