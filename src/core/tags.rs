//! Tag Table: named formatting styles.
//!
//! The table is descriptive metadata. It is populated once at startup and
//! is never touched by undo/redo; only the application of tags to ranges
//! (see `tag_index`) is mutable history.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{EditorError, Result};

/// Case-normalized tag identifier.
///
/// Normalization trims, lowercases and collapses runs of whitespace, so
/// `"Highlight  Red"` and `"highlight red"` name the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    /// Pseudo-tag for the active selection. Never recorded, never saved.
    pub const SELECTION: &'static str = "sel";

    pub fn new(name: impl AsRef<str>) -> Self {
        let normalized = name
            .as_ref()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        TagName(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_selection(&self) -> bool {
        self.0 == Self::SELECTION
    }
}

impl From<&str> for TagName {
    fn from(name: &str) -> Self {
        TagName::new(name)
    }
}

impl From<String> for TagName {
    fn from(name: String) -> Self {
        TagName::new(name)
    }
}

impl From<TagName> for String {
    fn from(name: TagName) -> Self {
        name.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical menu grouping. Tags in the same group are mutually exclusive
/// when toggled: only one size, one highlight, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagGroup {
    Style,
    Size,
    Highlight,
    Color,
}

impl TagGroup {
    pub fn name(self) -> &'static str {
        match self {
            TagGroup::Style => "style",
            TagGroup::Size => "size",
            TagGroup::Highlight => "highlight",
            TagGroup::Color => "color",
        }
    }
}

impl fmt::Display for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TagGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "style" => Ok(TagGroup::Style),
            "size" => Ok(TagGroup::Size),
            "highlight" => Ok(TagGroup::Highlight),
            "color" | "colour" => Ok(TagGroup::Color),
            other => Err(format!("unknown tag group: {}", other)),
        }
    }
}

/// Visual attributes of a tag. Opaque key/value pairs to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStyle {
    pub attributes: BTreeMap<String, String>,
    pub group: Option<TagGroup>,
}

impl TagStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_group(mut self, group: TagGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn font(self, family: &str, size: i64) -> Self {
        self.set("font-family", family).set("font-size", size.to_string())
    }

    pub fn weight(self, weight: &str) -> Self {
        self.set("font-weight", weight)
    }

    pub fn slant(self, slant: &str) -> Self {
        self.set("font-slant", slant)
    }

    pub fn foreground(self, rgb: (u8, u8, u8)) -> Self {
        self.set("foreground", rgb_hex(rgb))
    }

    pub fn background(self, rgb: (u8, u8, u8)) -> Self {
        self.set("background", rgb_hex(rgb))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// `#rrggbb` form of an RGB triple.
pub fn rgb_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Mapping from tag name to style.
#[derive(Debug, Clone, Default)]
pub struct TagTable {
    styles: BTreeMap<TagName, TagStyle>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a style, replacing any previous definition of the name.
    pub fn define(&mut self, name: impl Into<TagName>, style: TagStyle) -> Result<()> {
        let name = name.into();
        if name.is_selection() || name.as_str().is_empty() {
            return Err(EditorError::ReservedTag {
                name: name.to_string(),
            });
        }
        self.styles.insert(name, style);
        Ok(())
    }

    pub fn lookup(&self, name: &TagName) -> Result<&TagStyle> {
        self.styles
            .get(name)
            .ok_or_else(|| EditorError::unknown_tag(name.as_str()))
    }

    pub fn contains(&self, name: &TagName) -> bool {
        self.styles.contains_key(name)
    }

    /// Every defined tag name, in sorted order.
    pub fn all_names(&self) -> impl Iterator<Item = &TagName> {
        self.styles.keys()
    }

    pub fn names_in_group(&self, group: TagGroup) -> impl Iterator<Item = &TagName> {
        self.styles
            .iter()
            .filter(move |(_, style)| style.group == Some(group))
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
