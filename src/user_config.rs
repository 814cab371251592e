// rtedit Configuration
// Edit this file to customize the default fonts, undo depth and palette.

use crate::config::{
    CODE_FONT_FAMILY, Config, FONT_FAMILY, FONT_SIZE_LARGE, FONT_SIZE_NORMAL, FONT_SIZE_SMALL,
    HISTORY_MAX_DEPTH,
};
use crate::core::error::Result;
use crate::core::history::DEFAULT_MAX_DEPTH;
use crate::core::tags::{TagGroup, TagStyle, TagTable};

/// User configuration function
pub fn configure(config: &mut Config) {
    // Fonts
    config.set(FONT_FAMILY, "Bahnschrift");
    config.set(CODE_FONT_FAMILY, "Consolas");
    config.set(FONT_SIZE_SMALL, 10);
    config.set(FONT_SIZE_NORMAL, 15);
    config.set(FONT_SIZE_LARGE, 25);

    // History
    config.set(HISTORY_MAX_DEPTH, DEFAULT_MAX_DEPTH as i64);
}

/// Build the default tag table from the configured fonts.
///
/// Size tags change only the size; style tags fix size and weight or slant
/// together, so each group is mutually exclusive when toggled.
pub fn palette(config: &Config) -> Result<TagTable> {
    let family = config.get_string(FONT_FAMILY).unwrap_or("Bahnschrift");
    let code_family = config.get_string(CODE_FONT_FAMILY).unwrap_or("Consolas");
    let small = config.get_int(FONT_SIZE_SMALL).unwrap_or(10);
    let normal = config.get_int(FONT_SIZE_NORMAL).unwrap_or(15);
    let large = config.get_int(FONT_SIZE_LARGE).unwrap_or(25);

    let mut table = TagTable::new();

    // Size
    for (name, size) in [("small", small), ("normal", normal), ("larger", large)] {
        table.define(name, TagStyle::new().in_group(TagGroup::Size).font(family, size))?;
    }

    // Style
    for (prefix, size) in [("small", small), ("normal", normal), ("larger", large)] {
        table.define(
            format!("{} bold", prefix).as_str(),
            TagStyle::new()
                .in_group(TagGroup::Style)
                .font(family, size)
                .weight("bold"),
        )?;
        table.define(
            format!("{} italic", prefix).as_str(),
            TagStyle::new()
                .in_group(TagGroup::Style)
                .font(family, size)
                .slant("italic"),
        )?;
    }
    table.define(
        "code",
        TagStyle::new()
            .in_group(TagGroup::Style)
            .font(code_family, normal)
            .background((200, 200, 200)),
    )?;

    // Highlight
    for (name, rgb) in [
        ("highlight red", (255, 0, 0)),
        ("highlight green", (0, 255, 0)),
        ("highlight black", (0, 0, 0)),
    ] {
        table.define(name, TagStyle::new().in_group(TagGroup::Highlight).background(rgb))?;
    }

    // Text color
    for (name, rgb) in [
        ("text white", (255, 255, 255)),
        ("text grey", (200, 200, 200)),
        ("text blue", (0, 0, 255)),
        ("text green", (0, 255, 0)),
        ("text red", (255, 0, 0)),
        ("text black", (0, 0, 0)),
    ] {
        table.define(name, TagStyle::new().in_group(TagGroup::Color).foreground(rgb))?;
    }

    Ok(table)
}
