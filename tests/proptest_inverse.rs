//! Property-based tests for command inverses and undo/redo.
//!
//! 1. Applying forward then inverse restores content and tag coverage
//! 2. Undoing every step of an arbitrary session restores the start state
//! 3. Redo after undo lands on the same state as before the undo
//! 4. No panics on arbitrary (often invalid) operation sequences

use proptest::prelude::*;
use rtedit::core::buffer::Buffer;
use rtedit::core::document::Document;
use rtedit::core::history::HistoryConfig;
use rtedit::core::{Command, Editor, HistoryEntry, Position, Range, TagGroup, TagStyle, TagTable};

// ── Strategies ──────────────────────────────────────────────────────────

const TAGS: [&str; 3] = ["bold", "small", "larger"];

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, String),
    Delete(usize, usize),
    TagAdd(usize, usize, usize),
    TagRemove(usize, usize, usize),
    Toggle(usize, usize, usize),
    Replace(usize, usize, String),
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just('a'),
            Just('é'),
            Just('\n'),
            Just('\r'),
            Just('\u{2028}'),
            Just('🌍'),
            Just(' ')
        ],
        0..6,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..40, text_strategy()).prop_map(|(at, text)| Op::Insert(at, text)),
        (0usize..40, 0usize..40).prop_map(|(a, b)| Op::Delete(a, b)),
        (0usize..3, 0usize..40, 0usize..40).prop_map(|(t, a, b)| Op::TagAdd(t, a, b)),
        (0usize..3, 0usize..40, 0usize..40).prop_map(|(t, a, b)| Op::TagRemove(t, a, b)),
        (0usize..3, 0usize..40, 0usize..40).prop_map(|(t, a, b)| Op::Toggle(t, a, b)),
        (0usize..40, 0usize..40, text_strategy()).prop_map(|(a, b, text)| Op::Replace(a, b, text)),
    ]
}

fn table() -> TagTable {
    let mut table = TagTable::new();
    table.define("bold", TagStyle::new().weight("bold")).unwrap();
    table
        .define("small", TagStyle::new().in_group(TagGroup::Size))
        .unwrap();
    table
        .define("larger", TagStyle::new().in_group(TagGroup::Size))
        .unwrap();
    table
}

/// Apply one op; errors from out-of-range positions are expected and ignored.
fn apply_op(editor: &mut Editor, op: &Op) {
    let _ = match op {
        Op::Insert(at, text) => editor.insert(Position(*at), text),
        Op::Delete(a, b) => editor.delete(Range::ordered(*a, *b)),
        Op::TagAdd(t, a, b) => editor.add_tag(TAGS[*t], &[Range::ordered(*a, *b)]),
        Op::TagRemove(t, a, b) => editor.remove_tag(TAGS[*t], &[Range::ordered(*a, *b)]),
        Op::Toggle(t, a, b) => editor.toggle_tag(TAGS[*t], TagGroup::Size, Range::ordered(*a, *b)),
        Op::Replace(a, b, text) => editor.replace(Range::ordered(*a, *b), text),
    };
}

fn state(editor: &Editor) -> Document {
    editor.to_document().unwrap()
}

fn seeded_buffer(text: &str, spans: &[(usize, usize, usize)]) -> Buffer {
    let mut buffer = Buffer::from_string(text);
    let len = buffer.len();
    for &(t, a, b) in spans {
        let range = Range::ordered(a.min(len), b.min(len));
        buffer.add_tag(&TAGS[t].into(), range).unwrap();
    }
    buffer
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        (0usize..12, text_strategy()).prop_map(|(at, text)| Command::insert(at, text)),
        (0usize..12, 0usize..12).prop_map(|(a, b)| Command::delete(Range::ordered(a, b))),
        (0usize..3, 0usize..12, 0usize..12, 0usize..12, 0usize..12).prop_map(|(t, a, b, c, d)| {
            Command::tag_add(TAGS[t], vec![Range::ordered(a, b), Range::ordered(c, d)])
        }),
        (0usize..3, 0usize..12, 0usize..12, 0usize..12, 0usize..12).prop_map(|(t, a, b, c, d)| {
            Command::tag_remove(TAGS[t], vec![Range::ordered(a, b), Range::ordered(c, d)])
        }),
    ]
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn forward_then_inverse_is_identity(
        spans in prop::collection::vec((0usize..3, 0usize..12, 0usize..12), 0..4),
        command in command_strategy(),
    ) {
        let mut buffer = seeded_buffer("ab\ncdé🌍fgh", &spans);
        let before_text = buffer.to_string();
        let before_tags = buffer.tags().clone();

        if let Ok(entry) = HistoryEntry::derive(command, &buffer) {
            entry.forward.apply(&mut buffer).unwrap();
            entry.inverse.apply(&mut buffer).unwrap();
            prop_assert_eq!(buffer.to_string(), before_text);
            prop_assert_eq!(buffer.tags(), &before_tags);
        }
    }

    #[test]
    fn document_round_trip_is_exact(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let mut editor = Editor::with_config(table(), HistoryConfig::unlimited());
        editor.insert(Position::START, "a\r\nb").unwrap();
        for op in &ops {
            apply_op(&mut editor, op);
        }
        let doc = state(&editor);

        let mut reloaded = Editor::new(table());
        reloaded.load_document(&doc).unwrap();
        prop_assert_eq!(reloaded.content(), editor.content());
        prop_assert_eq!(reloaded.buffer().tags(), editor.buffer().tags());
    }

    #[test]
    fn undo_all_restores_start(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut editor = Editor::with_config(table(), HistoryConfig::unlimited());
        editor.insert(Position::START, "seed text\nline two").unwrap();
        editor.add_tag("bold", &[Range::new(0, 4).unwrap()]).unwrap();
        let start = state(&editor);
        let base = editor.history().undo_depth();

        for op in &ops {
            apply_op(&mut editor, op);
        }
        let steps = editor.history().undo_depth() - base;
        for _ in 0..steps {
            prop_assert!(editor.undo().unwrap());
        }
        prop_assert_eq!(state(&editor), start);
    }

    #[test]
    fn redo_after_undo_is_identity(
        ops in prop::collection::vec(op_strategy(), 1..30),
        rewind in 1usize..10,
    ) {
        let mut editor = Editor::with_config(table(), HistoryConfig::unlimited());
        editor.insert(Position::START, "0123456789abcdef").unwrap();
        for op in &ops {
            apply_op(&mut editor, op);
        }
        let edited = state(&editor);

        let mut undone = 0;
        while undone < rewind && editor.undo().unwrap() {
            undone += 1;
        }
        for _ in 0..undone {
            prop_assert!(editor.redo().unwrap());
        }
        prop_assert_eq!(state(&editor), edited);
        prop_assert!(!editor.can_redo());
    }
}
