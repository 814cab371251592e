//! End-to-end script sessions against real files.

use rtedit::config::Config;
use rtedit::core::Editor;
use rtedit::script::ScriptConfig;
use rtedit::user_config;

fn editor() -> Editor {
    let mut config = Config::default();
    user_config::configure(&mut config);
    Editor::with_config(
        user_config::palette(&config).unwrap(),
        config.history_config(),
    )
}

fn run(editor: &mut Editor, script: &str) -> String {
    let mut config = ScriptConfig::new();
    config.add_script(script).unwrap();
    let mut out = Vec::new();
    config.execute(editor, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn write_then_reload_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("letter");
    let quoted = serde_json::to_string(path.to_str().unwrap()).unwrap();

    let mut ed = editor();
    let out = run(
        &mut ed,
        &format!(
            "insert 1.0 \"Dear reader,\\nHello\"\n\
             toggle style \"larger bold\" 1.0 1.4\n\
             tag add \"text blue\" 2.0 2.5\n\
             save {}\n",
            quoted
        ),
    );
    let saved = dir.path().join("letter.rte");
    assert_eq!(out, format!("saved {}\n", saved.display()));

    let mut fresh = editor();
    let saved_quoted = serde_json::to_string(saved.to_str().unwrap()).unwrap();
    let out = run(
        &mut fresh,
        &format!("load {}\ntags 1.0\ntags 2.4\nstatus\nprint", saved_quoted),
    );
    assert_eq!(
        out,
        "larger bold\ntext blue\nundo: false redo: false modified: false\nDear reader,\nHello\n"
    );
}

#[test]
fn failed_load_is_reported_and_session_continues() {
    let dir = tempfile::tempdir().unwrap();
    let missing = serde_json::to_string(dir.path().join("nope.rte").to_str().unwrap()).unwrap();

    let mut ed = editor();
    let out = run(
        &mut ed,
        &format!("insert 1.0 \"still here\"\nload {}\nprint", missing),
    );
    let mut lines = out.lines();
    assert!(lines.next().unwrap().starts_with("error: I/O error"));
    assert_eq!(lines.next(), Some("still here"));
}

#[test]
fn replace_and_select_session() {
    let mut ed = editor();
    let out = run(
        &mut ed,
        "insert 1.0 \"Hello World\"\n\
         select 1.6 end\n\
         replace 1.6 end \"Rust\"\n\
         print\n\
         undo\n\
         print\n\
         new\n\
         status\n",
    );
    assert_eq!(
        out,
        "Hello Rust\nHello World\nundo: false redo: false modified: false\n"
    );
    assert_eq!(ed.content(), "");
    assert_eq!(ed.selection(), None);
}
