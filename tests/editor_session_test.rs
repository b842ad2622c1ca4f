mod common;

use anyhow::Result;
use common::{ScriptedTerminal, BACKSPACE, CTRL_F, CTRL_Q, CTRL_S, ENTER};
use std::fs;
use tempfile::TempDir;
use viewer::core::Position;
use viewer::{Editor, EditorSettings, LocalStorage};

fn storage_in(temp_dir: &TempDir) -> LocalStorage {
    LocalStorage::new(temp_dir.path().to_str().unwrap().to_string())
}

const SEARCH_TEXT: &str = "alpha\nbeta needle\ngamma\nneedle again\n";

#[test]
fn test_edit_and_save_existing_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("notes.txt"), "hello\nworld\n")?;

    let mut terminal = ScriptedTerminal::new(24, 120)
        .arrow_down()
        .end()
        .text("!")
        .key(CTRL_S)
        .key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.open("notes.txt")?;
    editor.run()?;

    assert!(editor.status_message().starts_with("3 lines written to notes.txt"));
    assert!(!editor.is_dirty());
    drop(editor);

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("notes.txt"))?,
        "hello\nworld!\n"
    );
    assert!(terminal.output.contains("\x1b[2J"));
    assert!(terminal.output.ends_with("\x1b[2J\x1b[H"));
    Ok(())
}

#[test]
fn test_save_as_prompt_for_new_buffer() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let mut terminal = ScriptedTerminal::new(24, 120)
        .text("hi")
        .key(CTRL_S)
        .text("out.txx")
        .key(BACKSPACE)
        .text("t")
        .key(ENTER)
        .key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.run()?;
    assert_eq!(editor.filename(), Some("out.txt"));
    drop(editor);

    assert_eq!(fs::read_to_string(temp_dir.path().join("out.txt"))?, "hi");
    assert!(terminal.output.contains("Save as: out.txt"));
    Ok(())
}

#[test]
fn test_cancelled_save_and_quit_confirmation() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let mut terminal = ScriptedTerminal::new(24, 120)
        .text("x")
        .key(CTRL_S)
        .escape()
        .key(CTRL_Q)
        .key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.run()?;
    assert!(editor.is_dirty());
    drop(editor);

    assert!(terminal.output.contains("Save aborted"));
    assert!(terminal.output.contains("WARNING! File has unsaved changes"));
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_failed_save_keeps_editing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("blocker"), "a plain file")?;

    let mut terminal = ScriptedTerminal::new(24, 120)
        .text("x")
        .key(CTRL_S)
        .text("blocker/out.txt")
        .key(ENTER)
        .key(CTRL_Q)
        .key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.run()?;
    assert!(editor.is_dirty());
    assert_eq!(editor.filename(), None);
    drop(editor);

    assert!(terminal.output.contains("Can't save!"));
    Ok(())
}

#[test]
fn test_incremental_search_accepts_match() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("search.txt"), SEARCH_TEXT)?;

    let mut terminal = ScriptedTerminal::new(24, 120)
        .key(CTRL_F)
        .text("needle")
        .key(ENTER)
        .key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.open("search.txt")?;
    editor.run()?;

    assert_eq!(editor.cursor().position(), Position::new(2, 6));
    Ok(())
}

#[test]
fn test_search_next_and_previous_match() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("search.txt"), SEARCH_TEXT)?;

    let mut terminal = ScriptedTerminal::new(24, 120)
        .key(CTRL_F)
        .text("needle")
        .arrow_down()
        .key(ENTER)
        .key(CTRL_F)
        .text("needle")
        .arrow_up()
        .key(ENTER)
        .key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.open("search.txt")?;

    // first search ends on line 4, the second one walks back to line 2
    editor.run()?;
    assert_eq!(editor.cursor().position(), Position::new(2, 6));
    Ok(())
}

#[test]
fn test_escape_restores_cursor_and_reports_missing_text() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("search.txt"), SEARCH_TEXT)?;

    let mut terminal = ScriptedTerminal::new(24, 120)
        .arrow_down()
        .key(CTRL_F)
        .text("gamma")
        .escape()
        .key(CTRL_F)
        .text("zzz")
        .escape()
        .key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.open("search.txt")?;
    editor.run()?;
    assert_eq!(editor.cursor().position(), Position::new(2, 1));
    drop(editor);

    assert!(terminal.output.contains("Search: zzz (not found)"));
    Ok(())
}

#[test]
fn test_page_down_scrolls_viewport() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let text: Vec<String> = (1..=100).map(|i| format!("line {}", i)).collect();
    fs::write(temp_dir.path().join("long.txt"), text.join("\n"))?;

    let mut terminal = ScriptedTerminal::new(10, 40).page_down().key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.open("long.txt")?;
    editor.run()?;

    assert_eq!(editor.cursor().position(), Position::new(10, 1));
    assert_eq!(editor.viewport().top(), 4);
    drop(editor);

    assert!(terminal.output.contains("line 13"));
    Ok(())
}

#[test]
fn test_delete_at_line_end_joins_lines() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("join.txt"), "ab\ncd")?;

    let mut terminal = ScriptedTerminal::new(24, 80)
        .end()
        .delete()
        .key(CTRL_S)
        .key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.open("join.txt")?;
    editor.run()?;
    drop(editor);

    assert_eq!(fs::read_to_string(temp_dir.path().join("join.txt"))?, "abcd");
    Ok(())
}

#[test]
fn test_exhausted_input_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut terminal = ScriptedTerminal::new(24, 80).text("abc");

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    assert!(editor.run().is_err());
    assert_eq!(editor.buffer().to_text(), "abc");
}

#[test]
fn test_unsupported_key_sequences_leave_buffer_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;

    // Ctrl+Right, F5 and a bracketed paste start marker
    let mut terminal = ScriptedTerminal::new(24, 80)
        .bytes(b"\x1b[1;5C")
        .bytes(b"\x1b[15~")
        .bytes(b"\x1b[200~")
        .key(CTRL_Q)
        .key(CTRL_Q);

    let mut editor = Editor::new(&mut terminal, storage_in(&temp_dir), EditorSettings::default());
    editor.run()?;

    assert_eq!(editor.buffer().to_text(), "");
    assert!(!editor.is_dirty());
    assert_eq!(editor.cursor().position(), Position::new(1, 1));
    Ok(())
}
