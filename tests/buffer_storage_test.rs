use anyhow::Result;
use std::fs;
use tempfile::TempDir;
use viewer::core::Position;
use viewer::{LocalStorage, TextBuffer};

#[test]
fn test_load_edit_save_roundtrip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    fs::write(temp_dir.path().join("in.txt"), "first\nsecond\n")?;

    let mut buffer = TextBuffer::load(&storage, "in.txt")?;
    assert_eq!(buffer.line_count(), 3);

    buffer.split_line(Position::new(1, 4));
    buffer.insert('!', Position::new(3, 7));
    let lines = buffer.save(&storage, "out/out.txt")?;

    assert_eq!(lines, 4);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("out/out.txt"))?,
        "fir\nst\nsecond!\n"
    );
    Ok(())
}

#[test]
fn test_crlf_files_are_saved_with_lf() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    fs::write(temp_dir.path().join("dos.txt"), "a\r\nb\r\n")?;

    let buffer = TextBuffer::load(&storage, "dos.txt")?;
    assert_eq!(buffer.line(1), "a");
    buffer.save(&storage, "dos.txt")?;

    assert_eq!(fs::read_to_string(temp_dir.path().join("dos.txt"))?, "a\nb\n");
    Ok(())
}

#[test]
fn test_load_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    assert!(TextBuffer::load(&storage, "missing.txt").is_err());
}
