use crate::domain::model::Key;
use crate::domain::ports::Terminal;
use crate::utils::error::Result;

const ESC: u8 = 0x1b;
const ENTER: u8 = 13;
const BACKSPACE: u8 = 127;
const CTRL_H: u8 = 8;
const TAB: u8 = 9;

/// Reads one key press, blocking until input arrives.
///
/// Escape sequences are completed with further reads; a read timeout right
/// after `ESC` means the Escape key itself was pressed.
pub fn read_key<T: Terminal + ?Sized>(terminal: &mut T) -> Result<Key> {
    let first = loop {
        if let Some(byte) = terminal.read_byte()? {
            break byte;
        }
    };

    match first {
        ESC => read_escape_sequence(terminal),
        0x80..=0xff => read_utf8(terminal, first),
        _ => Ok(decode_byte(first)),
    }
}

fn decode_byte(byte: u8) -> Key {
    match byte {
        ENTER => Key::Enter,
        BACKSPACE | CTRL_H => Key::Backspace,
        TAB => Key::Tab,
        ESC => Key::Escape,
        1..=26 => Key::Ctrl((b'a' + byte - 1) as char),
        0x20..=0x7e => Key::Char(byte as char),
        _ => Key::Unknown(byte),
    }
}

fn read_escape_sequence<T: Terminal + ?Sized>(terminal: &mut T) -> Result<Key> {
    let Some(second) = terminal.read_byte()? else {
        return Ok(Key::Escape);
    };
    match second {
        b'[' => read_control_sequence(terminal),
        b'O' => Ok(match terminal.read_byte()? {
            Some(b'H') => Key::Home,
            Some(b'F') => Key::End,
            Some(other) => Key::Unknown(other),
            None => Key::Escape,
        }),
        _ => Ok(decode_byte(second)),
    }
}

/// Reads the rest of an `ESC [` sequence up to its final byte, so that the
/// parameters of unsupported keys never reach the buffer as text.
fn read_control_sequence<T: Terminal + ?Sized>(terminal: &mut T) -> Result<Key> {
    let mut params = Vec::new();
    let last = loop {
        match terminal.read_byte()? {
            // parameter and intermediate bytes
            Some(byte @ 0x20..=0x3f) => params.push(byte),
            Some(byte) => break byte,
            None if params.is_empty() => return Ok(Key::Escape),
            None => return Ok(Key::Unknown(ESC)),
        }
    };

    let key = match (params.as_slice(), last) {
        ([], b'A') => Key::ArrowUp,
        ([], b'B') => Key::ArrowDown,
        ([], b'C') => Key::ArrowRight,
        ([], b'D') => Key::ArrowLeft,
        ([], b'H') => Key::Home,
        ([], b'F') => Key::End,
        ([b'1' | b'7'], b'~') => Key::Home,
        ([b'4' | b'8'], b'~') => Key::End,
        ([b'3'], b'~') => Key::Delete,
        ([b'5'], b'~') => Key::PageUp,
        ([b'6'], b'~') => Key::PageDown,
        _ => Key::Unknown(last),
    };
    if let Key::Unknown(_) = key {
        tracing::debug!(
            "Ignoring escape sequence ESC [{}{}",
            String::from_utf8_lossy(&params),
            last as char
        );
    }
    Ok(key)
}

fn read_utf8<T: Terminal + ?Sized>(terminal: &mut T, lead: u8) -> Result<Key> {
    let width = match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return Ok(Key::Unknown(lead)),
    };

    let mut bytes = vec![lead];
    for _ in 1..width {
        match terminal.read_byte()? {
            Some(byte) => bytes.push(byte),
            None => return Ok(Key::Unknown(lead)),
        }
    }

    Ok(std::str::from_utf8(&bytes)
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Key::Unknown(lead), Key::Char))
}
