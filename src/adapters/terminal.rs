//! POSIX terminal access through libc: termios raw mode, window size and
//! byte-level stdin/stdout.

use crate::domain::model::WindowSize;
use crate::domain::ports::Terminal;
use crate::utils::error::{Result, ViewerError};
use std::fs::File;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::process::{Command, Stdio};

const STDIN_FD: libc::c_int = libc::STDIN_FILENO;

const RAW_TOGGLE_LFLAGS: libc::tcflag_t = libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG;
const RAW_TOGGLE_IFLAGS: libc::tcflag_t = libc::IXON | libc::ICRNL;
const RAW_TOGGLE_OFLAGS: libc::tcflag_t = libc::OPOST;

/// Tenths of a second a raw-mode read waits before returning without input.
const READ_TIMEOUT_DECISECONDS: libc::cc_t = 1;
const READ_TIMEOUT_MILLIS: libc::c_int = READ_TIMEOUT_DECISECONDS as libc::c_int * 100;

pub struct PosixTerminal {
    normal_mode: libc::termios,
    raw_mode: libc::termios,
    raw_enabled: bool,
    stdout: io::Stdout,
}

impl PosixTerminal {
    /// Reads the current attributes of stdin and derives both the raw and the
    /// normal mode settings from them.
    pub fn open() -> Result<Self> {
        let current = get_termios()?;
        let in_raw_mode = is_raw(&current);
        let (normal_mode, raw_mode) = if in_raw_mode {
            (normal_mode_flags(&current), current)
        } else {
            (current, raw_mode_flags(&current))
        };
        log_terminal_mode(in_raw_mode);

        Ok(Self {
            normal_mode,
            raw_mode,
            raw_enabled: in_raw_mode,
            stdout: io::stdout(),
        })
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_enabled
    }

    pub fn set_raw_mode(&mut self, enabled: bool) -> Result<()> {
        let attributes = if enabled {
            &self.raw_mode
        } else {
            &self.normal_mode
        };
        // SAFETY: attributes points to a fully initialized termios value.
        let rc = unsafe { libc::tcsetattr(STDIN_FD, libc::TCSAFLUSH, attributes) };
        check("tcsetattr", rc)?;
        self.raw_enabled = enabled;
        get_termios()?;
        log_terminal_mode(enabled);
        Ok(())
    }

    pub fn enable_raw_mode(&mut self) -> Result<()> {
        self.set_raw_mode(true)
    }

    pub fn disable_raw_mode(&mut self) -> Result<()> {
        self.set_raw_mode(false)
    }
}

impl Terminal for PosixTerminal {
    fn window_size(&mut self) -> Result<WindowSize> {
        // SAFETY: winsize is plain old data, ioctl only writes into it.
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let rc = unsafe {
            libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws as *mut libc::winsize)
        };
        if rc == 0 && ws.ws_row > 0 && ws.ws_col > 0 {
            tracing::debug!("ioctl: rows={} cols={}", ws.ws_row, ws.ws_col);
            return Ok(WindowSize::new(ws.ws_row as usize, ws.ws_col as usize));
        }
        tracing::debug!("ioctl(TIOCGWINSZ) gave no size, trying stty");
        stty_size()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        read_byte_from(STDIN_FD, READ_TIMEOUT_MILLIS)
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.stdout.write_all(text.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

/// Keeps the terminal in raw mode for its lifetime and restores normal mode
/// on drop, including early returns and panics.
pub struct RawModeGuard {
    terminal: PosixTerminal,
}

impl RawModeGuard {
    pub fn new(mut terminal: PosixTerminal) -> Result<Self> {
        terminal.enable_raw_mode()?;
        Ok(Self { terminal })
    }
}

impl Deref for RawModeGuard {
    type Target = PosixTerminal;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for RawModeGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = self.terminal.disable_raw_mode() {
            tracing::error!("Could not restore terminal: {}", e);
        }
    }
}

fn get_termios() -> Result<libc::termios> {
    // SAFETY: termios is plain old data and fully written by tcgetattr on success.
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::tcgetattr(STDIN_FD, &mut termios) };
    check("tcgetattr", rc)?;
    tracing::debug!("tcgetattr: {}", describe(&termios));
    Ok(termios)
}

fn check(call: &str, rc: libc::c_int) -> Result<()> {
    if rc == 0 {
        return Ok(());
    }
    let errno = io::Error::last_os_error();
    tracing::error!("Problem with {}! Return code {}, errno='{}'", call, rc, errno);
    Err(ViewerError::TerminalError {
        call: call.to_string(),
        message: errno.to_string(),
    })
}

/// Waits up to `timeout_millis` for `fd` to become readable. A hang-up
/// counts as readable so that the following read reports end of input.
fn wait_readable(fd: libc::c_int, timeout_millis: libc::c_int) -> Result<bool> {
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    // SAFETY: pollfd is a valid, initialized array of length one.
    let rc = unsafe { libc::poll(&mut pollfd, 1, timeout_millis) };
    if rc < 0 {
        let errno = io::Error::last_os_error();
        if errno.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(ViewerError::TerminalError {
            call: "poll".to_string(),
            message: errno.to_string(),
        });
    }
    Ok(rc > 0)
}

/// Reads one byte straight from `fd`, bypassing any std buffering so that
/// `poll` sees every pending byte. `Ok(None)` means no input arrived within
/// the timeout; a readable descriptor that yields nothing has been closed.
fn read_byte_from(fd: libc::c_int, timeout_millis: libc::c_int) -> Result<Option<u8>> {
    if !wait_readable(fd, timeout_millis)? {
        return Ok(None);
    }
    let mut byte = 0u8;
    // SAFETY: reads at most one byte into a valid, writable u8.
    let n = unsafe { libc::read(fd, &mut byte as *mut u8 as *mut libc::c_void, 1) };
    match n {
        1 => Ok(Some(byte)),
        0 => {
            tracing::warn!("Terminal input closed");
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "terminal input closed").into())
        }
        _ => {
            let e = io::Error::last_os_error();
            if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) {
                Ok(None)
            } else {
                Err(e.into())
            }
        }
    }
}

fn log_terminal_mode(raw: bool) {
    tracing::info!("Terminal is in {} mode", if raw { "raw" } else { "normal" });
}

/// Raw mode is recognised by disabled output post-processing.
pub fn is_raw(termios: &libc::termios) -> bool {
    termios.c_oflag & libc::OPOST == 0
}

pub fn raw_mode_flags(normal: &libc::termios) -> libc::termios {
    let mut raw = *normal;
    raw.c_lflag &= !RAW_TOGGLE_LFLAGS;
    raw.c_iflag &= !RAW_TOGGLE_IFLAGS;
    raw.c_oflag &= !RAW_TOGGLE_OFLAGS;
    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;
    raw
}

pub fn normal_mode_flags(raw: &libc::termios) -> libc::termios {
    let mut normal = *raw;
    normal.c_lflag |= RAW_TOGGLE_LFLAGS;
    normal.c_iflag |= RAW_TOGGLE_IFLAGS;
    normal.c_oflag |= RAW_TOGGLE_OFLAGS;
    normal.c_cc[libc::VMIN] = 1;
    normal.c_cc[libc::VTIME] = 0;
    normal
}

pub fn describe(termios: &libc::termios) -> String {
    format!(
        "TermIos{{c_iflag=0x{:x}, c_oflag=0x{:x}, c_cflag=0x{:x}, c_lflag=0x{:x}}}",
        termios.c_iflag, termios.c_oflag, termios.c_cflag, termios.c_lflag
    )
}

/// Fallback size query through `stty size` on the controlling tty.
fn stty_size() -> Result<WindowSize> {
    let tty = File::open("/dev/tty")?;
    let output = Command::new("stty")
        .arg("size")
        .stdin(Stdio::from(tty))
        .stderr(Stdio::null())
        .output()?;
    if !output.status.success() {
        return Err(ViewerError::WindowSizeError(format!(
            "stty exited with {}",
            output.status
        )));
    }
    parse_stty_size(&String::from_utf8_lossy(&output.stdout))
}

/// Parses the `"<rows> <cols>"` output of `stty size`.
pub fn parse_stty_size(output: &str) -> Result<WindowSize> {
    let mut tokens = output.split_whitespace().map(str::parse::<usize>);
    match (tokens.next(), tokens.next()) {
        (Some(Ok(rows)), Some(Ok(cols))) if rows > 0 && cols > 0 => {
            Ok(WindowSize::new(rows, cols))
        }
        _ => Err(ViewerError::WindowSizeError(format!(
            "unexpected stty output '{}'",
            output.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cooked() -> libc::termios {
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        t.c_lflag = RAW_TOGGLE_LFLAGS | libc::ECHOE;
        t.c_iflag = RAW_TOGGLE_IFLAGS | libc::BRKINT;
        t.c_oflag = RAW_TOGGLE_OFLAGS;
        t.c_cc[libc::VMIN] = 1;
        t
    }

    #[test]
    fn test_raw_mode_flags_clear_toggles() {
        let raw = raw_mode_flags(&cooked());
        assert!(is_raw(&raw));
        assert_eq!(raw.c_lflag, libc::ECHOE);
        assert_eq!(raw.c_iflag, libc::BRKINT);
        assert_eq!(raw.c_cc[libc::VMIN], 0);
        assert_eq!(raw.c_cc[libc::VTIME], READ_TIMEOUT_DECISECONDS);
    }

    #[test]
    fn test_normal_mode_flags_restore_toggles() {
        let cooked = cooked();
        assert!(!is_raw(&cooked));
        let normal = normal_mode_flags(&raw_mode_flags(&cooked));
        assert!(!is_raw(&normal));
        assert_eq!(normal.c_lflag, cooked.c_lflag);
        assert_eq!(normal.c_iflag, cooked.c_iflag);
        assert_eq!(normal.c_oflag, cooked.c_oflag);
        assert_eq!(normal.c_cc[libc::VMIN], 1);
    }

    #[test]
    fn test_describe_uses_hex() {
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        t.c_oflag = 0x5;
        assert!(describe(&t).contains("c_oflag=0x5"));
    }

    #[test]
    fn test_read_byte_tells_timeout_from_closed_input() {
        let mut fds = [0 as libc::c_int; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let (read_end, write_end) = (fds[0], fds[1]);

        let data = b"ab";
        let written = unsafe { libc::write(write_end, data.as_ptr() as *const libc::c_void, 2) };
        assert_eq!(written, 2);
        assert_eq!(read_byte_from(read_end, 10).unwrap(), Some(b'a'));
        assert_eq!(read_byte_from(read_end, 10).unwrap(), Some(b'b'));
        assert_eq!(read_byte_from(read_end, 10).unwrap(), None);

        unsafe { libc::close(write_end) };
        match read_byte_from(read_end, 10) {
            Err(ViewerError::IoError(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected end of input, got {:?}", other),
        }
        unsafe { libc::close(read_end) };
    }

    #[test]
    fn test_parse_stty_size() {
        assert_eq!(parse_stty_size("24 80\n").unwrap(), WindowSize::new(24, 80));
        assert!(parse_stty_size("").is_err());
        assert!(parse_stty_size("0 80").is_err());
        assert!(parse_stty_size("rows cols").is_err());
    }
}
