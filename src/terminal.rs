//! Single-keypress input for interactive terminals.
//!
//! When stdin is a TTY, `,` should see each key as soon as it is pressed,
//! without waiting for Enter. [`KeySource`] switches the terminal to raw mode
//! for exactly one read and restores it afterwards.

use std::collections::VecDeque;
use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::io::ByteSource;

/// Reads one keypress at a time in raw mode.
///
/// Ctrl+D (and Ctrl+Z, as on Windows consoles) ends the input; Ctrl+C is
/// reported as an [`io::ErrorKind::Interrupted`] error since raw mode
/// swallows the signal. Multi-byte characters are delivered as their UTF-8
/// bytes over successive reads.
#[derive(Debug, Default)]
pub struct KeySource {
    pending: VecDeque<u8>,
}

impl KeySource {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Restores cooked mode when dropped, even if the read fails.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl ByteSource for KeySource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pending.pop_front() {
            return Ok(Some(b));
        }

        let _guard = RawModeGuard::enable()?;
        loop {
            let Event::Key(key) = event::read()? else { continue };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match decode_key(key) {
                Key::Bytes(bytes) => {
                    self.pending.extend(bytes);
                    return Ok(self.pending.pop_front());
                }
                Key::EndOfInput => return Ok(None),
                Key::Interrupt => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted by ctrl+c"));
                }
                Key::Ignored => continue,
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Key {
    Bytes(Vec<u8>),
    EndOfInput,
    Interrupt,
    Ignored,
}

fn decode_key(key: KeyEvent) -> Key {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Key::Interrupt,
        KeyCode::Char('d') | KeyCode::Char('z') if ctrl => Key::EndOfInput,
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            Key::Bytes(c.encode_utf8(&mut buf).as_bytes().to_vec())
        }
        KeyCode::Enter => Key::Bytes(vec![b'\n']),
        KeyCode::Tab => Key::Bytes(vec![b'\t']),
        KeyCode::Backspace => Key::Bytes(vec![0x08]),
        KeyCode::Esc => Key::Bytes(vec![0x1b]),
        _ => Key::Ignored,
    }
}
