use std::io::{self, Write};
use crate::error::BfError;
use crate::instruction;

/// Pretty-print a structured [`BfError`] with caret positioning.
/// If `program` is `Some("bf")`, prefix messages with "bf: ..."
pub fn print_error(program: Option<&str>, code: &str, err: &BfError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    let msg = match err {
        BfError::MismatchedBrace { .. } => {
            prefix_program("Parse error: mismatched brace ']' has no opening '['")
        }
        BfError::UnclosedLoop { .. } => prefix_program("Parse error: unclosed loop '['"),
        BfError::PointerOverflow { ptr, .. } => {
            prefix_program(&format!("Runtime error: pointer overflow (ptr={ptr}, op=>)"))
        }
        BfError::PointerUnderflow { .. } => {
            prefix_program("Runtime error: pointer underflow (ptr=0, op=<)")
        }
        BfError::CellOverflow { ptr, .. } => {
            prefix_program(&format!("Runtime error: cell overflow (cell[{ptr}]=255, op=+)"))
        }
        BfError::CellUnderflow { ptr, .. } => {
            prefix_program(&format!("Runtime error: cell underflow (cell[{ptr}]=0, op=-)"))
        }
        BfError::InputExhausted { .. } => prefix_program("Runtime error: input exhausted (op=,)"),
        BfError::JumpTableMismatch { .. } => {
            prefix_program("Internal error: jump table does not belong to this program")
        }
        BfError::Io { source, .. } => prefix_program(&format!("I/O error: {source}")),
        BfError::StepLimitExceeded { .. } | BfError::Canceled => {
            eprintln!("{err}");
            let _ = io::stderr().flush();
            return;
        }
    };

    match err.position() {
        Some(ip) => print_error_with_context(&msg, code, ip),
        None => {
            eprintln!("{msg}");
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
///
/// `ip` counts instructions only; the caret is placed under the matching
/// character of the original `code`, comments included.
pub fn print_error_with_context(prefix: &str, code: &str, ip: usize) {
    eprintln!("{prefix} at instruction {ip}");

    // A failed final flush reports one past the last instruction
    let Some(pos) = instruction::source_offset(code, ip) else {
        let _ = io::stderr().flush();
        return;
    };

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let slice: String = code
        .chars()
        .skip(start_char)
        .take(end_char - start_char)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    eprintln!("  {}", slice);

    // Caret under the exact position
    let caret_offset_chars = pos - start_char;
    eprintln!("  {}^", " ".repeat(caret_offset_chars));
    let _ = io::stderr().flush();
}
