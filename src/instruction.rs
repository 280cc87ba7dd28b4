use std::fmt;

/// The eight-symbol instruction alphabet. Everything else is a comment.
pub const ALPHABET: [char; 8] = ['>', '<', '+', '-', '.', ',', '[', ']'];

/// A single validated instruction.
///
/// Loop markers carry the position of their counterpart once the program
/// has been built; all other variants are plain commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    MoveRight,                                 // >
    MoveLeft,                                  // <
    Increment,                                 // +
    Decrement,                                 // -
    Output,                                    // .
    Input,                                     // ,
    LoopOpen { matching_close_index: usize },  // [
    LoopClose { matching_open_index: usize },  // ]
}

impl Instruction {
    /// The source symbol for this instruction.
    pub fn symbol(&self) -> char {
        match self {
            Instruction::MoveRight => '>',
            Instruction::MoveLeft => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopOpen { .. } => '[',
            Instruction::LoopClose { .. } => ']',
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; 4];
        f.pad(self.symbol().encode_utf8(&mut buf))
    }
}

pub fn is_instruction(c: char) -> bool {
    ALPHABET.contains(&c)
}

/// Keep only instruction characters, in source order.
pub fn filter(source: &str) -> Vec<char> {
    source.chars().filter(|&c| is_instruction(c)).collect()
}

/// Char index in `source` of the instruction at position `ip`.
///
/// Used to point back into the original text when reporting errors.
pub fn source_offset(source: &str, ip: usize) -> Option<usize> {
    source
        .chars()
        .enumerate()
        .filter(|&(_, c)| is_instruction(c))
        .nth(ip)
        .map(|(offset, _)| offset)
}
