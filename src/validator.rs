//! Structural validation and jump resolution.
//!
//! [`build`] turns source text into a [`Program`] plus its [`JumpTable`] in a
//! single left-to-right pass. Nothing executes unless the whole program is
//! balanced.

use crate::error::BfError;
use crate::instruction::{self, Instruction};

/// An ordered, validated instruction sequence with balanced loops.
///
/// Only [`build`] creates one, so every loop marker is guaranteed to have
/// a counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, ip: usize) -> Option<Instruction> {
        self.instructions.get(ip).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

/// Maps each loop marker's position to its counterpart's position.
///
/// For a `[` at `open` matched by a `]` at `close`, `get(open) == close` and
/// `get(close) == open`. A taken `[` resumes at `close + 1`; a `]` always
/// resumes at `open`, where the loop condition is tested again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    targets: Vec<Option<usize>>,
    entries: usize,
}

impl JumpTable {
    fn with_len(len: usize) -> Self {
        Self {
            targets: vec![None; len],
            entries: 0,
        }
    }

    fn link(&mut self, open: usize, close: usize) {
        self.targets[open] = Some(close);
        self.targets[close] = Some(open);
        self.entries += 2;
    }

    /// Counterpart of the loop marker at `ip`, or `None` for any other position.
    pub fn get(&self, ip: usize) -> Option<usize> {
        self.targets.get(ip).copied().flatten()
    }

    /// Number of recorded positions; always twice the number of loop pairs.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// `(open, close)` pairs in order of their opening position.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(ip, t)| t.filter(|&other| other > ip).map(|close| (ip, close)))
    }
}

/// Filter `source` to its instructions, check loop structure and resolve jumps.
///
/// Fails with [`BfError::MismatchedBrace`] at the first `]` with no pending
/// `[`, or [`BfError::UnclosedLoop`] at the innermost `[` left open.
pub fn build(source: &str) -> Result<(Program, JumpTable), BfError> {
    let symbols = instruction::filter(source);
    let mut instructions = Vec::with_capacity(symbols.len());
    let mut jumps = JumpTable::with_len(symbols.len());
    let mut stack: Vec<usize> = Vec::new();

    for (ip, &c) in symbols.iter().enumerate() {
        let instr = match c {
            '>' => Instruction::MoveRight,
            '<' => Instruction::MoveLeft,
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            '[' => {
                stack.push(ip);
                // Patched once the matching ']' is seen.
                Instruction::LoopOpen { matching_close_index: ip }
            }
            ']' => {
                let Some(open) = stack.pop() else {
                    return Err(BfError::MismatchedBrace { ip });
                };
                instructions[open] = Instruction::LoopOpen { matching_close_index: ip };
                jumps.link(open, ip);
                Instruction::LoopClose { matching_open_index: open }
            }
            _ => unreachable!("filter only yields instruction symbols"),
        };
        instructions.push(instr);
    }

    if let Some(unmatched_open) = stack.last().copied() {
        return Err(BfError::UnclosedLoop { ip: unmatched_open });
    }

    tracing::debug!(
        instructions = instructions.len(),
        loops = jumps.len() / 2,
        "program built"
    );

    Ok((Program { instructions }, jumps))
}
