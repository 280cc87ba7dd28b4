//! A strict Brainfuck interpreter library.
//!
//! Programs run in two phases. [`build`] filters the source to the eight
//! instruction symbols `><+-.,[]`, checks that every loop is closed, and
//! resolves loop jumps into a [`JumpTable`]. [`Engine::run`] then executes
//! the [`Program`] against a fixed-size tape (30,000 cells by default).
//!
//! Unlike most Brainfuck implementations nothing wraps around:
//! - `>` past the last cell or `<` left of cell 0 is an error.
//! - `+` on 255 or `-` on 0 is an error.
//! - `,` on exhausted input is an error.
//!
//! Every failure carries the position of the offending instruction and stops
//! the run immediately.
//!
//! Quick start:
//!
//! ```
//! use strict_bf::{build, Engine};
//!
//! let (program, jumps) = build("++++++++[>++++++++<-]>.").expect("balanced loops");
//! let mut engine = Engine::default();
//! let mut out: Vec<u8> = Vec::new();
//! engine.run(&program, &jumps, &b""[..], &mut out).expect("program should run");
//! assert_eq!(out, vec![64]);
//! ```

pub mod cli_util;
pub mod config;
pub mod engine;
pub mod error;
pub mod instruction;
pub mod io;
pub mod tape;
pub mod terminal;
pub mod validator;

pub use config::Config;
pub use engine::{Engine, StepControl};
pub use error::{BfError, ErrorKind};
pub use instruction::Instruction;
pub use io::{ByteSink, ByteSource};
pub use tape::{Tape, DEFAULT_TAPE_SIZE};
pub use validator::{build, JumpTable, Program};

/// Validate `source` and run it once on a fresh tape of `tape_size` cells.
///
/// No instruction executes if validation fails.
pub fn run_source<I, O>(source: &str, tape_size: usize, input: I, output: O) -> Result<(), BfError>
where
    I: ByteSource,
    O: ByteSink,
{
    let (program, jumps) = build(source)?;
    Engine::new(tape_size).run(&program, &jumps, input, output)
}
