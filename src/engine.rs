//! The execution engine.
//!
//! Runs a validated [`Program`] against a fresh [`Tape`], using the
//! [`JumpTable`] from the same [`build`](crate::build) call for loop
//! transitions. The first violated invariant halts the run.

use std::io::Write;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::BfError;
use crate::instruction::Instruction;
use crate::io::{ByteSink, ByteSource};
use crate::tape::{Tape, DEFAULT_TAPE_SIZE};
use crate::validator::{JumpTable, Program};

/// Controls for cooperative cancellation and step limiting.
///
/// Both are checked between instructions only.
#[derive(Clone, Default)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }

    fn check(&self, step: usize) -> Result<(), BfError> {
        if self.cancel_flag.load(Ordering::Relaxed) {
            return Err(BfError::Canceled);
        }
        if let Some(max) = self.max_steps {
            if step >= max {
                return Err(BfError::StepLimitExceeded { limit: max });
            }
        }
        Ok(())
    }
}

/// Interpreter state for one run at a time: the tape and its data pointer.
///
/// Each run starts from a zeroed tape with the pointer at cell 0; the state
/// left by the last run stays readable through [`Engine::tape`].
#[derive(Debug, Clone)]
pub struct Engine {
    tape: Tape,
}

impl Engine {
    /// Create an engine with a tape of `tape_size` cells.
    pub fn new(tape_size: usize) -> Self {
        Self {
            tape: Tape::new(tape_size),
        }
    }

    /// Tape as left by the most recent run.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn pointer(&self) -> usize {
        self.tape.pointer()
    }

    /// Execute `program` until the program counter runs off its end.
    pub fn run<I, O>(
        &mut self,
        program: &Program,
        jumps: &JumpTable,
        mut input: I,
        mut output: O,
    ) -> Result<(), BfError>
    where
        I: ByteSource,
        O: ByteSink,
    {
        self.execute(program, jumps, &mut input, &mut output, None, None)
    }

    /// Execute with cooperative cancellation and optional step limit.
    pub fn run_with_control<I, O>(
        &mut self,
        program: &Program,
        jumps: &JumpTable,
        mut input: I,
        mut output: O,
        control: &StepControl,
    ) -> Result<(), BfError>
    where
        I: ByteSource,
        O: ByteSink,
    {
        self.execute(program, jumps, &mut input, &mut output, None, Some(control))
    }

    /// Execute while writing a step-by-step table of operations to `trace`.
    ///
    /// Semantics and I/O are exactly those of [`Engine::run`].
    pub fn run_traced<I, O>(
        &mut self,
        program: &Program,
        jumps: &JumpTable,
        mut input: I,
        mut output: O,
        trace: &mut dyn Write,
        control: Option<&StepControl>,
    ) -> Result<(), BfError>
    where
        I: ByteSource,
        O: ByteSink,
    {
        self.execute(program, jumps, &mut input, &mut output, Some(trace), control)
    }

    fn execute(
        &mut self,
        program: &Program,
        jumps: &JumpTable,
        input: &mut dyn ByteSource,
        output: &mut dyn ByteSink,
        mut trace: Option<&mut dyn Write>,
        control: Option<&StepControl>,
    ) -> Result<(), BfError> {
        self.tape.reset();
        tracing::debug!(
            instructions = program.len(),
            tape = self.tape.len(),
            "run started"
        );

        let result = self.step_loop(program, jumps, input, output, &mut trace, control);
        let flushed = output.flush();

        match &result {
            Ok(()) => tracing::debug!(pointer = self.tape.pointer(), "run halted normally"),
            Err(err) => {
                tracing::debug!(kind = %err.kind(), ip = ?err.position(), "run halted with error")
            }
        }

        result?;
        flushed.map_err(|source| BfError::Io { ip: program.len(), source })
    }

    fn step_loop(
        &mut self,
        program: &Program,
        jumps: &JumpTable,
        input: &mut dyn ByteSource,
        output: &mut dyn ByteSink,
        trace: &mut Option<&mut dyn Write>,
        control: Option<&StepControl>,
    ) -> Result<(), BfError> {
        if let Some(t) = trace.as_mut() {
            write_trace_header(&mut **t).map_err(|source| BfError::Io { ip: 0, source })?;
        }

        let mut code_ptr = 0;
        let mut step: usize = 0;

        while let Some(instr) = program.get(code_ptr) {
            if let Some(ctrl) = control {
                ctrl.check(step)?;
            }

            let (ptr_before, cell_before) = (self.tape.pointer(), self.tape.current());
            let mut action: Option<String> = trace.as_ref().map(|_| String::new());
            let mut next = code_ptr + 1;

            match instr {
                Instruction::MoveRight => {
                    self.tape.move_right().map_err(|f| f.at(code_ptr, ptr_before))?;
                    if let Some(a) = action.as_mut() {
                        *a = format!("Moved pointer head to index {}", self.tape.pointer());
                    }
                }
                Instruction::MoveLeft => {
                    self.tape.move_left().map_err(|f| f.at(code_ptr, ptr_before))?;
                    if let Some(a) = action.as_mut() {
                        *a = format!("Moved pointer head to index {}", self.tape.pointer());
                    }
                }
                Instruction::Increment => {
                    self.tape.increment().map_err(|f| f.at(code_ptr, ptr_before))?;
                    if let Some(a) = action.as_mut() {
                        *a = format!(
                            "Increment cell[{}] from {} to {}",
                            ptr_before,
                            cell_before,
                            self.tape.current()
                        );
                    }
                }
                Instruction::Decrement => {
                    self.tape.decrement().map_err(|f| f.at(code_ptr, ptr_before))?;
                    if let Some(a) = action.as_mut() {
                        *a = format!(
                            "Decrement cell[{}] from {} to {}",
                            ptr_before,
                            cell_before,
                            self.tape.current()
                        );
                    }
                }
                Instruction::Output => {
                    output
                        .write_byte(cell_before)
                        .map_err(|source| BfError::Io { ip: code_ptr, source })?;
                    if let Some(a) = action.as_mut() {
                        *a = format!("Output byte {}", cell_before);
                    }
                }
                Instruction::Input => {
                    // Anything already emitted (e.g. a prompt) must be visible before we block.
                    output.flush().map_err(|source| BfError::Io { ip: code_ptr, source })?;
                    match input.read_byte() {
                        Ok(Some(b)) => self.tape.set_current(b),
                        Ok(None) => return Err(BfError::InputExhausted { ip: code_ptr }),
                        Err(source) => return Err(BfError::Io { ip: code_ptr, source }),
                    }
                    if let Some(a) = action.as_mut() {
                        *a = format!("Read byte from input -> {}", self.tape.current());
                    }
                }
                Instruction::LoopOpen { matching_close_index } => {
                    if cell_before == 0 {
                        let close = resolve_jump(jumps, code_ptr, matching_close_index)?;
                        if let Some(a) = action.as_mut() {
                            *a = format!("Cell is 0; jump past matching ']' at IP {}", close);
                        }
                        next = close + 1;
                    } else if let Some(a) = action.as_mut() {
                        *a = "Enter loop (cell != 0)".to_string();
                    }
                }
                Instruction::LoopClose { matching_open_index } => {
                    let open = resolve_jump(jumps, code_ptr, matching_open_index)?;
                    if let Some(a) = action.as_mut() {
                        *a = format!("Jump back to matching '[' at IP {}", open);
                    }
                    next = open;
                }
            }

            if let (Some(t), Some(a)) = (trace.as_mut(), action) {
                writeln!(
                    t,
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {:<5}| {}",
                    step, code_ptr, ptr_before, cell_before, instr, a
                )
                .map_err(|source| BfError::Io { ip: code_ptr, source })?;
            }

            step += 1;
            code_ptr = next;
        }

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_SIZE)
    }
}

/// Look up the loop transition for the marker at `ip`.
///
/// The table must be the one built alongside the program; an entry that is
/// missing or disagrees with the marker's own counterpart is rejected.
fn resolve_jump(jumps: &JumpTable, ip: usize, counterpart: usize) -> Result<usize, BfError> {
    match jumps.get(ip) {
        Some(target) if target == counterpart => Ok(target),
        _ => Err(BfError::JumpTableMismatch { ip }),
    }
}

fn write_trace_header(t: &mut dyn Write) -> std::io::Result<()> {
    writeln!(t, "STEP | IP  | PTR | CELL | INSTR | ACTION")?;
    writeln!(t, "-----+-----+-----+------+-------+------------------------------------------------")
}
