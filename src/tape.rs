//! The bounded memory tape.
//!
//! Every operation is checked: the data pointer stays within
//! `0..len` and cells stay within `0..=255`. Nothing wraps.

use crate::error::BfError;

/// Number of cells on a default tape, as Urban Müller defined it.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// A violated tape invariant. The engine attaches the instruction position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    PointerOverflow,
    PointerUnderflow,
    CellOverflow,
    CellUnderflow,
}

impl Fault {
    pub(crate) fn at(self, ip: usize, ptr: usize) -> BfError {
        match self {
            Fault::PointerOverflow => BfError::PointerOverflow { ip, ptr },
            Fault::PointerUnderflow => BfError::PointerUnderflow { ip },
            Fault::CellOverflow => BfError::CellOverflow { ip, ptr },
            Fault::CellUnderflow => BfError::CellUnderflow { ip, ptr },
        }
    }
}

/// Fixed-length, zero-initialized byte tape with a single data pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Tape {
    /// Create a zeroed tape of `size` cells. `size` must be at least 1.
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size.max(1)],
            pointer: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: [`Tape::new`] allocates at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Value of the cell under the data pointer.
    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set_current(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn move_right(&mut self) -> Result<(), Fault> {
        if self.pointer + 1 >= self.cells.len() {
            return Err(Fault::PointerOverflow);
        }
        self.pointer += 1;
        Ok(())
    }

    pub fn move_left(&mut self) -> Result<(), Fault> {
        self.pointer = self.pointer.checked_sub(1).ok_or(Fault::PointerUnderflow)?;
        Ok(())
    }

    pub fn increment(&mut self) -> Result<(), Fault> {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.checked_add(1).ok_or(Fault::CellOverflow)?;
        Ok(())
    }

    pub fn decrement(&mut self) -> Result<(), Fault> {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.checked_sub(1).ok_or(Fault::CellUnderflow)?;
        Ok(())
    }

    /// Zero every cell and return the pointer to 0.
    pub fn reset(&mut self) {
        self.cells.fill(0);
        self.pointer = 0;
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_SIZE)
    }
}
