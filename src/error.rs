use std::fmt;

/// Errors that can occur while validating or interpreting a program.
///
/// `ip` is always a position in the filtered instruction sequence, not a
/// byte or char offset into the original source text.
#[derive(Debug, thiserror::Error)]
pub enum BfError {
    /// A `]` appeared with no pending `[`.
    #[error("Mismatched brace ']' at instruction {ip}")]
    MismatchedBrace { ip: usize },

    /// A `[` was never closed. `ip` is the innermost unmatched opener.
    #[error("Unclosed loop '[' at instruction {ip}")]
    UnclosedLoop { ip: usize },

    /// `>` attempted to move past the last cell.
    #[error("Pointer overflow at instruction {ip} (ptr={ptr})")]
    PointerOverflow { ip: usize, ptr: usize },

    /// `<` attempted to move left of cell 0.
    #[error("Pointer underflow at instruction {ip}")]
    PointerUnderflow { ip: usize },

    /// `+` on a cell already holding 255.
    #[error("Cell overflow at instruction {ip} (cell[{ptr}] is 255)")]
    CellOverflow { ip: usize, ptr: usize },

    /// `-` on a cell holding 0.
    #[error("Cell underflow at instruction {ip} (cell[{ptr}] is 0)")]
    CellUnderflow { ip: usize, ptr: usize },

    /// A loop marker's jump table entry is missing or points elsewhere,
    /// i.e. the table was not built from this program.
    #[error("Jump table does not match the program at instruction {ip}")]
    JumpTableMismatch { ip: usize },

    /// `,` found the byte source exhausted.
    #[error("Input exhausted at instruction {ip}")]
    InputExhausted { ip: usize },

    /// The byte source or sink failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io { ip: usize, #[source] source: std::io::Error },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (e.g., timeout)
    #[error("Execution aborted: cancelled")]
    Canceled,
}

/// The kind of a [`BfError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MismatchedBrace,
    UnclosedLoop,
    PointerOverflow,
    PointerUnderflow,
    CellOverflow,
    CellUnderflow,
    InputExhausted,
    JumpTableMismatch,
    Io,
    StepLimitExceeded,
    Canceled,
}

impl ErrorKind {
    /// Structural errors are raised by the validator before anything runs.
    pub fn is_structural(self) -> bool {
        matches!(self, ErrorKind::MismatchedBrace | ErrorKind::UnclosedLoop)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MismatchedBrace => "mismatched brace",
            ErrorKind::UnclosedLoop => "unclosed loop",
            ErrorKind::PointerOverflow => "pointer overflow",
            ErrorKind::PointerUnderflow => "pointer underflow",
            ErrorKind::CellOverflow => "cell overflow",
            ErrorKind::CellUnderflow => "cell underflow",
            ErrorKind::InputExhausted => "input exhausted",
            ErrorKind::JumpTableMismatch => "jump table mismatch",
            ErrorKind::Io => "i/o failure",
            ErrorKind::StepLimitExceeded => "step limit exceeded",
            ErrorKind::Canceled => "cancelled",
        };
        f.write_str(name)
    }
}

impl BfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BfError::MismatchedBrace { .. } => ErrorKind::MismatchedBrace,
            BfError::UnclosedLoop { .. } => ErrorKind::UnclosedLoop,
            BfError::PointerOverflow { .. } => ErrorKind::PointerOverflow,
            BfError::PointerUnderflow { .. } => ErrorKind::PointerUnderflow,
            BfError::CellOverflow { .. } => ErrorKind::CellOverflow,
            BfError::CellUnderflow { .. } => ErrorKind::CellUnderflow,
            BfError::InputExhausted { .. } => ErrorKind::InputExhausted,
            BfError::JumpTableMismatch { .. } => ErrorKind::JumpTableMismatch,
            BfError::Io { .. } => ErrorKind::Io,
            BfError::StepLimitExceeded { .. } => ErrorKind::StepLimitExceeded,
            BfError::Canceled => ErrorKind::Canceled,
        }
    }

    /// Instruction position the error occurred at, if it is tied to one.
    pub fn position(&self) -> Option<usize> {
        match self {
            BfError::MismatchedBrace { ip }
            | BfError::UnclosedLoop { ip }
            | BfError::PointerOverflow { ip, .. }
            | BfError::PointerUnderflow { ip }
            | BfError::CellOverflow { ip, .. }
            | BfError::CellUnderflow { ip, .. }
            | BfError::InputExhausted { ip }
            | BfError::JumpTableMismatch { ip }
            | BfError::Io { ip, .. } => Some(*ip),
            BfError::StepLimitExceeded { .. } | BfError::Canceled => None,
        }
    }
}
