use std::fmt;

/// Every problem the assembler diagnoses. Each one counts as one error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    // io
    #[error("could not open '{path}' for reading: {reason}")]
    OpenRead { path: String, reason: String },
    #[error("could not open '{path}' for writing: {reason}")]
    OpenWrite { path: String, reason: String },
    #[error("could not write '{path}': {reason}")]
    Write { path: String, reason: String },
    // labels
    #[error("label '{0}' contains illegal characters")]
    BadLabel(String),
    #[error("label '{0}' previously defined")]
    DuplicateLabel(String),
    #[error("label '{0}' never defined")]
    UndefinedLabel(String),
    // syntax
    #[error("expected LC3 op, got '{0}'")]
    MissingOpcode(String),
    #[error("bad condition codes in '{0}'")]
    BadCondition(String),
    #[error("expected comma, got '{0}'")]
    ExpectedComma(String),
    #[error("too few operand(s)")]
    MissingOperand,
    #[error("extra operand(s) '{0}'")]
    ExtraOperand(String),
    #[error("immediate '{0}' (bad format)")]
    BadImmediate(String),
    #[error("expected quoted string, got '{0}'")]
    ExpectedString(String),
    #[error("unterminated string '{0}'")]
    BadString(String),
    #[error("character '{0}' does not fit in a word")]
    WideChar(char),
    // range
    #[error("immediate '{0}' out of range")]
    ImmediateRange(String),
    #[error("PCoffset to '{0}' out of range")]
    PcOffsetRange(String),
    // registers
    #[error("expected register (R0-R7), got '{0}'")]
    ExpectedReg(String),
    #[error("expected register or immediate, got '{0}'")]
    ExpectedRegImm(String),
    // program structure
    #[error("instruction(s) appear before .ORIG")]
    OrigNotFirst,
    #[error("instruction(s) appear after .END")]
    EndNotLast,
    #[error(".ORIG already given")]
    RepeatedOrig,
    #[error(".ORIG not found")]
    MissingOrig,
    #[error(".END not found")]
    MissingEnd,
}

/// An error tied to the source line it was found on. Line `0` is used for
/// problems that belong to no line, such as unreadable files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: ErrorKind,
}

impl Diagnostic {
    pub fn new(line: usize, kind: ErrorKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR {:3}: {}", self.line, self.kind)
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
