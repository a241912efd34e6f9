use tracing::{debug, info};

pub mod catalog;
pub mod error;
pub mod field;
pub mod output;
pub mod record;
pub mod symbol;
pub mod token;

mod pass_one;
mod pass_two;

#[cfg(test)]
mod test;

pub use self::error::{Diagnostic, ErrorKind};
pub use self::record::LineRecord;
pub use self::symbol::SymbolTable;

pub type Address = u16;

/// Where pass one is in the program's `.ORIG` ... `.END` frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Stage {
    /// nothing seen yet
    #[default]
    Start,
    /// code before any .ORIG, already reported
    Unopened,
    Open,
    Closed,
    /// code after .END, already reported
    ClosedReported,
}

/// State threaded through both passes.
#[derive(Debug, Default)]
pub struct Assembler {
    pub symbols: SymbolTable,
    pub records: Vec<LineRecord>,
    pub diagnostics: Vec<Diagnostic>,
    cursor: Address,
    line: usize,
    stage: Stage,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next address pass one will assign.
    pub fn cursor(&self) -> Address {
        self.cursor
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    fn report(&mut self, kind: ErrorKind) {
        self.report_at(self.line, kind);
    }

    fn report_at(&mut self, line: usize, kind: ErrorKind) {
        let diagnostic = Diagnostic::new(line, kind);
        debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

/// A fully resolved program.
#[derive(Debug)]
pub struct Assembly {
    /// object words in source order, starting with the origin
    pub words: Vec<u16>,
    pub symbols: SymbolTable,
    pub records: Vec<LineRecord>,
}

/// Runs both passes over `src`. Pass two only runs when pass one found no
/// errors, and nothing is returned unless both passes are clean.
pub fn assemble(src: &str) -> Result<Assembly, Vec<Diagnostic>> {
    let mut asm = Assembler::new();
    asm.pass_one(src);
    info!("{} errors found in first pass", asm.error_count());
    if asm.error_count() > 0 {
        return Err(asm.diagnostics);
    }
    let words = asm.pass_two();
    info!("{} errors found in second pass", asm.error_count());
    if asm.error_count() > 0 {
        return Err(asm.diagnostics);
    }
    Ok(Assembly {
        words,
        symbols: asm.symbols,
        records: asm.records,
    })
}
