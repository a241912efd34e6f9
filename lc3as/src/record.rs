use std::fmt;

use crate::catalog::{FormId, Opcode};
use crate::Address;

/// Everything pass one learns about a line with an opcode. Pass two only
/// fills in `word`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// 1-based source line
    pub line: usize,
    pub address: Address,
    pub word: u16,
    pub opcode: Opcode,
    pub form: FormId,
    pub reg1: Option<u8>,
    pub reg2: Option<u8>,
    pub reg3: Option<u8>,
    /// `nzp` bits of a branch
    pub cond: Option<u8>,
    pub immediate: i32,
    /// label operand, or the decoded text of a `.STRINGZ`
    pub reference: Option<String>,
}

impl LineRecord {
    pub fn new(line: usize, address: Address, opcode: Opcode) -> Self {
        Self {
            line,
            address,
            word: 0,
            opcode,
            form: FormId::Base,
            reg1: None,
            reg2: None,
            reg3: None,
            cond: None,
            immediate: 0,
            reference: None,
        }
    }

    /// Words this line occupies in memory.
    pub fn size(&self) -> u16 {
        match self.opcode {
            Opcode::Orig | Opcode::End => 0,
            Opcode::Blkw => self.immediate as u16,
            Opcode::Stringz => self
                .reference
                .as_ref()
                .map_or(0, |s| s.chars().count() as u16)
                + 1,
            Opcode::Neg => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for LineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: x{:04X} x{:04X} {} {:?}",
            self.line, self.address, self.word, self.opcode, self.form
        )?;
        for (name, reg) in [("r1", self.reg1), ("r2", self.reg2), ("r3", self.reg3)] {
            if let Some(reg) = reg {
                write!(f, " {name}:{reg}")?;
            }
        }
        if let Some(cond) = self.cond {
            write!(f, " cc:{cond:03b}")?;
        }
        if self.immediate != 0 {
            write!(f, " imm:{}", self.immediate)?;
        }
        if let Some(reference) = &self.reference {
            write!(f, " ref:{reference:?}")?;
        }
        Ok(())
    }
}
