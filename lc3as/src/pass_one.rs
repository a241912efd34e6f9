//! Pass one: label definitions, syntax checks and address allocation.

use tracing::{debug, trace};

use crate::catalog::{self, FormId, Inst, Opcode, Operand};
use crate::error::ErrorKind;
use crate::record::LineRecord;
use crate::token::{self, Tokens};
use crate::{Address, Assembler, Stage};

#[cfg(test)]
mod test;

impl Assembler {
    pub fn pass_one(&mut self, src: &str) {
        debug!("starting pass one");
        let mut lines = 0;
        for (i, line) in src.lines().enumerate() {
            lines = i + 1;
            self.line = lines;
            let mut tokens = Tokens::new(line);
            if let Some(first) = tokens.next() {
                self.check_line(first, &mut tokens);
            }
        }
        self.line = lines;
        match self.stage {
            Stage::Start => self.report(ErrorKind::MissingOrig),
            Stage::Unopened | Stage::Open => self.report(ErrorKind::MissingEnd),
            Stage::Closed | Stage::ClosedReported => (),
        }
    }

    fn check_line<'a>(&mut self, first: &'a str, tokens: &mut Tokens<'a>) {
        trace!(line = self.line, first);
        // only comments may follow .END
        match self.stage {
            Stage::Closed => {
                self.report(ErrorKind::EndNotLast);
                self.stage = Stage::ClosedReported;
                return;
            }
            Stage::ClosedReported => return,
            _ => (),
        }
        let Some(mnemonic) = self.check_label(first, tokens) else {
            return;
        };
        let opcode = Opcode::parse(mnemonic);
        let Some(inst) = catalog::lookup(opcode) else {
            self.report(if catalog::looks_like_branch(mnemonic) {
                ErrorKind::BadCondition(mnemonic.to_owned())
            } else {
                ErrorKind::MissingOpcode(mnemonic.to_owned())
            });
            return;
        };
        self.enter(opcode);
        let mut record = LineRecord::new(self.line, self.cursor, opcode);
        if let Err(kind) = scan_operands(&mut record, inst, mnemonic, tokens) {
            self.report(kind);
        }
        self.update_address(&mut record);
        debug!("{record}");
        self.records.push(record);
    }

    /// Defines the label if `first` is not an opcode and returns the token
    /// that should hold the opcode. `None` means a label-only line.
    fn check_label<'a>(&mut self, first: &'a str, tokens: &mut Tokens<'a>) -> Option<&'a str> {
        if Opcode::parse(first) != Opcode::Invalid {
            return Some(first);
        }
        if catalog::looks_like_branch(first) {
            self.report(ErrorKind::BadCondition(first.to_owned()));
            return None;
        }
        if !token::is_valid_label(first) {
            self.report(ErrorKind::BadLabel(first.to_owned()));
        } else if !self.symbols.insert(first, self.cursor) {
            self.report(ErrorKind::DuplicateLabel(first.to_owned()));
        }
        tokens.next()
    }

    /// Tracks the `.ORIG`/`.END` frame. Lines after `.END` never get here.
    fn enter(&mut self, opcode: Opcode) {
        match self.stage {
            Stage::Start if opcode != Opcode::Orig => {
                self.report(ErrorKind::OrigNotFirst);
                self.stage = Stage::Unopened;
            }
            Stage::Start | Stage::Unopened if opcode == Opcode::Orig => self.stage = Stage::Open,
            Stage::Open if opcode == Opcode::Orig => self.report(ErrorKind::RepeatedOrig),
            _ => (),
        }
        if opcode == Opcode::End {
            self.stage = Stage::Closed;
        }
    }

    fn update_address(&mut self, record: &mut LineRecord) {
        if record.opcode == Opcode::Orig {
            self.cursor = record.immediate as Address;
            record.address = self.cursor;
        } else {
            self.cursor = self.cursor.wrapping_add(record.size());
        }
    }
}

fn scan_operands(
    record: &mut LineRecord,
    inst: &Inst,
    mnemonic: &str,
    tokens: &mut Tokens<'_>,
) -> Result<(), ErrorKind> {
    record.form = inst.select(mnemonic);
    if record.opcode == Opcode::Br {
        record.cond = catalog::branch_suffix(mnemonic).and_then(catalog::parse_cond);
    }
    let operands = inst.form(record.form).operands;
    let expected = operands.token_count();
    for (i, operand) in operands.iter().filter(|op| op.from_token()).enumerate() {
        let token = tokens.next().ok_or(ErrorKind::MissingOperand)?;
        scan_operand(record, inst, operand, token)?;
        if i + 1 < expected {
            match tokens.next() {
                Some(",") => (),
                Some(other) => return Err(ErrorKind::ExpectedComma(other.to_owned())),
                None => return Err(ErrorKind::MissingOperand),
            }
        }
    }
    let extra = match tokens.next() {
        Some(",") => tokens.next().unwrap_or(","),
        Some(extra) => extra,
        None => return Ok(()),
    };
    Err(ErrorKind::ExtraOperand(extra.to_owned()))
}

fn scan_operand(
    record: &mut LineRecord,
    inst: &Inst,
    operand: Operand,
    token: &str,
) -> Result<(), ErrorKind> {
    use Operand::*;
    match operand {
        R1 => record.reg1 = Some(register(token)?),
        R2 => record.reg2 = Some(register(token)?),
        R3 => match token::parse_reg(token) {
            Some(reg) => record.reg3 = Some(reg),
            None if inst.has_imm5_alt() => {
                record.immediate = immediate(token, Imm5, ErrorKind::ExpectedRegImm)?;
                record.form = FormId::Alt;
            }
            None => return Err(ErrorKind::ExpectedReg(token.to_owned())),
        },
        Imm5 | Off6 | Vec8 => record.immediate = immediate(token, operand, ErrorKind::BadImmediate)?,
        Imm16 => {
            let value = immediate(token, operand, ErrorKind::BadImmediate)?;
            // an origin or a word count is never negative
            if value < 0 && matches!(record.opcode, Opcode::Orig | Opcode::Blkw) {
                return Err(ErrorKind::ImmediateRange(token.to_owned()));
            }
            record.immediate = value;
        }
        Pco9 | Pco11 => {
            if !token::is_valid_label(token) {
                return Err(ErrorKind::BadLabel(token.to_owned()));
            }
            record.reference = Some(token.to_owned());
        }
        Str => record.reference = Some(token::parse_string(token)?),
        Cc => (),
    }
    Ok(())
}

fn register(token: &str) -> Result<u8, ErrorKind> {
    token::parse_reg(token).ok_or_else(|| ErrorKind::ExpectedReg(token.to_owned()))
}

fn immediate(
    token: &str,
    operand: Operand,
    malformed: fn(String) -> ErrorKind,
) -> Result<i32, ErrorKind> {
    let value = token::parse_int(token).ok_or_else(|| malformed(token.to_owned()))?;
    if !operand.fits(value) {
        return Err(ErrorKind::ImmediateRange(token.to_owned()));
    }
    Ok(value)
}
