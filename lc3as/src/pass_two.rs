//! Pass two: encoding and PC-relative label resolution.

use tracing::debug;

use crate::catalog::{self, Opcode, Operand};
use crate::error::ErrorKind;
use crate::field;
use crate::record::LineRecord;
use crate::symbol::SymbolTable;
use crate::Assembler;


/// `ADD DR,DR,#1`, the second word of `.NEG`.
const NEG_INCREMENT: i32 = 0x1021;

impl Assembler {
    /// Encodes every record up to `.END` and returns the object words.
    /// Addresses are not touched; the symbol table must be complete.
    pub fn pass_two(&mut self) -> Vec<u16> {
        debug!("starting pass two");
        let mut records = std::mem::take(&mut self.records);
        let mut words = Vec::with_capacity(records.len());
        for record in &mut records {
            if record.opcode == Opcode::End {
                break;
            }
            match encode(record, &self.symbols) {
                Ok(()) => emit(record, &mut words),
                Err(kind) => self.report_at(record.line, kind),
            }
        }
        self.records = records;
        words
    }
}

fn encode(record: &mut LineRecord, symbols: &SymbolTable) -> Result<(), ErrorKind> {
    let inst = catalog::lookup(record.opcode)
        .ok_or_else(|| ErrorKind::MissingOpcode(record.opcode.to_string()))?;
    let form = inst.form(record.form);
    let mut word = i32::from(form.prototype);
    for operand in form.operands.iter() {
        let Some((hi, lo)) = operand.bits() else {
            continue;
        };
        let value = match operand {
            Operand::R1 => reg(record.reg1),
            Operand::R2 => reg(record.reg2),
            Operand::R3 => reg(record.reg3),
            Operand::Cc => record.cond.map_or(0, i32::from),
            op if op.is_pc_offset() => pc_offset(record, symbols, op.width())?,
            _ => record.immediate,
        };
        word = field::insert(word, hi, lo, value);
    }
    if matches!(record.opcode, Opcode::Zero | Opcode::Neg) {
        word = field::insert(word, 8, 6, reg(record.reg1));
    }
    record.word = word as u16;
    debug!("{record}");
    Ok(())
}

fn reg(reg: Option<u8>) -> i32 {
    reg.map_or(0, i32::from)
}

/// Offset from the word after `record` to the label it references.
fn pc_offset(record: &LineRecord, symbols: &SymbolTable, width: u32) -> Result<i32, ErrorKind> {
    let label = record.reference.as_deref().unwrap_or_default();
    let target = symbols
        .find_by_name(label)
        .ok_or_else(|| ErrorKind::UndefinedLabel(label.to_owned()))?;
    let offset = i32::from(target) - (i32::from(record.address) + 1);
    if !field::fits(offset, width, true) {
        return Err(ErrorKind::PcOffsetRange(label.to_owned()));
    }
    Ok(offset)
}

fn emit(record: &LineRecord, words: &mut Vec<u16>) {
    match record.opcode {
        Opcode::Blkw => words.extend(std::iter::repeat(0).take(usize::from(record.size()))),
        Opcode::Stringz => {
            let text = record.reference.as_deref().unwrap_or_default();
            words.extend(text.encode_utf16());
            words.push(0);
        }
        Opcode::Neg => {
            let dr = reg(record.reg1);
            let increment = field::insert(field::insert(NEG_INCREMENT, 11, 9, dr), 8, 6, dr);
            words.push(record.word);
            words.push(increment as u16);
        }
        _ => words.push(record.word),
    }
}
