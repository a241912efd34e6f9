//! The LC-3 instruction set as data: opcodes, operand kinds, and the one or
//! two forms each opcode may be written in.

use std::fmt;

use crate::field;


/// The sixteen machine operations followed by the pseudo-ops. The machine
/// operations are declared in encoding order, so `Br as u16` is the value
/// of bits 15..12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    /// PC = PCi + PCoffset9 if condition is met
    Br,
    /// DR = SR1 + SR2 or DR = SR1 + imm5
    Add,
    /// DR = mem[PCi + PCoffset9]
    Ld,
    /// mem[PCi + PCoffset9] = SR
    St,
    /// R7 = PCi and (PC = BaseR or PC = PCi + PCoffset11)
    JsrJsrr,
    /// DR = SR1 & SR2 or DR = SR1 & imm5
    And,
    /// DR = mem[BaseR + offset6]
    Ldr,
    /// mem[BaseR + offset6] = SR
    Str,
    /// return from interrupt
    Rti,
    /// DR = ~SR
    Not,
    /// DR = mem[mem[PCi + PCoffset9]]
    Ldi,
    /// mem[mem[PCi + PCoffset9]] = SR
    Sti,
    /// PC = BaseR, or PC = R7
    JmpRet,
    /// unused encoding
    Reserved,
    /// DR = PCi + PCoffset9
    Lea,
    /// R7 = PCi, PC = mem[trapvect8]
    Trap,
    Orig,
    End,
    Blkw,
    Fill,
    Stringz,
    Getc,
    Out,
    Puts,
    In,
    Putsp,
    Halt,
    Gets,
    /// AND DR,DR,#0
    Zero,
    /// ADD DR,SR,#0
    Copy,
    /// NOT DR,DR then ADD DR,DR,#1
    Neg,
    Invalid,
}

/// Mnemonics other than the `BR` family, which is matched separately.
const MNEMONICS: &[(&str, Opcode)] = &[
    ("ADD", Opcode::Add),
    ("AND", Opcode::And),
    ("GETC", Opcode::Getc),
    ("GETS", Opcode::Gets),
    ("HALT", Opcode::Halt),
    ("IN", Opcode::In),
    ("JMP", Opcode::JmpRet),
    ("JSR", Opcode::JsrJsrr),
    ("JSRR", Opcode::JsrJsrr),
    ("LD", Opcode::Ld),
    ("LDI", Opcode::Ldi),
    ("LDR", Opcode::Ldr),
    ("LEA", Opcode::Lea),
    ("NOT", Opcode::Not),
    ("OUT", Opcode::Out),
    ("PUTS", Opcode::Puts),
    ("PUTSP", Opcode::Putsp),
    ("RET", Opcode::JmpRet),
    ("RTI", Opcode::Rti),
    ("ST", Opcode::St),
    ("STI", Opcode::Sti),
    ("STR", Opcode::Str),
    ("TRAP", Opcode::Trap),
    (".BLKW", Opcode::Blkw),
    (".COPY", Opcode::Copy),
    (".END", Opcode::End),
    (".FILL", Opcode::Fill),
    (".NEG", Opcode::Neg),
    (".ORIG", Opcode::Orig),
    (".STRINGZ", Opcode::Stringz),
    (".ZERO", Opcode::Zero),
];

impl Opcode {
    /// Resolves a mnemonic, ignoring case. Unknown text is `Invalid`.
    pub fn parse(token: &str) -> Self {
        if let Some((_, op)) = MNEMONICS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
        {
            return *op;
        }
        match branch_suffix(token).map(parse_cond) {
            Some(Some(_)) => Opcode::Br,
            _ => Opcode::Invalid,
        }
    }

    pub fn name(self) -> &'static str {
        use Opcode::*;
        match self {
            Br => "BR",
            Add => "ADD",
            Ld => "LD",
            St => "ST",
            JsrJsrr => "JSR/JSRR",
            And => "AND",
            Ldr => "LDR",
            Str => "STR",
            Rti => "RTI",
            Not => "NOT",
            Ldi => "LDI",
            Sti => "STI",
            JmpRet => "JMP/RET",
            Reserved => "RESERVED",
            Lea => "LEA",
            Trap => "TRAP",
            Orig => ".ORIG",
            End => ".END",
            Blkw => ".BLKW",
            Fill => ".FILL",
            Stringz => ".STRINGZ",
            Getc => "GETC",
            Out => "OUT",
            Puts => "PUTS",
            In => "IN",
            Putsp => "PUTSP",
            Halt => "HALT",
            Gets => "GETS",
            Zero => ".ZERO",
            Copy => ".COPY",
            Neg => ".NEG",
            Invalid => "INVALID",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The text after `BR`, if `token` starts with it.
pub fn branch_suffix(token: &str) -> Option<&str> {
    let prefix = token.get(..2)?;
    prefix.eq_ignore_ascii_case("BR").then(|| &token[2..])
}

/// Whether `token` is `BR` followed only by condition letters, valid or
/// not. Such a token is never a label.
pub fn looks_like_branch(token: &str) -> bool {
    branch_suffix(token).is_some_and(|suffix| {
        !suffix.is_empty()
            && suffix
                .chars()
                .all(|ch| matches!(ch.to_ascii_lowercase(), 'n' | 'z' | 'p'))
    })
}

/// Parses an `nzp` condition suffix. Letters must appear in that order and
/// at most once; an empty suffix means "always".
pub fn parse_cond(suffix: &str) -> Option<u8> {
    if suffix.is_empty() {
        return Some(0b111);
    }
    let mut cond = 0u8;
    let mut last = 0u8;
    for ch in suffix.chars() {
        let bit = match ch.to_ascii_lowercase() {
            'n' => 0b100,
            'z' => 0b010,
            'p' => 0b001,
            _ => return None,
        };
        // bits must strictly decrease, which forbids repeats and reordering
        if last != 0 && bit >= last {
            return None;
        }
        cond |= bit;
        last = bit;
    }
    Some(cond)
}

/// One operand slot of an instruction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operand {
    /// DR or SR
    R1,
    /// SR1 or BaseR
    R2,
    /// SR2
    R3,
    /// condition codes, taken from the mnemonic
    Cc,
    Imm5,
    Off6,
    /// trapvect8
    Vec8,
    /// label, 9 bit PC offset
    Pco9,
    /// label, 11 bit PC offset
    Pco11,
    /// 16 bit value for .FILL, .ORIG and .BLKW
    Imm16,
    /// string literal
    Str,
}

impl Operand {
    /// Traversal order used by both passes.
    pub const ALL: [Operand; 11] = [
        Operand::R1,
        Operand::R2,
        Operand::R3,
        Operand::Cc,
        Operand::Imm5,
        Operand::Off6,
        Operand::Vec8,
        Operand::Pco9,
        Operand::Pco11,
        Operand::Imm16,
        Operand::Str,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }

    /// Bits of the instruction word this operand is written to, as `(hi, lo)`.
    pub const fn bits(self) -> Option<(u32, u32)> {
        use Operand::*;
        Some(match self {
            R1 | Cc => (11, 9),
            R2 => (8, 6),
            R3 => (2, 0),
            Imm5 => (4, 0),
            Off6 => (5, 0),
            Vec8 => (7, 0),
            Pco9 => (8, 0),
            Pco11 => (10, 0),
            Imm16 => (15, 0),
            Str => return None,
        })
    }

    pub const fn width(self) -> u32 {
        match self.bits() {
            Some((hi, lo)) => hi - lo + 1,
            None => 0,
        }
    }

    /// Whether the operand is read from a source token. Condition codes are
    /// part of the mnemonic instead.
    pub const fn from_token(self) -> bool {
        !matches!(self, Operand::Cc)
    }

    pub const fn is_pc_offset(self) -> bool {
        matches!(self, Operand::Pco9 | Operand::Pco11)
    }

    /// Range check for immediate operands. 16 bit values may be written
    /// either signed or unsigned.
    pub fn fits(self, value: i32) -> bool {
        use Operand::*;
        match self {
            Imm5 | Off6 => field::fits(value, self.width(), true),
            Vec8 => field::fits(value, self.width(), false),
            Imm16 => field::fits(value, 16, true) || field::fits(value, 16, false),
            _ => false,
        }
    }

    pub fn name(self) -> &'static str {
        use Operand::*;
        match self {
            R1 => "R1",
            R2 => "R2",
            R3 => "R3",
            Cc => "CC",
            Imm5 => "IMM5",
            Off6 => "OFF6",
            Vec8 => "VEC8",
            Pco9 => "PCO9",
            Pco11 => "PCO11",
            Imm16 => "IMM16",
            Str => "STR",
        }
    }
}

/// A set of operand kinds.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Operands(u16);

impl Operands {
    pub const NONE: Self = Self(0);

    pub const fn with(self, op: Operand) -> Self {
        Self(self.0 | op.bit())
    }
    pub const fn contains(self, op: Operand) -> bool {
        self.0 & op.bit() != 0
    }
    pub fn iter(self) -> impl Iterator<Item = Operand> {
        Operand::ALL.into_iter().filter(move |op| self.contains(*op))
    }
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
    /// Number of operands written as tokens after the mnemonic.
    pub fn token_count(self) -> usize {
        self.iter().filter(|op| op.from_token()).count()
    }
}

impl fmt::Debug for Operands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for Operands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, op) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(op.name())?;
        }
        Ok(())
    }
}

/// Human readable name of an operand set, e.g. `R1,R2,IMM5`.
pub fn format_name(operands: Operands) -> String {
    operands.to_string()
}

const fn ops<const N: usize>(list: [Operand; N]) -> Operands {
    let mut set = Operands::NONE;
    let mut i = 0;
    while i < N {
        set = set.with(list[i]);
        i += 1;
    }
    set
}

const RRR: Operands = ops([Operand::R1, Operand::R2, Operand::R3]);
const RRI5: Operands = ops([Operand::R1, Operand::R2, Operand::Imm5]);
const RRI6: Operands = ops([Operand::R1, Operand::R2, Operand::Off6]);
const RR: Operands = ops([Operand::R1, Operand::R2]);
const RL: Operands = ops([Operand::R1, Operand::Pco9]);
const DR: Operands = ops([Operand::R1]);
const BASER: Operands = ops([Operand::R2]);
const CL: Operands = ops([Operand::Cc, Operand::Pco9]);
const L11: Operands = ops([Operand::Pco11]);
const V: Operands = ops([Operand::Vec8]);
const I16: Operands = ops([Operand::Imm16]);
const S: Operands = ops([Operand::Str]);
const NONE: Operands = Operands::NONE;

/// One concrete syntax of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Form {
    pub name: &'static str,
    pub operands: Operands,
    /// bits that are constant in this form
    pub prototype: u16,
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name: {} operands: {} prototype x{:04X}",
            self.name,
            format_name(self.operands),
            self.prototype
        )
    }
}

/// Which of an opcode's forms a line uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FormId {
    #[default]
    Base,
    Alt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inst {
    /// Bit that tells the two forms apart, if the encoding has one.
    pub form_bit: Option<u32>,
    pub base: Form,
    pub alt: Option<Form>,
}

impl Inst {
    pub fn form(&self, id: FormId) -> &Form {
        match (id, &self.alt) {
            (FormId::Alt, Some(alt)) => alt,
            _ => &self.base,
        }
    }

    pub fn forms(&self) -> impl Iterator<Item = &Form> {
        std::iter::once(&self.base).chain(self.alt.as_ref())
    }

    /// Picks a form from the mnemonic as written: the base form when the
    /// text names it, otherwise the alternate one if there is one.
    pub fn select(&self, mnemonic: &str) -> FormId {
        if self.alt.is_some() && !self.base.name.eq_ignore_ascii_case(mnemonic) {
            FormId::Alt
        } else {
            FormId::Base
        }
    }

    /// Whether an immediate in the third slot switches to the alternate form.
    pub fn has_imm5_alt(&self) -> bool {
        self.alt
            .is_some_and(|alt| alt.operands.contains(Operand::Imm5))
    }
}

const fn single(name: &'static str, operands: Operands, prototype: u16) -> Inst {
    Inst {
        form_bit: None,
        base: Form {
            name,
            operands,
            prototype,
        },
        alt: None,
    }
}

const fn pair(form_bit: Option<u32>, base: Form, alt: Form) -> Inst {
    Inst {
        form_bit,
        base,
        alt: Some(alt),
    }
}

const fn form(name: &'static str, operands: Operands, prototype: u16) -> Form {
    Form {
        name,
        operands,
        prototype,
    }
}

static BR: Inst = single("BR", CL, 0x0000);
static ADD: Inst = pair(Some(5), form("ADD", RRR, 0x1000), form("ADD", RRI5, 0x1020));
static LD: Inst = single("LD", RL, 0x2000);
static ST: Inst = single("ST", RL, 0x3000);
static JSR: Inst = pair(Some(11), form("JSRR", BASER, 0x4000), form("JSR", L11, 0x4800));
static AND: Inst = pair(Some(5), form("AND", RRR, 0x5000), form("AND", RRI5, 0x5020));
static LDR: Inst = single("LDR", RRI6, 0x6000);
static STR: Inst = single("STR", RRI6, 0x7000);
static RTI: Inst = single("RTI", NONE, 0x8000);
static NOT: Inst = single("NOT", RR, 0x903F);
static LDI: Inst = single("LDI", RL, 0xA000);
static STI: Inst = single("STI", RL, 0xB000);
static JMP: Inst = pair(None, form("JMP", BASER, 0xC000), form("RET", NONE, 0xC1C0));
static LEA: Inst = single("LEA", RL, 0xE000);
static TRAP: Inst = single("TRAP", V, 0xF000);
static ORIG: Inst = single(".ORIG", I16, 0x0000);
static END: Inst = single(".END", NONE, 0x0000);
static BLKW: Inst = single(".BLKW", I16, 0x0000);
static FILL: Inst = single(".FILL", I16, 0x0000);
static STRINGZ: Inst = single(".STRINGZ", S, 0x0000);
static GETC: Inst = single("GETC", NONE, 0xF020);
static OUT: Inst = single("OUT", NONE, 0xF021);
static PUTS: Inst = single("PUTS", NONE, 0xF022);
static IN: Inst = single("IN", NONE, 0xF023);
static PUTSP: Inst = single("PUTSP", NONE, 0xF024);
static HALT: Inst = single("HALT", NONE, 0xF025);
static GETS: Inst = single("GETS", NONE, 0xF026);
static ZERO: Inst = single(".ZERO", DR, 0x5020);
static COPY: Inst = single(".COPY", RR, 0x1020);
static NEG: Inst = single(".NEG", DR, 0x903F);

/// The forms of `opcode`, or `None` for `Reserved` and `Invalid`.
pub fn lookup(opcode: Opcode) -> Option<&'static Inst> {
    use Opcode::*;
    Some(match opcode {
        Br => &BR,
        Add => &ADD,
        Ld => &LD,
        St => &ST,
        JsrJsrr => &JSR,
        And => &AND,
        Ldr => &LDR,
        Str => &STR,
        Rti => &RTI,
        Not => &NOT,
        Ldi => &LDI,
        Sti => &STI,
        JmpRet => &JMP,
        Lea => &LEA,
        Trap => &TRAP,
        Orig => &ORIG,
        End => &END,
        Blkw => &BLKW,
        Fill => &FILL,
        Stringz => &STRINGZ,
        Getc => &GETC,
        Out => &OUT,
        Puts => &PUTS,
        In => &IN,
        Putsp => &PUTSP,
        Halt => &HALT,
        Gets => &GETS,
        Zero => &ZERO,
        Copy => &COPY,
        Neg => &NEG,
        Reserved | Invalid => return None,
    })
}

/// Multi-line description of an opcode's forms, as shown by `seelc3`.
pub fn describe(inst: &Inst) -> String {
    let form_bit = inst.form_bit.map_or(-1, |b| b as i32);
    let mut out = format!("form bit:{form_bit:2}\n");
    for (i, form) in inst.forms().enumerate() {
        out.push_str(&format!("form: {i} {form}\n"));
    }
    out
}
