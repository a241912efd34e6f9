use std::io::{self, Write};

use crate::symbol::SymbolTable;

#[cfg(test)]
mod test;

/// Encoding of the object file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectFormat {
    /// big endian 16 bit words
    #[default]
    Binary,
    /// one word per line as four hex digits
    Hex,
}

impl ObjectFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ObjectFormat::Binary => "obj",
            ObjectFormat::Hex => "hex",
        }
    }
}

pub fn write_word(out: &mut impl Write, word: u16, format: ObjectFormat) -> io::Result<()> {
    match format {
        ObjectFormat::Binary => out.write_all(&word.to_be_bytes()),
        ObjectFormat::Hex => writeln!(out, "{word:04X}"),
    }
}

pub fn write_object(out: &mut impl Write, words: &[u16], format: ObjectFormat) -> io::Result<()> {
    for &word in words {
        write_word(out, word, format)?;
    }
    out.flush()
}

pub fn write_symbols(out: &mut impl Write, symbols: &SymbolTable) -> io::Result<()> {
    writeln!(out, "// Symbol table")?;
    writeln!(out, "// Scope level 0:")?;
    writeln!(out, "//\tSymbol Name       Page Address")?;
    writeln!(out, "//\t----------------  ------------")?;
    for (name, addr) in symbols.iter() {
        writeln!(out, "//\t{name:<16}  {addr:04X}")?;
    }
    out.flush()
}
