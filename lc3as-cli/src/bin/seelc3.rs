//! Prints the encoding forms the assembler knows for a mnemonic.

use std::process::ExitCode;

use clap::Parser;
use lc3as::catalog::{self, Opcode};

#[derive(Parser)]
#[command(version, about = "Show the LC-3 instruction forms of an opcode", long_about = None)]
struct Args {
    /// Mnemonic or pseudo-op, e.g. `ADD`, `BRnz` or `.FILL`
    mnemonic: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let opcode = Opcode::parse(&args.mnemonic);
    match catalog::lookup(opcode) {
        Some(inst) => {
            println!("{opcode}");
            print!("{}", catalog::describe(inst));
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("{} is not an opcode", args.mnemonic);
            ExitCode::FAILURE
        }
    }
}
