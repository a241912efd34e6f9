use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use lc3as::{
    output::{self, ObjectFormat},
    Diagnostic, ErrorKind,
};
use tracing::Level;

#[derive(Parser)]
#[command(version, about = "LC-3 assembler", long_about = None)]
struct Args {
    /// Assembly source file, must end in `.asm`
    #[arg(value_parser = asm_path)]
    source: PathBuf,

    /// Write the object as hex text (`.hex`) instead of binary (`.obj`)
    #[arg(long)]
    hex: bool,

    /// Object file (default: source path with the object extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn asm_path(arg: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(arg);
    match path.extension() {
        Some(ext) if ext == "asm" => Ok(path),
        _ => Err(format!("'{arg}' does not end in .asm")),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                eprintln!("{diagnostic}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Vec<Diagnostic>> {
    let src = fs::read_to_string(&args.source).map_err(|e| {
        vec![Diagnostic::new(
            0,
            ErrorKind::OpenRead {
                path: args.source.display().to_string(),
                reason: e.to_string(),
            },
        )]
    })?;
    let assembly = lc3as::assemble(&src)?;

    let format = if args.hex {
        ObjectFormat::Hex
    } else {
        ObjectFormat::Binary
    };
    let object = args
        .output
        .clone()
        .unwrap_or_else(|| args.source.with_extension(format.extension()));
    let symbols = args.source.with_extension("sym");
    tracing::info!("writing {} and {}", object.display(), symbols.display());

    let written = write_file(&symbols, |out| output::write_symbols(out, &assembly.symbols))
        .and_then(|()| {
            write_file(&object, |out| {
                output::write_object(out, &assembly.words, format)
            })
        });
    if let Err(kind) = written {
        // never leave half written output behind
        for path in [&object, &symbols] {
            if let Err(e) = fs::remove_file(path) {
                tracing::debug!("removing {}: {e}", path.display());
            }
        }
        return Err(vec![Diagnostic::new(0, kind)]);
    }
    Ok(())
}

fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), ErrorKind> {
    let file = File::create(path).map_err(|e| ErrorKind::OpenWrite {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut out = BufWriter::new(file);
    write(&mut out)
        .and_then(|()| out.flush())
        .map_err(|e| ErrorKind::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}
