//! ALG-to-binary translator CLI.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stackharv_core::isa::{encode, to_hex};
use stackharv_translator::translate;

#[derive(Parser)]
#[command(name = "algc", about = "Translate ALG source to a stackharv binary")]
struct Args {
    /// Input .alg source file
    source: PathBuf,
    /// Output binary file
    target: PathBuf,
    /// Also write a hex listing to this file
    #[arg(long = "hex", value_name = "FILE")]
    hexdump: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let src = fs::read_to_string(&args.source)?;
    let code = translate(&src)?;
    fs::write(&args.target, encode(&code))?;
    if let Some(hex_path) = &args.hexdump {
        fs::write(hex_path, to_hex(&code))?;
    }
    Ok(())
}
