//! Machine runner CLI: execute a binary against a scheduled I/O
//! environment and dump the port outputs.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stackharv_core::isa::decode;
use stackharv_core::runner::run_machine;
use stackharv_frontend::output::format_outputs;
use stackharv_frontend::schedule::parse_schedule;

#[derive(Parser)]
#[command(name = "stackharv", about = "Run a stackharv binary")]
struct Args {
    /// Program binary
    program: PathBuf,
    /// Text schedule file: one `tick port value` triple per line
    #[arg(long)]
    schedule: Option<PathBuf>,
    /// Data memory size in words
    #[arg(long = "data-words", default_value_t = 1024)]
    data_words: usize,
    /// Tick limit
    #[arg(long = "ticks", default_value_t = 100_000)]
    ticks: u64,
    /// Dump a per-tick trace
    #[arg(long)]
    trace: bool,
    /// Write the trace to a file instead of stdout
    #[arg(long = "trace-file", value_name = "FILE")]
    trace_file: Option<PathBuf>,
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
    let blob = fs::read(&args.program)?;
    let code = decode(&blob)?;
    let schedule = match &args.schedule {
        Some(path) => parse_schedule(path)?,
        None => Vec::new(),
    };

    let out = if args.trace {
        match &args.trace_file {
            Some(path) => {
                let mut w = io::BufWriter::new(fs::File::create(path)?);
                let out =
                    run_machine(code, &schedule, args.data_words, args.ticks, Some(&mut w))?;
                w.flush()?;
                out
            }
            None => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                run_machine(code, &schedule, args.data_words, args.ticks, Some(&mut lock))?
            }
        }
    } else {
        run_machine(code, &schedule, args.data_words, args.ticks, None)?
    };

    print!("{}", format_outputs(&out));
    Ok(())
}
