//! Golden-artifact harness: the end-to-end scenarios, the in-memory
//! compile-and-run helper, and the `meta.json` sidecar types.

use std::collections::BTreeMap;
use std::error::Error;

use serde::{Deserialize, Serialize};
use stackharv_core::isa::{Instr, decode, encode, to_hex};
use stackharv_core::runner::run_machine;
use stackharv_frontend::output::format_outputs;
use stackharv_frontend::schedule::parse_schedule_text;
use stackharv_translator::translate;

/// Data memory size used by every golden run.
pub const DATA_WORDS: usize = 1024;

/// One end-to-end scenario: ALG source, optional I/O schedule, tick
/// limit.
pub struct Scenario {
    pub name: &'static str,
    pub source: &'static str,
    pub schedule: Option<&'static str>,
    pub ticks: u64,
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "hello_world",
            source: include_str!("../../demos/hello_world.alg"),
            schedule: None,
            ticks: 2000,
        },
        Scenario {
            name: "cat",
            source: include_str!("../../demos/cat.alg"),
            schedule: Some(include_str!("../../demos/cat.input")),
            ticks: 600,
        },
        Scenario {
            name: "cat_trap",
            source: include_str!("../../demos/cat_trap.alg"),
            schedule: Some(include_str!("../../demos/cat_trap.input")),
            ticks: 400,
        },
        Scenario {
            name: "hello_user_name",
            source: include_str!("../../demos/hello_user_name.alg"),
            schedule: Some(include_str!("../../demos/hello_user_name.input")),
            ticks: 8000,
        },
        Scenario {
            name: "prob2",
            source: include_str!("../../demos/prob2.alg"),
            schedule: Some(include_str!("../../demos/prob2.input")),
            ticks: 4000,
        },
        Scenario {
            name: "double_precision",
            source: include_str!("../../demos/double_precision.alg"),
            schedule: Some(include_str!("../../demos/double_precision.input")),
            ticks: 5000,
        },
        Scenario {
            name: "sort",
            source: include_str!("../../demos/sort.alg"),
            schedule: Some(include_str!("../../demos/sort.input")),
            ticks: 20000,
        },
    ]
}

/// Sidecar describing how a golden directory was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenMeta {
    pub name: String,
    pub ticks: u64,
    pub data_words: usize,
    pub schedule: bool,
}

/// Everything one scenario run produces.
pub struct Artifacts {
    pub code: Vec<Instr>,
    pub binary: Vec<u8>,
    pub hex: String,
    pub trace: String,
    pub outputs: BTreeMap<u32, Vec<u32>>,
    pub formatted: String,
}

/// Compile and run one scenario entirely in memory, round-tripping the
/// binary through the decoder the way the runner CLI does.
pub fn run_scenario(sc: &Scenario) -> Result<Artifacts, Box<dyn Error>> {
    let code = translate(sc.source)?;
    let binary = encode(&code);
    let hex = to_hex(&code);
    let schedule = match sc.schedule {
        Some(text) => parse_schedule_text(text)?,
        None => Vec::new(),
    };
    let loaded = decode(&binary)?;
    let mut trace = Vec::new();
    let outputs = run_machine(loaded, &schedule, DATA_WORDS, sc.ticks, Some(&mut trace))?;
    let trace = String::from_utf8(trace)?;
    let formatted = format_outputs(&outputs);
    Ok(Artifacts {
        code,
        binary,
        hex,
        trace,
        outputs,
        formatted,
    })
}
