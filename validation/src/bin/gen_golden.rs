//! Regenerate the golden artifact directories: for every scenario, the
//! source, schedule, binary, hex listing, trace, formatted output and a
//! `meta.json` sidecar.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use stackharv_validation::{DATA_WORDS, GoldenMeta, run_scenario, scenarios};

fn main() -> ExitCode {
    let out_dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "golden".to_string()),
    );
    for sc in scenarios() {
        let dir = out_dir.join(sc.name);
        if let Err(e) = generate(&sc, &dir) {
            eprintln!("error: {}: {e}", sc.name);
            return ExitCode::FAILURE;
        }
        println!("[golden] {} -> {}", sc.name, dir.display());
    }
    ExitCode::SUCCESS
}

fn generate(
    sc: &stackharv_validation::Scenario,
    dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let art = run_scenario(sc)?;
    fs::create_dir_all(dir)?;
    fs::write(dir.join("program.alg"), sc.source)?;
    if let Some(schedule) = sc.schedule {
        fs::write(dir.join("schedule.txt"), schedule)?;
    }
    fs::write(dir.join("program.bin"), &art.binary)?;
    fs::write(dir.join("program.hex"), &art.hex)?;
    fs::write(dir.join("trace.txt"), &art.trace)?;
    fs::write(dir.join("out.txt"), &art.formatted)?;
    let meta = GoldenMeta {
        name: sc.name.to_string(),
        ticks: sc.ticks,
        data_words: DATA_WORDS,
        schedule: sc.schedule.is_some(),
    };
    fs::write(dir.join("meta.json"), serde_json::to_string_pretty(&meta)?)?;
    Ok(())
}
