use stackharv_core::io::IoEvent;
use stackharv_core::isa::{Instr, Opcode};
use stackharv_core::runner::run_machine;

fn run_traced(
    code: Vec<Instr>,
    schedule: &[IoEvent],
    ticks: u64,
) -> (std::collections::BTreeMap<u32, Vec<u32>>, String) {
    let mut trace = Vec::new();
    let out = run_machine(code, schedule, 16, ticks, Some(&mut trace)).unwrap();
    (out, String::from_utf8(trace).unwrap())
}

#[test]
fn test_trace_starts_at_tick_zero_with_reset_state() {
    let (_, trace) = run_traced(vec![Instr::op(Opcode::Halt)], &[], 100);
    let lines: Vec<&str> = trace.lines().collect();
    assert_eq!(lines.len(), 3); // fetch, latch, exec
    assert_eq!(
        lines[0],
        "t=0 pc=0 phase=FETCH_IR T=0 S=0 AR=0 zero=1 sign=0 in_isr=0"
    );
    assert_eq!(
        lines[1],
        "t=1 pc=0 phase=LATCH_PC T=0 S=0 AR=0 zero=1 sign=0 in_isr=0"
    );
    assert_eq!(
        lines[2],
        "t=2 pc=1 phase=EXEC T=0 S=0 AR=0 zero=1 sign=0 in_isr=0"
    );
}

#[test]
fn test_trace_shows_stack_mirrors() {
    let code = vec![
        Instr::new(Opcode::Pushi, 7),
        Instr::new(Opcode::Pushi, 9),
        Instr::op(Opcode::Halt),
    ];
    let (_, trace) = run_traced(code, &[], 100);
    let lines: Vec<&str> = trace.lines().collect();
    // after both pushes: T is the top, S the second
    assert_eq!(
        lines[6],
        "t=6 pc=2 phase=FETCH_IR T=9 S=7 AR=0 zero=0 sign=0 in_isr=0"
    );
}

#[test]
fn test_tick_limit_stops_nonhalting_program() {
    let (out, trace) = run_traced(vec![Instr::new(Opcode::Jmp, 0)], &[], 10);
    assert!(out.is_empty());
    assert_eq!(trace.lines().count(), 10);
}

#[test]
fn test_outputs_survive_tick_limit() {
    // push and emit one value, then spin
    let code = vec![
        Instr::new(Opcode::Pushi, 5),
        Instr::new(Opcode::Out, 2),
        Instr::new(Opcode::Jmp, 2),
    ];
    let out = run_machine(code, &[], 16, 50, None).unwrap();
    assert_eq!(out.get(&2), Some(&vec![5]));
}

#[test]
fn test_same_inputs_give_identical_runs() {
    let code = vec![
        Instr::new(Opcode::In, 1),
        Instr::new(Opcode::Out, 1),
        Instr::op(Opcode::Halt),
    ];
    let schedule = [IoEvent {
        tick: 0,
        port: 1,
        value: 65,
    }];
    let a = run_traced(code.clone(), &schedule, 1000);
    let b = run_traced(code, &schedule, 1000);
    assert_eq!(a.0, b.0);
    assert_eq!(a.1, b.1);
}
