use stackharv_core::isa::{Instr, NUM_VECTORS, Opcode};
use stackharv_translator::codegen::CodegenError;
use stackharv_translator::{TranslateError, translate};

fn i(opcode: Opcode, arg: i32) -> Instr {
    Instr::new(opcode, arg)
}

fn o(opcode: Opcode) -> Instr {
    Instr::op(opcode)
}

#[test]
fn test_vector_table_leads_the_image() {
    let code = translate("func main() { }").unwrap();
    assert_eq!(code.len(), NUM_VECTORS + 1);
    for vector in &code[..NUM_VECTORS] {
        assert_eq!(vector.opcode, Opcode::Jmp);
    }
    // reset vector targets main, just past the table
    assert_eq!(code[0].arg, NUM_VECTORS as i32);
    // unused vectors keep the default target
    for vector in &code[1..NUM_VECTORS] {
        assert_eq!(vector.arg, 0);
    }
    assert_eq!(code[NUM_VECTORS], o(Opcode::Halt));
}

#[test]
fn test_function_terminators() {
    let code = translate("func helper() { } func irq2() { } func main() { }").unwrap();
    assert_eq!(code[8], o(Opcode::Ret));
    assert_eq!(code[9], o(Opcode::Iret));
    assert_eq!(code[10], o(Opcode::Halt));
    assert_eq!(code[0].arg, 10); // main
    assert_eq!(code[2].arg, 9); // irq2
    assert_eq!(code[1].arg, 0); // no irq1
}

#[test]
fn test_while_loop_shape() {
    let code = translate("func main() { while (true) { } }").unwrap();
    assert_eq!(
        &code[8..],
        &[
            i(Opcode::Pushi, 1),
            i(Opcode::Jz, 11),
            i(Opcode::Jmp, 8),
            o(Opcode::Halt),
        ]
    );
}

#[test]
fn test_break_jumps_past_loop_end() {
    let code = translate("func main() { while (true) { break; } }").unwrap();
    assert_eq!(
        &code[8..],
        &[
            i(Opcode::Pushi, 1),
            i(Opcode::Jz, 12),
            i(Opcode::Jmp, 12), // break
            i(Opcode::Jmp, 8),  // loop back-edge
            o(Opcode::Halt),
        ]
    );
}

#[test]
fn test_equality_materializes_boolean() {
    let code = translate("func main() { if (x == 1) { } }").unwrap();
    assert_eq!(
        &code[8..],
        &[
            i(Opcode::Pushi, 0), // &x
            o(Opcode::Load),
            i(Opcode::Pushi, 1),
            o(Opcode::Sub),
            i(Opcode::Jz, 15),  // equal: push 1
            i(Opcode::Pushi, 0),
            i(Opcode::Jmp, 16),
            i(Opcode::Pushi, 1),
            i(Opcode::Jz, 17), // the if itself
            o(Opcode::Halt),
        ]
    );
}

#[test]
fn test_all_jumps_relocated_past_vector_table() {
    let src = r#"
        func main() {
            int n;
            n = readInt();
            while (n <= 100) {
                if (n == 7) {
                    break;
                }
                n = n + 1;
            }
            printInt(n);
        }
    "#;
    let code = translate(src).unwrap();
    for ins in &code[NUM_VECTORS..] {
        if matches!(ins.opcode, Opcode::Jmp | Opcode::Jz | Opcode::Call) {
            assert!(
                ins.arg >= NUM_VECTORS as i32,
                "jump into the vector table: {ins:?}"
            );
        }
    }
}

#[test]
fn test_instruction_args_fit_24_bits() {
    let src = r#"
        func main() {
            string s;
            s = readString();
            print("some text");
            print(s);
            printInt(16000000);
        }
    "#;
    let code = translate(src).unwrap();
    for ins in &code {
        let stored = ins.arg as u32 & 0x00FF_FFFF;
        if ins.opcode != Opcode::Pushi {
            assert_eq!(ins.arg as u32, stored);
        }
        assert!(ins.opcode as u32 <= 0xFF);
    }
}

#[test]
fn test_long_declarations_take_two_words() {
    let src = "func main() { long a; long b; a = readLong(); b = readLong(); }";
    let code = translate(src).unwrap();
    let pushed: Vec<i32> = code[NUM_VECTORS..]
        .iter()
        .filter(|ins| ins.opcode == Opcode::Pushi)
        .map(|ins| ins.arg)
        .collect();
    // lo/hi store addresses: a at 0/1, b at 2/3 with no overlap
    assert_eq!(pushed, vec![0, 1, 2, 3]);
}

#[test]
fn test_long_add_reloads_and_propagates_carry() {
    let src = r#"
        func main() {
            long a;
            long b;
            long c;
            a = readLong();
            b = readLong();
            c = a + b;
        }
    "#;
    let code = translate(src).unwrap();
    // one conditional skip and its join jump, plus LE for the carry test
    let le_count = code.iter().filter(|ins| ins.opcode == Opcode::Le).count();
    assert_eq!(le_count, 1);
    // the long add never uses SWAP; operands come back from memory
    assert!(!code.iter().any(|ins| ins.opcode == Opcode::Swap));
}

#[test]
fn test_string_literal_is_initialized_at_runtime() {
    let code = translate(r#"func main() { print("hi"); }"#).unwrap();
    assert_eq!(
        &code[8..17],
        &[
            i(Opcode::Pushi, 104), // 'h'
            i(Opcode::Pushi, 0),
            o(Opcode::Store),
            i(Opcode::Pushi, 105), // 'i'
            i(Opcode::Pushi, 1),
            o(Opcode::Store),
            i(Opcode::Pushi, 0), // NUL
            i(Opcode::Pushi, 2),
            o(Opcode::Store),
        ]
    );
}

#[test]
fn test_string_literal_is_allocated_once() {
    let once = translate(r#"func main() { print("abc"); }"#).unwrap();
    let twice = translate(r#"func main() { print("abc"); print("abc"); }"#).unwrap();
    let stores = |code: &[Instr]| code.iter().filter(|x| x.opcode == Opcode::Store).count();
    // the second print adds no new literal-init stores, only the print
    // loop's pointer update
    assert!(stores(&twice) < 2 * stores(&once));
}

#[test]
fn test_break_outside_loop_is_rejected() {
    let err = translate("func main() { break; }").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Codegen(CodegenError::BreakOutsideLoop)
    ));
}

#[test]
fn test_unknown_calls_are_rejected() {
    let err = translate("func main() { launch(); }").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Codegen(CodegenError::UnsupportedCallStmt(_))
    ));

    let err = translate("func main() { int x; x = nope(); }").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Codegen(CodegenError::UnsupportedCall(_))
    ));
}

#[test]
fn test_translation_is_deterministic() {
    let src = r#"
        func main() {
            int n;
            n = readInt();
            printInt(n * 2);
            print("done");
        }
    "#;
    assert_eq!(translate(src).unwrap(), translate(src).unwrap());
}
