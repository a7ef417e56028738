//! Display form of the port output queues.

use std::collections::BTreeMap;

use stackharv_core::isa::{PORT_CH, PORT_D, PORT_L};

/// Render the non-empty port output queues, one line each: CH as latin-1
/// text, D as signed 32-bit decimals, L as unsigned 64-bit values built
/// from adjacent low/high word pairs.
pub fn format_outputs(out: &BTreeMap<u32, Vec<u32>>) -> String {
    let mut lines = Vec::new();
    if let Some(ch) = out.get(&PORT_CH).filter(|v| !v.is_empty()) {
        let s: String = ch.iter().map(|&v| (v & 0xFF) as u8 as char).collect();
        lines.push(format!("CH| {s}"));
    }
    if let Some(d) = out.get(&PORT_D).filter(|v| !v.is_empty()) {
        let vals: Vec<String> = d.iter().map(|&v| (v as i32).to_string()).collect();
        lines.push(format!("D|  {}", vals.join(" ")));
    }
    if let Some(l) = out.get(&PORT_L).filter(|v| !v.is_empty()) {
        if l.len() % 2 != 0 {
            lines.push("L| (warn: odd words)".to_string());
        } else {
            let vals: Vec<String> = l
                .chunks_exact(2)
                .map(|pair| (((pair[1] as u64) << 32) | pair[0] as u64).to_string())
                .collect();
            lines.push(format!("L|  {}", vals.join(" ")));
        }
    }
    if lines.is_empty() {
        String::new()
    } else {
        lines.join("\n") + "\n"
    }
}
