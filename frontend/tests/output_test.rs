use std::collections::BTreeMap;

use stackharv_frontend::output::format_outputs;

fn dump(entries: &[(u32, Vec<u32>)]) -> BTreeMap<u32, Vec<u32>> {
    entries.iter().cloned().collect()
}

#[test]
fn test_character_port_renders_as_text() {
    let out = dump(&[(1, vec![72, 105, 10])]);
    assert_eq!(format_outputs(&out), "CH| Hi\n\n");
}

#[test]
fn test_decimal_port_renders_signed() {
    let out = dump(&[(2, vec![5, 0xFFFF_FFFF])]);
    assert_eq!(format_outputs(&out), "D|  5 -1\n");
}

#[test]
fn test_long_port_pairs_low_then_high() {
    let out = dump(&[(3, vec![1, 2])]);
    // (2 << 32) | 1
    assert_eq!(format_outputs(&out), "L|  8589934593\n");
}

#[test]
fn test_long_port_odd_word_count_warns() {
    let out = dump(&[(3, vec![1, 2, 3])]);
    assert_eq!(format_outputs(&out), "L| (warn: odd words)\n");
}

#[test]
fn test_empty_dump_renders_nothing() {
    assert_eq!(format_outputs(&BTreeMap::new()), "");
    // empty queues are skipped too
    let out = dump(&[(1, vec![]), (2, vec![7])]);
    assert_eq!(format_outputs(&out), "D|  7\n");
}

#[test]
fn test_ports_render_in_order() {
    let out = dump(&[(3, vec![0, 0]), (1, vec![65]), (2, vec![1])]);
    assert_eq!(format_outputs(&out), "CH| A\nD|  1\nL|  0\n");
}
