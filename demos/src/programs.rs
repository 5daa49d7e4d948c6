//! Program builders for the demos.

use sparq_vm::{Block, Program};

/// Register holding the packed measurement of a demo.
pub const RESULT_REGISTER: u64 = 0;

/// A Bell pair on qubits 0 and 1.
///
/// The pair is dumped before measurement, then both qubits are measured
/// into [`RESULT_REGISTER`] and released.
pub fn bell() -> Program {
    Program::new("main").block(
        Block::new("main")
            .alloc(0)
            .alloc(1)
            .gate("H", 0)
            .gate_with("X", &[], 1, &[0])
            .dump(&[0, 1])
            .measure(&[0, 1], RESULT_REGISTER)
            .free(0)
            .free(1),
    )
}

/// Teleport `RY(theta)|0⟩` from qubit 0 to qubit 2.
///
/// Measurement outcomes land in registers 1 (qubit 0) and 2 (qubit 1);
/// the corrections are applied in separate blocks selected by branching on
/// them. Qubit 2 is dumped before it is measured into [`RESULT_REGISTER`].
pub fn teleport(theta: f64) -> Program {
    Program::new("prepare")
        .block(
            Block::new("prepare")
                .alloc(0)
                .alloc(1)
                .alloc(2)
                .gate_with("RY", &[theta], 0, &[])
                .gate("H", 1)
                .gate_with("X", &[], 2, &[1])
                .gate_with("X", &[], 1, &[0])
                .gate("H", 0)
                .measure(&[0], 1)
                .measure(&[1], 2)
                .branch(2, "fix_x", "check_z"),
        )
        .block(Block::new("fix_x").gate("X", 2).jump("check_z"))
        .block(Block::new("check_z").branch(1, "fix_z", "done"))
        .block(Block::new("fix_z").gate("Z", 2).jump("done"))
        .block(
            Block::new("done")
                .dump(&[2])
                .measure(&[2], RESULT_REGISTER)
                .free(0)
                .free(1)
                .free(2),
        )
}

/// Encode `value` on `width` qubits, add `offset` with the `add` plugin and
/// measure the sum into [`RESULT_REGISTER`].
///
/// Qubit 0 carries the most significant bit. With `superpose` set the least
/// significant qubit is put through `H` first, so two sums come out.
pub fn adder(width: u64, value: u64, offset: i64, superpose: bool) -> Program {
    let qubits: Vec<u64> = (0..width).collect();
    let mut block = Block::new("main");
    for &q in &qubits {
        block = block.alloc(q);
    }
    for (pos, &q) in qubits.iter().enumerate() {
        let shift = width - 1 - pos as u64;
        if shift < 64 && (value >> shift) & 1 == 1 {
            block = block.gate("X", q);
        }
    }
    if superpose {
        if let Some(&lsb) = qubits.last() {
            block = block.gate("H", lsb);
        }
    }
    block = block
        .plugin("add", &qubits, &offset.to_string(), false, &[])
        .measure(&qubits, RESULT_REGISTER);
    for &q in &qubits {
        block = block.free(q);
    }
    Program::new("main").block(block)
}
