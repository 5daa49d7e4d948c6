//! Resolution of an instruction tree into the compiled block graph.

use rustc_hash::FxHashMap;
use sparq_sim::{QubitId, RegisterId};
use sparq_state::Gate;
use tracing::debug;

use crate::ast::{BlockEnd, Program, Statement};
use crate::error::{VmError, VmResult};
use crate::op::{BinaryOp, BlockId, CompiledBlock, CompiledProgram, Op, Successor, UnaryOp};

/// Measured bits a single register can hold.
const REGISTER_BITS: usize = i64::BITS as usize;

/// Compile `program`, resolving every label and operation name.
///
/// Plugin names are left for execution time, since resolving them may load
/// a library from the search path.
pub fn compile(program: &Program) -> VmResult<CompiledProgram> {
    let mut labels: FxHashMap<&str, BlockId> = FxHashMap::default();
    for (i, block) in program.blocks.iter().enumerate() {
        if labels.insert(block.label.as_str(), BlockId(i)).is_some() {
            return Err(VmError::DuplicateLabel(block.label.clone()));
        }
    }

    let entry = *labels
        .get(program.entry.as_str())
        .ok_or_else(|| VmError::MissingEntry(program.entry.clone()))?;

    let mut end: Option<BlockId> = None;
    let mut blocks = Vec::with_capacity(program.blocks.len());

    for (i, block) in program.blocks.iter().enumerate() {
        let label = block.label.as_str();
        let lookup = |target: &str| {
            labels
                .get(target)
                .copied()
                .ok_or_else(|| VmError::UndefinedLabel {
                    label: label.to_string(),
                    target: target.to_string(),
                })
        };

        let successor = match &block.end {
            BlockEnd::Jump(target) => Successor::Jump(lookup(target)?),
            BlockEnd::Branch {
                register,
                then,
                otherwise,
            } => Successor::Branch {
                register: RegisterId(*register),
                then: lookup(then)?,
                otherwise: lookup(otherwise)?,
            },
            BlockEnd::End => {
                if let Some(first) = end {
                    return Err(VmError::DuplicateEnd {
                        first: program.blocks[first.0].label.clone(),
                        second: block.label.clone(),
                    });
                }
                end = Some(BlockId(i));
                Successor::End
            }
        };

        let ops = block
            .statements
            .iter()
            .map(|statement| compile_statement(label, statement))
            .collect::<VmResult<Vec<_>>>()?;

        blocks.push(CompiledBlock {
            label: block.label.clone(),
            ops,
            successor,
        });
    }

    let end = end.ok_or(VmError::MissingEnd)?;
    debug!(
        "Compiled {} blocks (entry '{}', end '{}')",
        blocks.len(),
        program.entry,
        blocks[end.0].label
    );

    Ok(CompiledProgram { blocks, entry, end })
}

fn compile_statement(label: &str, statement: &Statement) -> VmResult<Op> {
    let op = match statement {
        Statement::Alloc { qubit, dirty } => Op::Alloc {
            qubit: QubitId(*qubit),
            dirty: *dirty,
        },
        Statement::Free { qubit, dirty } => Op::Free {
            qubit: QubitId(*qubit),
            dirty: *dirty,
        },
        Statement::Gate {
            name,
            args,
            target,
            ctrl,
        } => Op::Gate {
            gate: resolve_gate(label, name, args)?,
            target: QubitId(*target),
            ctrl: resolve_controls(label, name, *target, ctrl)?,
        },
        Statement::Measure { qubits, register } => {
            if qubits.len() > REGISTER_BITS {
                return Err(VmError::MeasureTooWide {
                    label: label.to_string(),
                    count: qubits.len(),
                });
            }
            Op::Measure {
                qubits: qubits.iter().copied().map(QubitId).collect(),
                register: RegisterId(*register),
            }
        }
        Statement::Dump { qubits } => Op::Dump {
            qubits: qubits.iter().copied().map(QubitId).collect(),
        },
        Statement::Plugin {
            name,
            qubits,
            args,
            adj,
            ctrl,
        } => Op::Plugin {
            name: name.clone(),
            targets: qubits.iter().copied().map(QubitId).collect(),
            args: args.clone(),
            inverse: *adj,
            ctrl: ctrl.iter().copied().map(QubitId).collect(),
        },
        Statement::Const { register, value } => Op::Const {
            register: RegisterId(*register),
            value: *value,
        },
        Statement::Move { dst, src } => Op::Move {
            dst: RegisterId(*dst),
            src: RegisterId(*src),
        },
        Statement::Binary { op, dst, lhs, rhs } => Op::Binary {
            op: BinaryOp::from_symbol(op).ok_or_else(|| unknown(label, op))?,
            dst: RegisterId(*dst),
            lhs: RegisterId(*lhs),
            rhs: RegisterId(*rhs),
        },
        Statement::Unary { op, dst, src } => Op::Unary {
            op: UnaryOp::from_symbol(op).ok_or_else(|| unknown(label, op))?,
            dst: RegisterId(*dst),
            src: RegisterId(*src),
        },
    };
    Ok(op)
}

fn resolve_gate(label: &str, name: &str, args: &[f64]) -> VmResult<Gate> {
    let upper = name.to_ascii_uppercase();
    let expected = Gate::arity(&upper).ok_or_else(|| unknown(label, name))?;
    Gate::from_name(&upper, args).ok_or_else(|| VmError::ArgumentCount {
        label: label.to_string(),
        name: upper.clone(),
        expected,
        got: args.len(),
    })
}

fn resolve_controls(label: &str, name: &str, target: u64, ctrl: &[u64]) -> VmResult<Vec<QubitId>> {
    if ctrl.contains(&target) {
        return Err(VmError::ControlIsTarget {
            label: label.to_string(),
            name: name.to_string(),
            qubit: QubitId(target),
        });
    }
    Ok(ctrl.iter().copied().map(QubitId).collect())
}

fn unknown(label: &str, name: &str) -> VmError {
    VmError::UnknownOperation {
        label: label.to_string(),
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Block;

    fn single(block: Block) -> Program {
        Program::new(block.label.clone()).block(block)
    }

    #[test]
    fn test_compile_resolves_labels() {
        let program = Program::new("a")
            .block(Block::new("a").set(0, 1).branch(0, "b", "c"))
            .block(Block::new("b").jump("c"))
            .block(Block::new("c"));
        let compiled = compile(&program).unwrap();

        assert_eq!(compiled.entry, BlockId(0));
        assert_eq!(compiled.end, BlockId(2));
        assert_eq!(
            compiled.block(BlockId(0)).successor,
            Successor::Branch {
                register: RegisterId(0),
                then: BlockId(1),
                otherwise: BlockId(2),
            }
        );
        assert_eq!(compiled.find("b"), Some(BlockId(1)));
    }

    #[test]
    fn test_gate_names_are_case_insensitive() {
        let compiled = compile(&single(Block::new("m").gate_with("rz", &[0.5], 0, &[1]))).unwrap();
        assert_eq!(
            compiled.blocks[0].ops[0],
            Op::Gate {
                gate: Gate::Rz(0.5),
                target: QubitId(0),
                ctrl: vec![QubitId(1)],
            }
        );
    }

    #[test]
    fn test_label_errors() {
        let dup = Program::new("a")
            .block(Block::new("a").jump("a"))
            .block(Block::new("a"));
        assert!(matches!(compile(&dup), Err(VmError::DuplicateLabel(l)) if l == "a"));

        let undefined = single(Block::new("a").jump("nowhere"));
        assert!(matches!(
            compile(&undefined),
            Err(VmError::UndefinedLabel { target, .. }) if target == "nowhere"
        ));

        let no_entry = Program::new("x").block(Block::new("a"));
        assert!(matches!(compile(&no_entry), Err(VmError::MissingEntry(_))));

        let no_end = single(Block::new("a").jump("a"));
        assert!(matches!(compile(&no_end), Err(VmError::MissingEnd)));

        let two_ends = Program::new("a")
            .block(Block::new("a"))
            .block(Block::new("b"));
        assert!(matches!(compile(&two_ends), Err(VmError::DuplicateEnd { .. })));
    }

    #[test]
    fn test_operation_errors() {
        let bad_gate = single(Block::new("m").gate("CCX", 0));
        assert!(matches!(
            compile(&bad_gate),
            Err(VmError::UnknownOperation { name, .. }) if name == "CCX"
        ));

        let bad_args = single(Block::new("m").gate_with("U3", &[0.1], 0, &[]));
        assert!(matches!(
            compile(&bad_args),
            Err(VmError::ArgumentCount { expected: 3, got: 1, .. })
        ));

        let self_control = single(Block::new("m").gate_with("X", &[], 2, &[1, 2]));
        assert!(matches!(compile(&self_control), Err(VmError::ControlIsTarget { .. })));

        let bad_binop = single(Block::new("m").binary("%", 0, 1, 2));
        assert!(matches!(compile(&bad_binop), Err(VmError::UnknownOperation { .. })));

        let bad_unop = single(Block::new("m").unary("sqrt", 0, 1));
        assert!(matches!(compile(&bad_unop), Err(VmError::UnknownOperation { .. })));

        let qubits: Vec<u64> = (0..65).collect();
        let wide = single(Block::new("m").measure(&qubits, 0));
        assert!(matches!(compile(&wide), Err(VmError::MeasureTooWide { count: 65, .. })));
    }
}
