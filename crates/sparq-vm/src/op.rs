//! Compiled instruction set.
//!
//! Every name in the instruction tree is resolved to a typed payload here,
//! so execution is a plain `match` over [`Op`].

use sparq_sim::{QubitId, RegisterId};
use sparq_state::Gate;
use std::fmt;

/// Index of a compiled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub usize);

/// Two-register classical operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Add,
    Sub,
    Mul,
    Div,
    Shl,
    Shr,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    /// Parse an operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            "and" => BinaryOp::And,
            "or" => BinaryOp::Or,
            "xor" => BinaryOp::Xor,
            _ => return None,
        };
        Some(op)
    }

    /// The operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
        }
    }

    /// Evaluate `lhs op rhs`.
    ///
    /// Comparisons yield 1 or 0. Addition, subtraction and multiplication
    /// wrap. Division truncates toward zero. `>>` is arithmetic.
    pub fn apply(self, lhs: i64, rhs: i64) -> Result<i64, &'static str> {
        let value = match self {
            BinaryOp::Eq => i64::from(lhs == rhs),
            BinaryOp::Ne => i64::from(lhs != rhs),
            BinaryOp::Gt => i64::from(lhs > rhs),
            BinaryOp::Ge => i64::from(lhs >= rhs),
            BinaryOp::Lt => i64::from(lhs < rhs),
            BinaryOp::Le => i64::from(lhs <= rhs),
            BinaryOp::Add => lhs.wrapping_add(rhs),
            BinaryOp::Sub => lhs.wrapping_sub(rhs),
            BinaryOp::Mul => lhs.wrapping_mul(rhs),
            BinaryOp::Div => {
                if rhs == 0 {
                    return Err("division by zero");
                }
                lhs.checked_div(rhs).ok_or("division overflow")?
            }
            BinaryOp::Shl => lhs.checked_shl(shift_amount(rhs)?).ok_or(SHIFT_RANGE)?,
            BinaryOp::Shr => lhs.checked_shr(shift_amount(rhs)?).ok_or(SHIFT_RANGE)?,
            BinaryOp::And => lhs & rhs,
            BinaryOp::Or => lhs | rhs,
            BinaryOp::Xor => lhs ^ rhs,
        };
        Ok(value)
    }
}

const SHIFT_RANGE: &str = "shift amount outside 0..64";

fn shift_amount(rhs: i64) -> Result<u32, &'static str> {
    u32::try_from(rhs).map_err(|_| SHIFT_RANGE)
}

/// One-register classical operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Wrapping negation.
    Neg,
    /// Bitwise complement.
    Not,
}

impl UnaryOp {
    /// Parse an operator name.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "neg" | "-" => Some(UnaryOp::Neg),
            "not" | "~" => Some(UnaryOp::Not),
            _ => None,
        }
    }

    /// The operator name.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Not => "not",
        }
    }

    /// Evaluate `op value`.
    pub fn apply(self, value: i64) -> i64 {
        match self {
            UnaryOp::Neg => value.wrapping_neg(),
            UnaryOp::Not => !value,
        }
    }
}

/// A resolved effect against the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Alloc {
        qubit: QubitId,
        dirty: bool,
    },
    Free {
        qubit: QubitId,
        dirty: bool,
    },
    Gate {
        gate: Gate,
        target: QubitId,
        ctrl: Vec<QubitId>,
    },
    /// Measure in order; the first qubit lands in the most significant bit.
    Measure {
        qubits: Vec<QubitId>,
        register: RegisterId,
    },
    Dump {
        qubits: Vec<QubitId>,
    },
    /// Resolved by name at execution time.
    Plugin {
        name: String,
        targets: Vec<QubitId>,
        args: String,
        inverse: bool,
        ctrl: Vec<QubitId>,
    },
    Const {
        register: RegisterId,
        value: i64,
    },
    Move {
        dst: RegisterId,
        src: RegisterId,
    },
    Binary {
        op: BinaryOp,
        dst: RegisterId,
        lhs: RegisterId,
        rhs: RegisterId,
    },
    Unary {
        op: UnaryOp,
        dst: RegisterId,
        src: RegisterId,
    },
}

/// Compiled successor selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Successor {
    Jump(BlockId),
    Branch {
        register: RegisterId,
        then: BlockId,
        otherwise: BlockId,
    },
    End,
}

/// A block after name resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledBlock {
    /// Source label, kept for diagnostics.
    pub label: String,
    /// Effects in execution order.
    pub ops: Vec<Op>,
    /// Next-block selector.
    pub successor: Successor,
}

/// The compiled block graph.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProgram {
    /// All blocks; [`BlockId`] indexes into this list.
    pub blocks: Vec<CompiledBlock>,
    /// Block execution starts at.
    pub entry: BlockId,
    /// The terminal block.
    pub end: BlockId,
}

impl CompiledProgram {
    /// Block `id`.
    pub fn block(&self, id: BlockId) -> &CompiledBlock {
        &self.blocks[id.0]
    }

    /// Block with `label`, if any.
    pub fn find(&self, label: &str) -> Option<BlockId> {
        self.blocks
            .iter()
            .position(|block| block.label == label)
            .map(BlockId)
    }
}

struct QubitList<'a>(&'a [QubitId]);

impl fmt::Display for QubitList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, qubit) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{qubit}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Alloc { qubit, dirty } => {
                write!(f, "ALLOC {qubit}{}", if *dirty { " dirty" } else { "" })
            }
            Op::Free { qubit, dirty } => {
                write!(f, "FREE {qubit}{}", if *dirty { " dirty" } else { "" })
            }
            Op::Gate { gate, target, ctrl } => {
                if ctrl.is_empty() {
                    write!(f, "{gate} {target}")
                } else {
                    write!(f, "{gate}[ctrl={}] {target}", QubitList(ctrl))
                }
            }
            Op::Measure { qubits, register } => {
                write!(f, "MEASURE {} -> {register}", QubitList(qubits))
            }
            Op::Dump { qubits } => write!(f, "DUMP {}", QubitList(qubits)),
            Op::Plugin {
                name,
                targets,
                args,
                inverse,
                ctrl,
            } => {
                f.write_str("PLUGIN")?;
                if !ctrl.is_empty() {
                    write!(f, "[ctrl={}]", QubitList(ctrl))?;
                }
                if *inverse {
                    f.write_str("[adj]")?;
                }
                write!(f, " \"{name}\" {} ({args})", QubitList(targets))
            }
            Op::Const { register, value } => write!(f, "SET {register}, {value}"),
            Op::Move { dst, src } => write!(f, "MOVE {dst}, {src}"),
            Op::Binary { op, dst, lhs, rhs } => {
                write!(f, "{dst} = {lhs} {} {rhs}", op.symbol())
            }
            Op::Unary { op, dst, src } => write!(f, "{dst} = {} {src}", op.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_round_trip() {
        for symbol in [
            "==", "!=", ">", ">=", "<", "<=", "+", "-", "*", "/", "<<", ">>", "and", "or", "xor",
        ] {
            let op = BinaryOp::from_symbol(symbol).unwrap();
            assert_eq!(op.symbol(), symbol);
        }
        assert_eq!(BinaryOp::from_symbol("%"), None);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(BinaryOp::Lt.apply(2, 3), Ok(1));
        assert_eq!(BinaryOp::Ge.apply(2, 3), Ok(0));
        assert_eq!(BinaryOp::Ne.apply(-1, -1), Ok(0));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(BinaryOp::Add.apply(5, 3), Ok(8));
        assert_eq!(BinaryOp::Add.apply(i64::MAX, 1), Ok(i64::MIN));
        assert_eq!(BinaryOp::Div.apply(-7, 2), Ok(-3));
        assert_eq!(BinaryOp::Div.apply(1, 0), Err("division by zero"));
        assert!(BinaryOp::Div.apply(i64::MIN, -1).is_err());
    }

    #[test]
    fn test_shifts() {
        assert_eq!(BinaryOp::Shl.apply(1, 4), Ok(16));
        assert_eq!(BinaryOp::Shr.apply(-16, 2), Ok(-4));
        assert!(BinaryOp::Shl.apply(1, 64).is_err());
        assert!(BinaryOp::Shr.apply(1, -1).is_err());
    }

    #[test]
    fn test_bitwise_and_unary() {
        assert_eq!(BinaryOp::And.apply(0b1100, 0b1010), Ok(0b1000));
        assert_eq!(BinaryOp::Or.apply(0b1100, 0b1010), Ok(0b1110));
        assert_eq!(BinaryOp::Xor.apply(0b1100, 0b1010), Ok(0b0110));
        assert_eq!(UnaryOp::Neg.apply(i64::MIN), i64::MIN);
        assert_eq!(UnaryOp::Not.apply(0), -1);
    }

    #[test]
    fn test_display() {
        let op = Op::Gate {
            gate: Gate::Rz(0.5),
            target: QubitId(1),
            ctrl: vec![QubitId(0)],
        };
        assert_eq!(op.to_string(), "RZ(0.5)[ctrl=q0] q1");

        let op = Op::Binary {
            op: BinaryOp::Add,
            dst: RegisterId(2),
            lhs: RegisterId(0),
            rhs: RegisterId(1),
        };
        assert_eq!(op.to_string(), "r2 = r0 + r1");
    }
}
