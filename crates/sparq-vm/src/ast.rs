//! Instruction tree handed over by a front end.
//!
//! A [`Program`] is a set of labeled [`Block`]s. Each block is a straight
//! list of [`Statement`]s followed by one [`BlockEnd`] that picks the next
//! block. Names (gates, classical operators) are still strings here; they
//! are resolved once by [`compile`](crate::compile::compile).
//!
//! The tree is serde-deserializable, so a front end can deliver it as JSON:
//!
//! ```json
//! {
//!   "entry": "start",
//!   "blocks": [
//!     {
//!       "label": "start",
//!       "statements": [
//!         { "kind": "alloc", "qubit": 0 },
//!         { "kind": "gate", "name": "H", "target": 0 },
//!         { "kind": "measure", "qubits": [0], "register": 0 }
//!       ],
//!       "end": "end"
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::VmResult;

/// A complete program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Label of the first block to execute.
    pub entry: String,
    /// All blocks, in any order.
    pub blocks: Vec<Block>,
}

impl Program {
    /// An empty program starting at `entry`.
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            blocks: Vec::new(),
        }
    }

    /// Decode a program from JSON.
    pub fn from_json(text: &str) -> VmResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode the program as JSON.
    pub fn to_json(&self) -> VmResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append a block.
    #[must_use]
    pub fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

/// A labeled straight-line block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique label.
    pub label: String,
    /// Effects, executed in order.
    #[serde(default)]
    pub statements: Vec<Statement>,
    /// How the next block is chosen.
    pub end: BlockEnd,
}

/// Successor selector of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockEnd {
    /// `JUMP label`
    Jump(String),
    /// `BRANCH rN ? then : otherwise`; a nonzero register selects `then`.
    Branch {
        /// Register tested against zero.
        register: u64,
        /// Taken when the register is nonzero.
        then: String,
        /// Taken when the register is zero.
        otherwise: String,
    },
    /// `END`: the terminal block. Execution stops after it.
    End,
}

/// One effect inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// `ALLOC q [dirty]`
    Alloc {
        qubit: u64,
        #[serde(default)]
        dirty: bool,
    },

    /// `FREE q [dirty]`
    Free {
        qubit: u64,
        #[serde(default)]
        dirty: bool,
    },

    /// `GATE[ctrl=...] name q [args...]`
    Gate {
        name: String,
        #[serde(default)]
        args: Vec<f64>,
        target: u64,
        #[serde(default)]
        ctrl: Vec<u64>,
    },

    /// `MEASURE qlist -> rN`
    Measure { qubits: Vec<u64>, register: u64 },

    /// `DUMP qlist`
    Dump { qubits: Vec<u64> },

    /// `PLUGIN[ctrl=...][adj] "name" qlist (args)`
    Plugin {
        name: String,
        qubits: Vec<u64>,
        #[serde(default)]
        args: String,
        #[serde(default)]
        adj: bool,
        #[serde(default)]
        ctrl: Vec<u64>,
    },

    /// `SET rN, const`
    Const { register: u64, value: i64 },

    /// `MOVE rN, rM`
    Move { dst: u64, src: u64 },

    /// `BINOP rN = rL op rR`
    Binary {
        op: String,
        dst: u64,
        lhs: u64,
        rhs: u64,
    },

    /// `UNOP rN = op rM`
    Unary { op: String, dst: u64, src: u64 },
}

impl Block {
    /// An empty terminal block. Use [`jump`](Self::jump) or
    /// [`branch`](Self::branch) to continue elsewhere instead.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            statements: Vec::new(),
            end: BlockEnd::End,
        }
    }

    fn push(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Allocate a fresh qubit.
    #[must_use]
    pub fn alloc(self, qubit: u64) -> Self {
        self.push(Statement::Alloc { qubit, dirty: false })
    }

    /// Allocate a qubit, reusing a dirty slot if one is available.
    #[must_use]
    pub fn alloc_dirty(self, qubit: u64) -> Self {
        self.push(Statement::Alloc { qubit, dirty: true })
    }

    /// Free a qubit, resetting it to |0⟩.
    #[must_use]
    pub fn free(self, qubit: u64) -> Self {
        self.push(Statement::Free { qubit, dirty: false })
    }

    /// Free a qubit without resetting it.
    #[must_use]
    pub fn free_dirty(self, qubit: u64) -> Self {
        self.push(Statement::Free { qubit, dirty: true })
    }

    /// Apply an uncontrolled gate without arguments.
    #[must_use]
    pub fn gate(self, name: &str, target: u64) -> Self {
        self.gate_with(name, &[], target, &[])
    }

    /// Apply a gate with angle arguments and controls.
    #[must_use]
    pub fn gate_with(self, name: &str, args: &[f64], target: u64, ctrl: &[u64]) -> Self {
        self.push(Statement::Gate {
            name: name.to_string(),
            args: args.to_vec(),
            target,
            ctrl: ctrl.to_vec(),
        })
    }

    /// Measure `qubits`, first qubit as the most significant bit.
    #[must_use]
    pub fn measure(self, qubits: &[u64], register: u64) -> Self {
        self.push(Statement::Measure {
            qubits: qubits.to_vec(),
            register,
        })
    }

    /// Record a dump of `qubits`.
    #[must_use]
    pub fn dump(self, qubits: &[u64]) -> Self {
        self.push(Statement::Dump {
            qubits: qubits.to_vec(),
        })
    }

    /// Call a plugin.
    #[must_use]
    pub fn plugin(self, name: &str, qubits: &[u64], args: &str, adj: bool, ctrl: &[u64]) -> Self {
        self.push(Statement::Plugin {
            name: name.to_string(),
            qubits: qubits.to_vec(),
            args: args.to_string(),
            adj,
            ctrl: ctrl.to_vec(),
        })
    }

    /// Load a constant into a register.
    #[must_use]
    pub fn set(self, register: u64, value: i64) -> Self {
        self.push(Statement::Const { register, value })
    }

    /// Copy a register.
    #[must_use]
    pub fn mov(self, dst: u64, src: u64) -> Self {
        self.push(Statement::Move { dst, src })
    }

    /// `dst = lhs op rhs`
    #[must_use]
    pub fn binary(self, op: &str, dst: u64, lhs: u64, rhs: u64) -> Self {
        self.push(Statement::Binary {
            op: op.to_string(),
            dst,
            lhs,
            rhs,
        })
    }

    /// `dst = op src`
    #[must_use]
    pub fn unary(self, op: &str, dst: u64, src: u64) -> Self {
        self.push(Statement::Unary {
            op: op.to_string(),
            dst,
            src,
        })
    }

    /// Continue at `label`.
    #[must_use]
    pub fn jump(mut self, label: impl Into<String>) -> Self {
        self.end = BlockEnd::Jump(label.into());
        self
    }

    /// Continue at `then` if `register` is nonzero, else at `otherwise`.
    #[must_use]
    pub fn branch(
        mut self,
        register: u64,
        then: impl Into<String>,
        otherwise: impl Into<String>,
    ) -> Self {
        self.end = BlockEnd::Branch {
            register,
            then: then.into(),
            otherwise: otherwise.into(),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let block = Block::new("main")
            .alloc(0)
            .gate("H", 0)
            .measure(&[0], 1)
            .jump("done");
        assert_eq!(block.statements.len(), 3);
        assert_eq!(block.end, BlockEnd::Jump("done".into()));
    }

    #[test]
    fn test_decode_json() {
        let text = r#"{
            "entry": "start",
            "blocks": [
                {
                    "label": "start",
                    "statements": [
                        { "kind": "alloc", "qubit": 0 },
                        { "kind": "gate", "name": "RZ", "args": [0.5], "target": 0 },
                        { "kind": "binary", "op": "+", "dst": 2, "lhs": 0, "rhs": 1 }
                    ],
                    "end": { "branch": { "register": 2, "then": "start", "otherwise": "stop" } }
                },
                { "label": "stop", "end": "end" }
            ]
        }"#;
        let program = Program::from_json(text).unwrap();
        assert_eq!(program.blocks.len(), 2);
        assert_eq!(
            program.blocks[0].statements[0],
            Statement::Alloc {
                qubit: 0,
                dirty: false
            }
        );
        assert!(matches!(program.blocks[0].end, BlockEnd::Branch { register: 2, .. }));
        assert!(program.blocks[1].statements.is_empty());
    }

    #[test]
    fn test_json_preserves_program() {
        let program = Program::new("a")
            .block(Block::new("a").set(0, 5).plugin("add", &[0, 1], "3", true, &[2]).jump("b"))
            .block(Block::new("b").dump(&[0, 1]));
        let text = program.to_json().unwrap();
        assert_eq!(Program::from_json(&text).unwrap(), program);
    }
}
