//! Sparq instruction VM
//!
//! Executes a graph of labeled instruction blocks against a
//! [`Simulator`](sparq_sim::Simulator). A front end hands over an
//! [`ast::Program`]; [`Vm::new`] compiles it once into typed [`Op`]s and
//! [`Successor`]s, and [`Vm::run`] walks the graph from the entry block to
//! the terminal block.
//!
//! # Example
//!
//! ```
//! use sparq_vm::{Block, Program, Vm};
//!
//! let program = Program::new("main")
//!     .block(
//!         Block::new("main")
//!             .set(0, 5)
//!             .set(1, 3)
//!             .binary("+", 2, 0, 1)
//!             .branch(2, "nonzero", "zero"),
//!     )
//!     .block(Block::new("nonzero").set(3, 1).jump("done"))
//!     .block(Block::new("zero").set(3, 0).jump("done"))
//!     .block(Block::new("done"));
//!
//! let mut vm = Vm::new(&program)?.with_seed(42);
//! vm.run()?;
//! assert_eq!(vm.get_result(2), 8);
//! assert_eq!(vm.get_result(3), 1);
//! # Ok::<(), sparq_vm::VmError>(())
//! ```

pub mod ast;
pub mod compile;
pub mod error;
pub mod op;
pub mod vm;

pub use ast::{Block, BlockEnd, Program, Statement};
pub use compile::compile;
pub use error::{VmError, VmResult};
pub use op::{BinaryOp, BlockId, CompiledBlock, CompiledProgram, Op, Successor, UnaryOp};
pub use vm::Vm;
