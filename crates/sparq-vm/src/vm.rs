//! The block-graph interpreter.

use sparq_sim::{PluginRegistry, RegisterId, SimError, Simulator, config, snapshot};
use sparq_state::DumpRecord;
use std::path::PathBuf;
use tracing::{Span, debug, instrument, trace};

use crate::ast::Program;
use crate::compile::compile;
use crate::error::{VmError, VmResult};
use crate::op::{CompiledProgram, Op, Successor};

/// Why a single op failed, before block context is attached.
enum Fault {
    Simulation(SimError),
    Arithmetic(&'static str),
}

impl From<SimError> for Fault {
    fn from(e: SimError) -> Self {
        Fault::Simulation(e)
    }
}

/// A compiled program bound to a simulator.
///
/// Every [`run`](Self::run) starts from a fresh simulator seeded with the
/// VM's seed, so repeated runs are reproducible. Unless
/// [`with_seed`](Self::with_seed) pinned it, that seed is re-read from the
/// global configuration at the start of each run.
pub struct Vm {
    program: CompiledProgram,
    simulator: Simulator,
    registry: PluginRegistry,
    /// Re-read the global search path on every run.
    global_search_path: bool,
    /// Re-read the global seed on every run.
    global_seed: bool,
    seed: u64,
}

impl Vm {
    /// Compile `program` with the global seed and plugin search path.
    pub fn new(program: &Program) -> VmResult<Self> {
        let seed = config::seed();
        Ok(Self {
            program: compile(program)?,
            simulator: Simulator::with_seed(seed),
            registry: PluginRegistry::new(),
            global_search_path: true,
            global_seed: true,
            seed,
        })
    }

    /// Decode a JSON instruction tree and compile it.
    pub fn from_json(text: &str) -> VmResult<Self> {
        Self::new(&Program::from_json(text)?)
    }

    /// Use `seed` for subsequent runs, ignoring the global seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.global_seed = false;
        self.simulator = Simulator::with_seed(seed);
        self
    }

    /// Resolve plugins through `registry`, keeping its own search path.
    #[must_use]
    pub fn with_registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = registry;
        self.global_search_path = false;
        self
    }

    /// The seed of the last run, or of the next one if none has started.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The compiled block graph.
    pub fn program(&self) -> &CompiledProgram {
        &self.program
    }

    /// Plugin registry, for registering additional built-ins.
    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// The simulator of the last run.
    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// Execute from the entry block until the terminal block has run.
    ///
    /// A failing op aborts the run. Effects of earlier ops stay visible
    /// through the accessors.
    #[instrument(skip(self), fields(seed))]
    pub fn run(&mut self) -> VmResult<()> {
        if self.global_seed {
            self.seed = config::seed();
        }
        Span::current().record("seed", self.seed);
        self.simulator = Simulator::with_seed(self.seed);
        if self.global_search_path {
            self.registry.set_search_path(config::plugin_path());
        }
        let Self {
            program,
            simulator,
            registry,
            ..
        } = self;

        let mut current = program.entry;
        let mut steps: u64 = 0;
        loop {
            let block = program.block(current);
            trace!("Entering block '{}'", block.label);

            for op in &block.ops {
                trace!(block = %block.label, "{}", op);
                execute(simulator, registry, op).map_err(|fault| match fault {
                    Fault::Simulation(source) => VmError::Simulation {
                        label: block.label.clone(),
                        operation: op.to_string(),
                        source,
                    },
                    Fault::Arithmetic(reason) => VmError::Arithmetic {
                        label: block.label.clone(),
                        operation: op.to_string(),
                        reason: reason.to_string(),
                    },
                })?;
            }
            steps += 1;

            if current == program.end {
                break;
            }
            current = match block.successor {
                Successor::Jump(next) => next,
                Successor::Branch {
                    register,
                    then,
                    otherwise,
                } => {
                    if simulator.register(register) != 0 {
                        then
                    } else {
                        otherwise
                    }
                }
                Successor::End => break,
            };
        }

        debug!(
            "Run finished after {} blocks ({} registers, {} dumps)",
            steps,
            simulator.register_count(),
            simulator.dump_count()
        );
        Ok(())
    }

    /// One `id value` line per written register.
    pub fn results(&self) -> String {
        self.simulator.results()
    }

    /// Number of written registers.
    pub fn result_count(&self) -> usize {
        self.simulator.register_count()
    }

    /// Value of register `register`; unset registers read 0.
    pub fn get_result(&self, register: u64) -> i64 {
        self.simulator.register(RegisterId(register))
    }

    /// Number of recorded dumps.
    pub fn dump_count(&self) -> usize {
        self.simulator.dump_count()
    }

    /// Dump `index` as a structured record.
    pub fn get_dump_record(&self, index: usize) -> VmResult<&DumpRecord> {
        Ok(self.simulator.get_dump(index)?)
    }

    /// Dump `index` serialized as snapshot bytes.
    pub fn get_dump(&self, index: usize) -> VmResult<Vec<u8>> {
        Ok(snapshot::to_bytes(self.get_dump_record(index)?)?)
    }

    /// Write dump `index` to the configured dump directory and return the path.
    pub fn dump_to_file(&self, index: usize) -> VmResult<PathBuf> {
        self.dump_to_dir(index, config::dump_dir())
    }

    /// Write dump `index` under `dir` and return the path.
    pub fn dump_to_dir(&self, index: usize, dir: impl Into<PathBuf>) -> VmResult<PathBuf> {
        let dir: PathBuf = dir.into();
        let record = self.get_dump_record(index)?;
        Ok(snapshot::write_snapshot(record, &dir)?)
    }
}

impl std::fmt::Debug for Vm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("blocks", &self.program.blocks.len())
            .field("seed", &self.seed)
            .field("simulator", &self.simulator)
            .field("registry", &self.registry)
            .finish()
    }
}

fn execute(sim: &mut Simulator, registry: &mut PluginRegistry, op: &Op) -> Result<(), Fault> {
    match op {
        Op::Alloc { qubit, dirty } => sim.alloc(*qubit, *dirty)?,
        Op::Free { qubit, dirty } => sim.free(*qubit, *dirty)?,
        Op::Gate { gate, target, ctrl } => sim.apply_gate(gate, *target, ctrl)?,
        Op::Measure { qubits, register } => {
            let mut value: u64 = 0;
            for qubit in qubits {
                value = (value << 1) | u64::from(sim.measure(*qubit)?);
            }
            // Up to 64 bits, reinterpreted as the register's two's complement.
            sim.set_register(*register, value as i64);
        }
        Op::Dump { qubits } => {
            sim.dump(qubits)?;
        }
        Op::Plugin {
            name,
            targets,
            args,
            inverse,
            ctrl,
        } => {
            let plugin = registry.resolve(name)?;
            sim.apply_plugin(plugin, targets, args, *inverse, ctrl)?;
        }
        Op::Const { register, value } => sim.set_register(*register, *value),
        Op::Move { dst, src } => {
            let value = sim.register(*src);
            sim.set_register(*dst, value);
        }
        Op::Binary { op, dst, lhs, rhs } => {
            let value = op
                .apply(sim.register(*lhs), sim.register(*rhs))
                .map_err(Fault::Arithmetic)?;
            sim.set_register(*dst, value);
        }
        Op::Unary { op, dst, src } => {
            let value = op.apply(sim.register(*src));
            sim.set_register(*dst, value);
        }
    }
    Ok(())
}
