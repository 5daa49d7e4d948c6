//! The partition-managing simulator.
//!
//! Logical qubits are mapped to physical slots on allocation. Each physical
//! slot is one bit position of [`BitIndex`](sparq_state::BitIndex); qubits
//! start out in singleton partitions and are merged lazily when a gate or
//! plugin couples them.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::{FxHashMap, FxHashSet};
use sparq_state::{DumpRecord, Gate, MAX_QUBITS, StateMap};
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::config;
use crate::error::{SimError, SimResult};
use crate::partition::{Partition, PartitionArena};
use crate::plugin::Plugin;
use crate::qubit::{QubitId, RegisterId};

/// Outcome of resolving a control list against classically known values.
enum Controls {
    /// Some control is definitely 0; the operation is a no-op.
    Skip,
    /// Physical positions of the controls that still need checking.
    Live(Vec<usize>),
}

/// Exact sparse simulator with lazily merged partitions.
pub struct Simulator {
    arena: PartitionArena,
    allocation: FxHashMap<QubitId, usize>,
    free: Vec<usize>,
    dirty: Vec<usize>,
    next_physical: usize,
    max_qubits: usize,
    registers: BTreeMap<RegisterId, i64>,
    bits: FxHashMap<QubitId, bool>,
    dumps: Vec<DumpRecord>,
    rng: StdRng,
    seed: u64,
}

impl Simulator {
    /// A simulator seeded from the global configuration.
    pub fn new() -> Self {
        Self::with_seed(config::seed())
    }

    /// A simulator with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            arena: PartitionArena::default(),
            allocation: FxHashMap::default(),
            free: Vec::new(),
            dirty: Vec::new(),
            next_physical: 0,
            max_qubits: config::max_qubits(),
            registers: BTreeMap::new(),
            bits: FxHashMap::default(),
            dumps: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Limit the number of physical slots. Clamped to the index width.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(MAX_QUBITS);
        self
    }

    /// The seed this simulator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    // =========================================================================
    // Qubit lifecycle
    // =========================================================================

    /// Allocate `qubit`.
    ///
    /// With `dirty` set, the most recently dirty-freed physical slot is reused
    /// together with whatever state it still carries. Otherwise the qubit
    /// starts at |0⟩ in its own partition.
    pub fn alloc(&mut self, qubit: QubitId, dirty: bool) -> SimResult<()> {
        if self.allocation.contains_key(&qubit) {
            return Err(SimError::QubitAlreadyAllocated(qubit));
        }

        if dirty {
            if let Some(physical) = self.dirty.pop() {
                debug!("Allocated {} on dirty slot {}", qubit, physical);
                self.allocation.insert(qubit, physical);
                return Ok(());
            }
        }

        let physical = match self.free.pop() {
            Some(physical) => physical,
            None if self.next_physical < self.max_qubits => {
                self.next_physical += 1;
                self.next_physical - 1
            }
            None => return Err(SimError::QubitLimitExceeded(self.max_qubits)),
        };
        self.arena.insert_singleton(physical);
        self.allocation.insert(qubit, physical);
        debug!("Allocated {} on slot {}", qubit, physical);
        Ok(())
    }

    /// Release `qubit`.
    ///
    /// With `dirty` set, its slot is parked untouched for a later dirty
    /// allocation. Otherwise it is measured, forced to 0 and detached from
    /// its partition.
    pub fn free(&mut self, qubit: QubitId, dirty: bool) -> SimResult<()> {
        let physical = self
            .allocation
            .remove(&qubit)
            .ok_or(SimError::QubitNotAllocated(qubit))?;

        if dirty {
            self.dirty.push(physical);
            debug!("Freed {} dirty (slot {})", qubit, physical);
            return Ok(());
        }

        if let Some(id) = self.arena.owner_of(physical) {
            self.arena
                .state_mut(id)
                .measure_and_force_zero(physical, &mut self.rng);
            self.arena.detach(physical);
        }
        self.free.push(physical);
        debug!("Freed {} (slot {})", qubit, physical);
        Ok(())
    }

    /// Physical slot of `qubit`.
    pub fn physical_of(&self, qubit: QubitId) -> SimResult<usize> {
        self.allocation
            .get(&qubit)
            .copied()
            .ok_or(SimError::QubitNotAllocated(qubit))
    }

    /// Currently allocated logical qubits, sorted.
    pub fn allocated_qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<QubitId> = self.allocation.keys().copied().collect();
        qubits.sort();
        qubits
    }

    /// The partition `qubit` currently belongs to.
    pub fn partition(&self, qubit: QubitId) -> SimResult<&Partition> {
        let physical = self.physical_of(qubit)?;
        let id = self
            .arena
            .owner_of(physical)
            .ok_or(SimError::QubitNotAllocated(qubit))?;
        Ok(self.arena.get(id))
    }

    /// The state map `qubit` currently belongs to.
    pub fn state_of(&self, qubit: QubitId) -> SimResult<&StateMap> {
        Ok(&self.partition(qubit)?.state)
    }

    /// Number of live partitions.
    pub fn partition_count(&self) -> usize {
        self.arena.len()
    }

    // =========================================================================
    // Quantum operations
    // =========================================================================

    /// Apply `gate` to `target`, conditioned on every qubit in `ctrl`.
    pub fn apply_gate(&mut self, gate: &Gate, target: QubitId, ctrl: &[QubitId]) -> SimResult<()> {
        let operands = self.resolve_distinct(std::iter::once(target).chain(ctrl.iter().copied()))?;
        let target_physical = operands[0];

        let controls = match self.trivialize(&operands[1..]) {
            Controls::Skip => {
                trace!("{} on {} skipped: control is 0", gate, target);
                return Ok(());
            }
            Controls::Live(controls) => controls,
        };

        let id = self.arena.merge(target_physical, &controls);
        self.arena
            .state_mut(id)
            .apply_gate(gate, target_physical, &controls);
        trace!("{} on {} with {} live controls", gate, target, controls.len());
        Ok(())
    }

    /// Measure `qubit`, record the bit and return it.
    pub fn measure(&mut self, qubit: QubitId) -> SimResult<bool> {
        let physical = self.physical_of(qubit)?;
        let id = self
            .arena
            .owner_of(physical)
            .ok_or(SimError::QubitNotAllocated(qubit))?;
        let bit = self.arena.state_mut(id).measure(physical, &mut self.rng);
        self.bits.insert(qubit, bit);
        trace!("Measured {} = {}", qubit, u8::from(bit));
        Ok(bit)
    }

    /// The last measured value of `qubit`.
    pub fn get_bit(&self, qubit: QubitId) -> SimResult<bool> {
        self.bits
            .get(&qubit)
            .copied()
            .ok_or(SimError::BitNotMeasured(qubit))
    }

    /// Run `plugin` on `targets` in canonical layout.
    ///
    /// See the [`plugin`](crate::plugin) module for the reordering protocol.
    pub fn apply_plugin(
        &mut self,
        plugin: &dyn Plugin,
        targets: &[QubitId],
        args: &str,
        inverse: bool,
        ctrl: &[QubitId],
    ) -> SimResult<()> {
        let operands = self.resolve_distinct(targets.iter().chain(ctrl).copied())?;
        let (target_physical, ctrl_physical) = operands.split_at(targets.len());

        let controls = match self.trivialize(ctrl_physical) {
            Controls::Skip => {
                trace!("Plugin '{}' skipped: control is 0", plugin.name());
                return Ok(());
            }
            Controls::Live(controls) => controls,
        };
        let Some((&first, rest)) = target_physical.split_first() else {
            return Ok(());
        };

        let mut layout = target_physical.to_vec();
        layout.extend(&controls);
        let canonical_controls: Vec<usize> = (targets.len()..layout.len()).collect();

        let id = self.arena.merge(first, &[rest, controls.as_slice()].concat());
        let state = self.arena.state_mut(id);
        let swaps = canonicalize(state, &layout);

        let (active, passive): (Vec<_>, Vec<_>) = state
            .iter()
            .map(|(index, amp)| (*index, *amp))
            .partition(|(index, _)| index.all_ones(&canonical_controls));
        let mut slice = StateMap::from_amplitudes(active.into_iter().collect());

        debug!(
            "Running plugin '{}' on {} qubits ({} controls, inverse: {})",
            plugin.name(),
            targets.len(),
            controls.len(),
            inverse
        );
        let outcome = plugin.run(&mut slice, targets.len(), args, inverse, controls.len());

        if outcome.is_ok() {
            let mut merged = slice.amplitudes().clone();
            for (index, amp) in passive {
                *merged.entry(index).or_default() += amp;
            }
            state.replace(merged);
        }
        restore(state, &swaps);
        outcome
    }

    // =========================================================================
    // Dumps
    // =========================================================================

    /// Snapshot `qubits`, append it to the dump history and return its index.
    ///
    /// The bit pattern of each entry lists `qubits` in the order given; any
    /// qubit entangled with them contributes extra amplitudes to an entry.
    pub fn dump(&mut self, qubits: &[QubitId]) -> SimResult<usize> {
        let physical = self.resolve_distinct(qubits.iter().copied())?;

        let record = match physical.split_first() {
            Some((&first, rest)) => {
                let id = self.arena.merge(first, rest);
                let state = self.arena.state_mut(id);
                let swaps = canonicalize(state, &physical);
                let record = state.dump(physical.len());
                restore(state, &swaps);
                record
            }
            None => StateMap::new().dump(0),
        };

        self.dumps.push(record);
        debug!("Recorded dump {} of {} qubits", self.dumps.len() - 1, qubits.len());
        Ok(self.dumps.len() - 1)
    }

    /// Number of recorded dumps.
    pub fn dump_count(&self) -> usize {
        self.dumps.len()
    }

    /// Recorded dump `index`.
    pub fn get_dump(&self, index: usize) -> SimResult<&DumpRecord> {
        self.dumps.get(index).ok_or(SimError::DumpNotFound {
            index,
            count: self.dumps.len(),
        })
    }

    // =========================================================================
    // Classical registers
    // =========================================================================

    /// Value of `register`; unset registers read 0.
    pub fn register(&self, register: RegisterId) -> i64 {
        self.registers.get(&register).copied().unwrap_or(0)
    }

    /// Store `value` into `register`.
    pub fn set_register(&mut self, register: RegisterId, value: i64) {
        self.registers.insert(register, value);
    }

    /// Number of registers that have been written.
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Written registers in id order.
    pub fn registers(&self) -> impl Iterator<Item = (RegisterId, i64)> + '_ {
        self.registers.iter().map(|(id, value)| (*id, *value))
    }

    /// One `id value` line per written register, in id order.
    pub fn results(&self) -> String {
        self.registers
            .iter()
            .map(|(id, value)| format!("{} {}\n", id.0, value))
            .collect()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Map qubits to physical slots, rejecting repeats.
    fn resolve_distinct(&self, qubits: impl Iterator<Item = QubitId>) -> SimResult<Vec<usize>> {
        let mut seen = FxHashSet::default();
        qubits
            .map(|qubit| {
                if !seen.insert(qubit) {
                    return Err(SimError::DuplicateQubit(qubit));
                }
                self.physical_of(qubit)
            })
            .collect()
    }

    /// Drop controls known to be 1 and detect controls known to be 0.
    ///
    /// A control is classically known when its partition holds exactly one
    /// basis state.
    fn trivialize(&self, controls: &[usize]) -> Controls {
        let mut live = Vec::with_capacity(controls.len());
        for &physical in controls {
            let Some(id) = self.arena.owner_of(physical) else {
                live.push(physical);
                continue;
            };
            let state = &self.arena.get(id).state;
            if state.len() != 1 {
                live.push(physical);
                continue;
            }
            match state.iter().next() {
                Some((index, _)) if index.is_zero(physical) => return Controls::Skip,
                _ => {}
            }
        }
        Controls::Live(live)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("seed", &self.seed)
            .field("qubits", &self.allocation.len())
            .field("partitions", &self.arena.len())
            .field("registers", &self.registers.len())
            .field("dumps", &self.dumps.len())
            .finish()
    }
}

/// Swap positions so `layout[i]` ends up at position `i`.
///
/// Returns the swaps performed, to be undone by [`restore`].
fn canonicalize(state: &mut StateMap, layout: &[usize]) -> Vec<(usize, usize)> {
    let mut positions = layout.to_vec();
    let mut swaps = Vec::new();
    for i in 0..positions.len() {
        let current = positions[i];
        if current == i {
            continue;
        }
        state.swap(i, current);
        swaps.push((i, current));
        // Whatever sat at `i` now sits at `current`.
        for later in &mut positions[i + 1..] {
            if *later == i {
                *later = current;
            }
        }
    }
    swaps
}

fn restore(state: &mut StateMap, swaps: &[(usize, usize)]) {
    for &(a, b) in swaps.iter().rev() {
        state.swap(a, b);
    }
}
