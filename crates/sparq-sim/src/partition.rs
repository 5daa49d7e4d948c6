//! Arena of partitions: groups of physical qubits sharing one state map.
//!
//! Every allocated physical qubit is owned by exactly one partition. Merging
//! tensors the absorbed partitions into a survivor and re-points their
//! members, so ownership never forms a cycle.

use rustc_hash::FxHashMap;
use sparq_state::StateMap;
use tracing::debug;

/// Index of a partition slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PartitionId(usize);

/// One coherent subsystem.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Amplitudes over the global physical positions.
    pub state: StateMap,
    /// Physical qubits whose bits this state carries.
    pub members: Vec<usize>,
}

/// Slot arena with a physical-qubit → partition index.
#[derive(Debug, Default)]
pub(crate) struct PartitionArena {
    slots: Vec<Partition>,
    vacant: Vec<usize>,
    owner: FxHashMap<usize, PartitionId>,
}

impl PartitionArena {
    /// Put `physical` in a fresh singleton partition at |0⟩.
    pub(crate) fn insert_singleton(&mut self, physical: usize) -> PartitionId {
        let partition = Partition {
            state: StateMap::new(),
            members: vec![physical],
        };
        let id = match self.vacant.pop() {
            Some(slot) => {
                self.slots[slot] = partition;
                PartitionId(slot)
            }
            None => {
                self.slots.push(partition);
                PartitionId(self.slots.len() - 1)
            }
        };
        self.owner.insert(physical, id);
        id
    }

    /// Partition owning `physical`, if any.
    pub(crate) fn owner_of(&self, physical: usize) -> Option<PartitionId> {
        self.owner.get(&physical).copied()
    }

    pub(crate) fn get(&self, id: PartitionId) -> &Partition {
        &self.slots[id.0]
    }

    pub(crate) fn state_mut(&mut self, id: PartitionId) -> &mut StateMap {
        &mut self.slots[id.0].state
    }

    /// Number of live partitions.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    /// Unify the partitions of `first` and every qubit in `others`.
    ///
    /// Returns the partition that now owns all of them.
    pub(crate) fn merge(&mut self, first: usize, others: &[usize]) -> PartitionId {
        let survivor = self.owner[&first];
        for physical in others {
            let absorbed = self.owner[physical];
            if absorbed != survivor {
                self.absorb(survivor, absorbed);
            }
        }
        survivor
    }

    fn absorb(&mut self, survivor: PartitionId, absorbed: PartitionId) {
        let taken = std::mem::take(&mut self.slots[absorbed.0]);
        self.vacant.push(absorbed.0);

        let target = &mut self.slots[survivor.0];
        target.state = target.state.tensor(&taken.state);
        for &member in &taken.members {
            self.owner.insert(member, survivor);
        }
        target.members.extend(taken.members);

        debug!(
            "Merged partition {} into {} ({} qubits, {} basis states)",
            absorbed.0,
            survivor.0,
            target.members.len(),
            target.state.len()
        );
    }

    /// Remove `physical` from its partition, discarding the partition when
    /// it was the last member.
    ///
    /// The caller must have forced the qubit's bit to 0 beforehand.
    pub(crate) fn detach(&mut self, physical: usize) {
        let Some(id) = self.owner.remove(&physical) else {
            return;
        };
        let slot = &mut self.slots[id.0];
        slot.members.retain(|&member| member != physical);
        if slot.members.is_empty() {
            *slot = Partition::default();
            self.vacant.push(id.0);
            debug!("Discarded partition {}", id.0);
        }
    }
}
