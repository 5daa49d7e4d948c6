//! Plugins compiled into the simulator.

use sparq_state::{Amplitudes, StateMap};

use crate::error::{SimError, SimResult};
use crate::plugin::Plugin;

/// Modular addition of a classical constant: `|x⟩ → |x + k mod 2^n⟩`.
///
/// The target register is read with the first target as the most
/// significant bit. `args` holds the decimal constant `k`; the inverse
/// subtracts it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddConstant;

impl AddConstant {
    /// Resolution name.
    pub const NAME: &'static str = "add";

    fn parse(args: &str) -> SimResult<i64> {
        args.trim().parse().map_err(|e| SimError::Plugin {
            name: Self::NAME.into(),
            reason: format!("expected an integer constant, got '{args}': {e}"),
        })
    }
}

impl Plugin for AddConstant {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(
        &self,
        state: &mut StateMap,
        num_qubits: usize,
        args: &str,
        inverse: bool,
        _num_controls: usize,
    ) -> SimResult<()> {
        if num_qubits > 64 {
            return Err(SimError::Plugin {
                name: Self::NAME.into(),
                reason: format!("register of {num_qubits} qubits exceeds 64"),
            });
        }
        let constant = Self::parse(args)?;
        if num_qubits == 0 {
            return Ok(());
        }

        let mask = if num_qubits == 64 {
            u64::MAX
        } else {
            (1u64 << num_qubits) - 1
        };
        let signed = if inverse {
            constant.wrapping_neg()
        } else {
            constant
        };
        // Two's complement keeps the offset correct modulo 2^n.
        let offset = signed as u64;

        let mut next = Amplitudes::with_capacity_and_hasher(state.len(), Default::default());
        for (index, amp) in state.iter() {
            let value = (0..num_qubits)
                .fold(0u64, |acc, pos| (acc << 1) | u64::from(index.is_one(pos)));
            let sum = value.wrapping_add(offset) & mask;
            let mut shifted = *index;
            for pos in 0..num_qubits {
                shifted.set(pos, (sum >> (num_qubits - 1 - pos)) & 1 == 1);
            }
            next.insert(shifted, *amp);
        }
        state.replace(next);
        Ok(())
    }
}
