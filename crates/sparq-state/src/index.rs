//! Fixed-width basis-state indices.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Maximum number of simultaneously representable physical qubits.
pub const MAX_QUBITS: usize = 1024;

const WORD_BITS: usize = u64::BITS as usize;
const WORDS: usize = MAX_QUBITS / WORD_BITS;

/// One basis state across every physical qubit slot.
///
/// Bit *i* holds the classical value of physical qubit *i*. Indices order as
/// the unsigned integers they encode, so sorting is deterministic and matches
/// the numeric value of the basis state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitIndex {
    words: [u64; WORDS],
}

impl BitIndex {
    /// The all-zero basis state |0…0⟩.
    pub const fn zero() -> Self {
        Self { words: [0; WORDS] }
    }

    /// Build an index whose low 64 qubits are taken from `bits`.
    pub fn from_u64(bits: u64) -> Self {
        let mut index = Self::zero();
        index.words[0] = bits;
        index
    }

    /// Returns `true` if qubit `pos` is 1 in this basis state.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= MAX_QUBITS`.
    #[inline]
    pub fn is_one(&self, pos: usize) -> bool {
        (self.words[pos / WORD_BITS] >> (pos % WORD_BITS)) & 1 == 1
    }

    /// Returns `true` if qubit `pos` is 0 in this basis state.
    #[inline]
    pub fn is_zero(&self, pos: usize) -> bool {
        !self.is_one(pos)
    }

    /// Returns `true` if every position in `positions` is 1.
    #[inline]
    pub fn all_ones(&self, positions: &[usize]) -> bool {
        positions.iter().all(|&pos| self.is_one(pos))
    }

    /// Flip qubit `pos` in place.
    #[inline]
    pub fn flip(&mut self, pos: usize) {
        self.words[pos / WORD_BITS] ^= 1 << (pos % WORD_BITS);
    }

    /// Set qubit `pos` to `value`.
    #[inline]
    pub fn set(&mut self, pos: usize, value: bool) {
        let mask = 1 << (pos % WORD_BITS);
        if value {
            self.words[pos / WORD_BITS] |= mask;
        } else {
            self.words[pos / WORD_BITS] &= !mask;
        }
    }

    /// A copy of this index with qubit `pos` flipped.
    #[inline]
    #[must_use]
    pub fn flipped(mut self, pos: usize) -> Self {
        self.flip(pos);
        self
    }

    /// A copy of this index with qubits `a` and `b` exchanged.
    #[inline]
    #[must_use]
    pub fn swapped(mut self, a: usize, b: usize) -> Self {
        if self.is_one(a) != self.is_one(b) {
            self.flip(a);
            self.flip(b);
        }
        self
    }

    /// Returns `true` if no qubit is 1 in both indices.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & b == 0)
    }

    /// Number of qubits set to 1.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// The canonical key of the low `size` qubits.
    ///
    /// Returns `size.div_ceil(64)` words with every bit at or above `size`
    /// cleared.
    pub fn truncated(&self, size: usize) -> Vec<u64> {
        let size = size.min(MAX_QUBITS);
        let mut key = self.words[..size.div_ceil(WORD_BITS)].to_vec();
        let rem = size % WORD_BITS;
        if rem != 0 {
            if let Some(last) = key.last_mut() {
                *last &= (1 << rem) - 1;
            }
        }
        key
    }

    /// The raw words, lowest qubits first.
    pub fn words(&self) -> &[u64] {
        &self.words
    }
}

impl Ord for BitIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.words.iter().rev().cmp(other.words.iter().rev())
    }
}

impl PartialOrd for BitIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl BitOr for BitIndex {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self {
        self |= rhs;
        self
    }
}

impl BitOrAssign for BitIndex {
    fn bitor_assign(&mut self, rhs: Self) {
        for (a, b) in self.words.iter_mut().zip(rhs.words) {
            *a |= b;
        }
    }
}

impl fmt::Debug for BitIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<usize> = (0..MAX_QUBITS).filter(|&pos| self.is_one(pos)).collect();
        f.debug_tuple("BitIndex").field(&set).finish()
    }
}

impl fmt::Display for BitIndex {
    /// Renders the qubits up to the highest set bit, qubit 0 first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (0..MAX_QUBITS)
            .rev()
            .find(|&pos| self.is_one(pos))
            .map_or(1, |pos| pos + 1);
        for pos in 0..width {
            f.write_str(if self.is_one(pos) { "1" } else { "0" })?;
        }
        Ok(())
    }
}
