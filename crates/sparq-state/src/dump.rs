//! Deterministic snapshots of a qubit subset.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All amplitudes that share one bit pattern over the dumped qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpEntry {
    /// The bit pattern of the dumped qubits, 64 qubits per word, position 0
    /// in the least significant bit of the first word.
    pub basis: Vec<u64>,
    /// Contributing amplitudes, sorted by real part then imaginary part.
    pub amplitudes: Vec<Complex64>,
}

impl DumpEntry {
    /// Σ|amp|² over the contributing amplitudes.
    pub fn probability(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }
}

/// A snapshot of a qubit subset: bit pattern → sorted amplitude list.
///
/// Entries are ordered by `basis`, so two dumps of equal states compare equal
/// regardless of the internal map iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpRecord {
    /// Number of qubits covered by each bit pattern.
    pub num_qubits: usize,
    /// One entry per distinct bit pattern.
    pub entries: Vec<DumpEntry>,
}

impl DumpRecord {
    /// Number of distinct bit patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the record holds no bit pattern.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Amplitudes of the pattern whose low 64 qubits are `basis`.
    ///
    /// Qubits above 64 are required to be 0.
    pub fn get(&self, basis: u64) -> Option<&[Complex64]> {
        self.entries
            .iter()
            .find(|entry| key_matches(&entry.basis, basis))
            .map(|entry| entry.amplitudes.as_slice())
    }

    /// Probability of observing `basis` on the dumped qubits.
    pub fn probability(&self, basis: u64) -> f64 {
        self.entries
            .iter()
            .find(|entry| key_matches(&entry.basis, basis))
            .map_or(0.0, DumpEntry::probability)
    }

    /// Iterate over the entries in basis order.
    pub fn iter(&self) -> impl Iterator<Item = &DumpEntry> {
        self.entries.iter()
    }
}

impl fmt::Display for DumpRecord {
    /// One line per pattern: `|q0 q1 …⟩` followed by its amplitudes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            f.write_str("|")?;
            for pos in 0..self.num_qubits {
                let word = entry.basis.get(pos / 64).copied().unwrap_or(0);
                f.write_str(if (word >> (pos % 64)) & 1 == 1 { "1" } else { "0" })?;
            }
            f.write_str("⟩")?;
            for amp in &entry.amplitudes {
                write!(f, " {:+.6}{:+.6}i", amp.re, amp.im)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn key_matches(key: &[u64], basis: u64) -> bool {
    match key.split_first() {
        Some((first, rest)) => *first == basis && rest.iter().all(|&w| w == 0),
        None => basis == 0,
    }
}

/// Sort amplitudes by real part, then imaginary part.
pub(crate) fn sort_amplitudes(amplitudes: &mut [Complex64]) {
    amplitudes.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
}
