//! Logical qubit and classical register identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Program-level qubit identifier, mapped to a physical slot on allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u64);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u64> for QubitId {
    fn from(id: u64) -> Self {
        QubitId(id)
    }
}

/// Classical register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegisterId(pub u64);

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl From<u64> for RegisterId {
    fn from(id: u64) -> Self {
        RegisterId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(QubitId(3).to_string(), "q3");
        assert_eq!(RegisterId::from(12).to_string(), "r12");
    }

    #[test]
    fn test_ordering() {
        let mut ids = vec![QubitId(5), QubitId(1), QubitId(3)];
        ids.sort();
        assert_eq!(ids, vec![QubitId(1), QubitId(3), QubitId(5)]);
    }
}
