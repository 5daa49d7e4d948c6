//! Byte and file export of dump records.

use sparq_state::DumpRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SimResult;

/// Serialize a dump record to JSON bytes.
pub fn to_bytes(record: &DumpRecord) -> SimResult<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

/// Parse a dump record from JSON bytes.
pub fn from_bytes(bytes: &[u8]) -> SimResult<DumpRecord> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write `record` to a fresh `dump-<uuid>.json` file under `dir`.
///
/// `dir` is created if missing. Returns the path of the written file.
pub fn write_snapshot(record: &DumpRecord, dir: impl AsRef<Path>) -> SimResult<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let path = dir.join(format!("dump-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, to_bytes(record)?)?;
    debug!("Wrote dump snapshot to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use sparq_state::StateMap;

    fn bell_record() -> DumpRecord {
        let mut state = StateMap::new();
        state.h(0, &[]);
        state.cnot(0, 1, &[]);
        state.dump(2)
    }

    #[test]
    fn test_bytes_preserve_record() {
        let record = bell_record();
        let bytes = to_bytes(&record).unwrap();
        assert_eq!(from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            from_bytes(b"{not json"),
            Err(SimError::Serialization(_))
        ));
    }

    #[test]
    fn test_write_snapshot() {
        let dir = std::env::temp_dir().join(format!("sparq-snapshot-{}", uuid::Uuid::new_v4()));
        let path = write_snapshot(&bell_record(), &dir).unwrap();
        assert!(path.starts_with(&dir));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(from_bytes(&written).unwrap().len(), 2);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
