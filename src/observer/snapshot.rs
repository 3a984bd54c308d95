// Best classifier snapshot and its persisted form

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// The classifier state with the lowest devel error seen so far.
/// Replaced wholesale on improvement, never mutated in place.
#[derive(Debug, Clone)]
pub struct BestSnapshot<C> {
    /// Step of the evaluation that produced this snapshot
    pub step: u64,

    /// Devel MSE at that step
    pub devel_mse: f64,

    /// Independent copy of the classifier taken at that step
    pub classifier: C,
}

/// Where a snapshot was written and what it contained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSnapshot {
    pub path: PathBuf,
    pub step: u64,
    pub sha256: String,
}

/// Calculate SHA256 hash of data
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_sha256() {
        let data = b"hello world";
        let hash = calculate_sha256(data);
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
