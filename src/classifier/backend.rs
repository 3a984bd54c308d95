// Classifier backend abstraction
// Anything that maps feature vectors to one score each can be observed

use std::path::Path;
use thiserror::Error;

/// Errors raised by a classifier while running or persisting
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Input has {actual} features, classifier expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Classifier produced a non-finite output at example {index}")]
    NonFinite { index: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Classifier backend failed: {0}")]
    Backend(String),
}

/// The capability the observer and analyzer need from a trained model.
///
/// `Clone` must produce an independent deep copy: training the original
/// afterwards must not change what the copy outputs. Persistence goes through
/// `save`/`load` only; in-process duplication never touches the filesystem.
pub trait Classifier: Clone {
    /// Score every input vector. The output has one value per input.
    fn run(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>, ClassifierError>;

    /// Persist the classifier so that `load` reproduces the same outputs.
    fn save(&self, path: &Path) -> Result<(), ClassifierError>;

    /// Reload a classifier previously written by `save`.
    fn load(path: &Path) -> Result<Self, ClassifierError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = ClassifierError::ShapeMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Input has 2 features, classifier expects 3"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ClassifierError = io.into();
        assert!(matches!(err, ClassifierError::Io(_)));
    }
}
