// Mean squared error evaluation

use thiserror::Error;

use crate::classifier::{Classifier, ClassifierError};
use crate::data::Split;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Classifier failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Output has {outputs} values but there are {targets} targets")]
    LengthMismatch { outputs: usize, targets: usize },
}

/// Mean of `(output[i] - target[i])^2`.
///
/// An empty pair of sequences has no mean and yields NaN, which callers
/// treat as a non-finite error rather than a crash.
pub fn mean_squared_error(output: &[f64], target: &[f64]) -> Result<f64, EvaluationError> {
    if output.len() != target.len() {
        return Err(EvaluationError::LengthMismatch {
            outputs: output.len(),
            targets: target.len(),
        });
    }

    let sum: f64 = output
        .iter()
        .zip(target)
        .map(|(o, t)| (o - t) * (o - t))
        .sum();

    Ok(sum / output.len() as f64)
}

/// Run `classifier` over `split` and compute the MSE against its targets
pub fn evaluate<C: Classifier>(classifier: &C, split: &Split) -> Result<f64, EvaluationError> {
    let output = classifier.run(split.input())?;
    let mse = mean_squared_error(&output, split.target())?;

    log::debug!("{} MSE = {:.6e}", split.name(), mse);
    Ok(mse)
}
