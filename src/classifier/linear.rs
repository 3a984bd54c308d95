// Linear classifier with tanh output
// Reference implementation of the classifier capability, persisted as JSON

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::backend::{Classifier, ClassifierError};

/// Single-neuron model: `tanh(w . x + b)`, so outputs lie in (-1, 1)
/// and match the -1 (noise) / +1 (signal) target convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// One weight per input feature
    pub weights: Vec<f64>,

    /// Constant offset added before the activation
    pub bias: f64,
}

impl LinearClassifier {
    /// Create a classifier from explicit weights and bias
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        LinearClassifier { weights, bias }
    }

    /// Create an all-zero classifier for `inputs` features
    pub fn zeros(inputs: usize) -> Self {
        LinearClassifier {
            weights: vec![0.0; inputs],
            bias: 0.0,
        }
    }

    /// Number of input features this classifier accepts
    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    /// Score a single feature vector
    pub fn score(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        if features.len() != self.weights.len() {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }

        let activation: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;

        Ok(activation.tanh())
    }

    /// Serialize to JSON bytes
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// Deserialize from JSON bytes
    pub fn from_json_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

impl Classifier for LinearClassifier {
    fn run(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>, ClassifierError> {
        let mut outputs = Vec::with_capacity(inputs.len());

        for (index, features) in inputs.iter().enumerate() {
            let value = self.score(features)?;
            if !value.is_finite() {
                return Err(ClassifierError::NonFinite { index });
            }
            outputs.push(value);
        }

        Ok(outputs)
    }

    fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        let bytes = self.to_json_bytes()?;
        fs::write(path, bytes)?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self, ClassifierError> {
        let bytes = fs::read(path)?;
        Ok(Self::from_json_bytes(&bytes)?)
    }
}
