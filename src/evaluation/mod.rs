// Evaluator
// Runs a classifier over one split and reduces it to a mean squared error

pub mod mse;

pub use mse::{evaluate, mean_squared_error, EvaluationError};
