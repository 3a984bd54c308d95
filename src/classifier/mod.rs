// Classifier capability
// The observed model is consumed only through run/clone/save/load

pub mod backend;
pub mod linear;

pub use backend::{Classifier, ClassifierError};
pub use linear::LinearClassifier;
