// Dataset splits
// Labeled feature vectors grouped into the train/devel/test triple

pub mod split;

pub use split::{Label, PerSplit, Split, SplitError, SplitKind, Splits};
