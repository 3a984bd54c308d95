// Split types
// Named, validated datasets and the fixed three-way split record

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("Split '{name}' has {inputs} inputs but {targets} targets")]
    LengthMismatch {
        name: String,
        inputs: usize,
        targets: usize,
    },

    #[error("Split '{0}' contains no examples")]
    Empty(String),

    #[error("Split '{name}' example {index} has {actual} features, expected {expected}")]
    RaggedInput {
        name: String,
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Which of the three evaluation splits a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    Train,
    Devel,
    Test,
}

impl SplitKind {
    /// All splits in reporting order
    pub const ALL: [SplitKind; 3] = [SplitKind::Train, SplitKind::Devel, SplitKind::Test];

    /// Lowercase name used in logs and file names
    pub fn name(&self) -> &'static str {
        match self {
            SplitKind::Train => "train",
            SplitKind::Devel => "devel",
            SplitKind::Test => "test",
        }
    }
}

/// Class of an example, encoded by the sign of its target.
/// Negative targets are noise (attacks), positive targets are signal (genuine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Noise,
    Signal,
}

impl Label {
    /// Classify a target value; zero carries no class
    pub fn from_target(target: f64) -> Option<Self> {
        if target < 0.0 {
            Some(Label::Noise)
        } else if target > 0.0 {
            Some(Label::Signal)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Label::Noise => "noise",
            Label::Signal => "signal",
        }
    }
}

/// One value per split. Every split is always present, so anything indexed
/// by `SplitKind` is total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerSplit<T> {
    pub train: T,
    pub devel: T,
    pub test: T,
}

impl<T> PerSplit<T> {
    pub fn new(train: T, devel: T, test: T) -> Self {
        PerSplit { train, devel, test }
    }

    /// Borrow the value for a split
    pub fn get(&self, kind: SplitKind) -> &T {
        match kind {
            SplitKind::Train => &self.train,
            SplitKind::Devel => &self.devel,
            SplitKind::Test => &self.test,
        }
    }

    /// Apply `f` to every split, keeping the split assignment
    pub fn map<U, F>(&self, mut f: F) -> PerSplit<U>
    where
        F: FnMut(SplitKind, &T) -> U,
    {
        PerSplit {
            train: f(SplitKind::Train, &self.train),
            devel: f(SplitKind::Devel, &self.devel),
            test: f(SplitKind::Test, &self.test),
        }
    }

    /// Fallible `map`; stops at the first error in train/devel/test order
    pub fn try_map<U, E, F>(&self, mut f: F) -> Result<PerSplit<U>, E>
    where
        F: FnMut(SplitKind, &T) -> Result<U, E>,
    {
        Ok(PerSplit {
            train: f(SplitKind::Train, &self.train)?,
            devel: f(SplitKind::Devel, &self.devel)?,
            test: f(SplitKind::Test, &self.test)?,
        })
    }

    /// Iterate in train/devel/test order
    pub fn iter(&self) -> impl Iterator<Item = (SplitKind, &T)> {
        SplitKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// A named, immutable dataset of feature vectors and scalar targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SplitData")]
pub struct Split {
    name: String,
    input: Vec<Vec<f64>>,
    target: Vec<f64>,
}

/// Unchecked serialized form; deserializing goes through `Split::new`
#[derive(Deserialize)]
struct SplitData {
    name: String,
    input: Vec<Vec<f64>>,
    target: Vec<f64>,
}

impl TryFrom<SplitData> for Split {
    type Error = SplitError;

    fn try_from(data: SplitData) -> Result<Self, Self::Error> {
        Split::new(data.name, data.input, data.target)
    }
}

/// The train/devel/test triple observed during training
pub type Splits = PerSplit<Split>;

impl Split {
    /// Build a split, checking that every input has a target and that all
    /// inputs share the same width
    pub fn new(
        name: impl Into<String>,
        input: Vec<Vec<f64>>,
        target: Vec<f64>,
    ) -> Result<Self, SplitError> {
        let name = name.into();

        if input.len() != target.len() {
            return Err(SplitError::LengthMismatch {
                name,
                inputs: input.len(),
                targets: target.len(),
            });
        }

        if input.is_empty() {
            return Err(SplitError::Empty(name));
        }

        let expected = input[0].len();
        if let Some((index, row)) = input
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != expected)
        {
            return Err(SplitError::RaggedInput {
                name,
                index,
                expected,
                actual: row.len(),
            });
        }

        Ok(Split {
            name,
            input,
            target,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &[Vec<f64>] {
        &self.input
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Number of examples
    pub fn size(&self) -> usize {
        self.target.len()
    }

    /// Width of each feature vector
    pub fn feature_size(&self) -> usize {
        self.input.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Number of examples carrying the given label
    pub fn count(&self, label: Label) -> usize {
        self.target
            .iter()
            .filter(|t| Label::from_target(**t) == Some(label))
            .count()
    }

    /// Mean of every feature column
    pub fn column_means(&self) -> Vec<f64> {
        let mut means = vec![0.0; self.feature_size()];
        for row in &self.input {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }

        let n = self.size() as f64;
        for mean in means.iter_mut() {
            *mean /= n;
        }
        means
    }
}
