// Error-rate statistics
// FAR/FRR at a threshold, the shared threshold grid, and operating-point selection

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("A threshold grid needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("Invalid grid bounds [{min}, {max}]")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Threshold at index {index} does not increase")]
    NotIncreasing { index: usize },
}

/// False accept rate: percentage of noise scores at or above `threshold`
pub fn far(noise: &[f64], threshold: f64) -> f64 {
    let accepted = noise.iter().filter(|&&s| s >= threshold).count();
    100.0 * accepted as f64 / noise.len() as f64
}

/// False reject rate: percentage of signal scores below `threshold`
pub fn frr(signal: &[f64], threshold: f64) -> f64 {
    let rejected = signal.iter().filter(|&&s| s < threshold).count();
    100.0 * rejected as f64 / signal.len() as f64
}

/// Strictly increasing decision thresholds. Index `i` means the same
/// threshold in every curve computed against one grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct ThresholdGrid {
    thresholds: Vec<f64>,
}

/// Unchecked serialized form; deserializing goes through `from_thresholds`
#[derive(Deserialize)]
struct GridData {
    thresholds: Vec<f64>,
}

impl TryFrom<GridData> for ThresholdGrid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        ThresholdGrid::from_thresholds(data.thresholds)
    }
}

impl ThresholdGrid {
    /// `points` evenly spaced thresholds from `min` to `max` inclusive
    pub fn linspace(min: f64, max: f64, points: usize) -> Result<Self, GridError> {
        if points < 2 {
            return Err(GridError::TooFewPoints(points));
        }
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(GridError::InvalidBounds { min, max });
        }

        let last = points - 1;
        let mut thresholds: Vec<f64> = (0..last)
            .map(|i| min + (max - min) * (i as f64 / last as f64))
            .collect();
        thresholds.push(max);

        Self::from_thresholds(thresholds)
    }

    /// Use explicit thresholds, which must be finite and strictly increasing
    pub fn from_thresholds(thresholds: Vec<f64>) -> Result<Self, GridError> {
        if thresholds.len() < 2 {
            return Err(GridError::TooFewPoints(thresholds.len()));
        }
        if let Some(index) = thresholds.iter().position(|t| !t.is_finite()) {
            return Err(GridError::NotIncreasing { index });
        }
        if let Some(index) = (1..thresholds.len()).find(|&i| thresholds[i] <= thresholds[i - 1]) {
            return Err(GridError::NotIncreasing { index });
        }

        Ok(ThresholdGrid { thresholds })
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.thresholds.get(index).copied()
    }

    pub fn min(&self) -> f64 {
        self.thresholds[0]
    }

    pub fn max(&self) -> f64 {
        self.thresholds[self.thresholds.len() - 1]
    }
}

impl Default for ThresholdGrid {
    /// 201 thresholds over [-1, 1], the range of a tanh output
    fn default() -> Self {
        let last = 200;
        let mut thresholds: Vec<f64> = (0..last)
            .map(|i| -1.0 + 2.0 * (i as f64 / last as f64))
            .collect();
        thresholds.push(1.0);
        ThresholdGrid { thresholds }
    }
}

/// Index minimizing `omega * far + (1 - omega) * frr`.
///
/// Scans in increasing threshold order and lets a later index win when its
/// weighted error is less than or equal to the current minimum, so among
/// equally good thresholds the largest one is chosen.
pub fn min_weighted_error_index(far: &[f64], frr: &[f64], omega: f64) -> Option<usize> {
    select_last_minimum(far, frr, |fa, fr| omega * fa + (1.0 - omega) * fr)
}

/// Index minimizing `|far - frr|`, with the same later-wins tie-break
pub fn min_rate_difference_index(far: &[f64], frr: &[f64]) -> Option<usize> {
    select_last_minimum(far, frr, |fa, fr| (fa - fr).abs())
}

fn select_last_minimum<F>(far: &[f64], frr: &[f64], cost: F) -> Option<usize>
where
    F: Fn(f64, f64) -> f64,
{
    let mut best: Option<(usize, f64)> = None;

    for (index, (&fa, &fr)) in far.iter().zip(frr).enumerate() {
        let value = cost(fa, fr);
        if best.map_or(true, |(_, min)| value <= min) {
            best = Some((index, value));
        }
    }

    best.map(|(index, _)| index)
}
