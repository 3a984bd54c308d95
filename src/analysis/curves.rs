// Error curves
// FAR/FRR swept across a threshold grid for one split

use serde::{Deserialize, Serialize};

use crate::data::Label;

use super::stats::ThresholdGrid;

/// A classifier score paired with the true class of its example
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredExample {
    pub score: f64,
    pub label: Label,
}

/// FAR and FRR (percentages) aligned index by index with a threshold grid.
/// FAR never increases and FRR never decreases along the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    pub far: Vec<f64>,
    pub frr: Vec<f64>,
}

impl CurveSet {
    /// Sweep `grid` over finite noise and signal scores
    pub fn compute(noise: &[f64], signal: &[f64], grid: &ThresholdGrid) -> Self {
        let noise = sorted(noise);
        let signal = sorted(signal);
        let n_noise = noise.len() as f64;
        let n_signal = signal.len() as f64;

        let mut far = Vec::with_capacity(grid.len());
        let mut frr = Vec::with_capacity(grid.len());

        for &t in grid.thresholds() {
            let noise_below = noise.partition_point(|&s| s < t);
            let signal_below = signal.partition_point(|&s| s < t);

            far.push(100.0 * (noise.len() - noise_below) as f64 / n_noise);
            frr.push(100.0 * signal_below as f64 / n_signal);
        }

        CurveSet { far, frr }
    }

    pub fn len(&self) -> usize {
        self.far.len()
    }

    pub fn is_empty(&self) -> bool {
        self.far.is_empty()
    }

    /// Half total error rate at grid index `index`
    pub fn hter(&self, index: usize) -> f64 {
        (self.far[index] + self.frr[index]) / 2.0
    }
}

/// Threshold, FAR and FRR columns of equal length, as handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveTable {
    pub threshold: Vec<f64>,
    pub far: Vec<f64>,
    pub frr: Vec<f64>,
}

impl CurveTable {
    pub fn new(grid: &ThresholdGrid, curves: &CurveSet) -> Self {
        CurveTable {
            threshold: grid.thresholds().to_vec(),
            far: curves.far.clone(),
            frr: curves.frr.clone(),
        }
    }
}

fn sorted(scores: &[f64]) -> Vec<f64> {
    let mut out = scores.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats::{far, frr};
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        let grid = ThresholdGrid::linspace(-1.0, 1.0, 21).unwrap();
        let curves = CurveSet::compute(&[-0.8, -0.2, 0.3], &[-0.1, 0.4, 0.7], &grid);

        assert_eq!(curves.len(), 21);
        assert_eq!(curves.far[0], 100.0);
        assert_eq!(curves.frr[0], 0.0);
        assert_eq!(curves.far[20], 0.0);
        assert_eq!(curves.frr[20], 100.0);
    }

    #[test]
    fn test_worked_example() {
        let grid = ThresholdGrid::from_thresholds(vec![-1.0, 0.0, 1.0]).unwrap();
        let curves = CurveSet::compute(&[-0.9, -0.5, 0.2], &[0.1, 0.6, 0.9], &grid);

        assert!((curves.far[1] - 100.0 / 3.0).abs() < 1e-12);
        assert_eq!(curves.frr[1], 0.0);
        assert!((curves.hter(1) - 50.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_curve_table_alignment() {
        let grid = ThresholdGrid::linspace(0.0, 1.0, 4).unwrap();
        let curves = CurveSet::compute(&[0.1], &[0.9], &grid);
        let table = CurveTable::new(&grid, &curves);

        assert_eq!(table.threshold.len(), table.far.len());
        assert_eq!(table.far.len(), table.frr.len());
    }

    proptest! {
        #[test]
        fn prop_matches_direct_counts(
            noise in prop::collection::vec(-1.5f64..1.5, 1..50),
            signal in prop::collection::vec(-1.5f64..1.5, 1..50),
            points in 2usize..40,
        ) {
            let grid = ThresholdGrid::linspace(-1.0, 1.0, points).unwrap();
            let curves = CurveSet::compute(&noise, &signal, &grid);

            for (i, &t) in grid.thresholds().iter().enumerate() {
                prop_assert_eq!(curves.far[i], far(&noise, t));
                prop_assert_eq!(curves.frr[i], frr(&signal, t));
            }
        }

        #[test]
        fn prop_curves_are_monotonic(
            noise in prop::collection::vec(-1.0f64..1.0, 1..50),
            signal in prop::collection::vec(-1.0f64..1.0, 1..50),
        ) {
            let grid = ThresholdGrid::default();
            let curves = CurveSet::compute(&noise, &signal, &grid);

            for i in 1..curves.len() {
                prop_assert!(curves.far[i - 1] >= curves.far[i]);
                prop_assert!(curves.frr[i - 1] <= curves.frr[i]);
            }
        }
    }
}
