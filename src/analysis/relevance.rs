// Feature relevance
// How much the classifier output moves when one input feature is
// replaced by its mean over the split

use crate::classifier::Classifier;
use crate::data::{PerSplit, Split};
use crate::evaluation::{mean_squared_error, EvaluationError};
use crate::observer::Observer;

use super::analyzer::{AnalysisError, AnalysisResult};

/// For each feature, the MSE between the classifier's outputs on the split
/// and its outputs with that feature column set to the column mean.
/// Larger values mean the classifier leans more on the feature.
pub fn feature_relevance<C: Classifier>(
    classifier: &C,
    split: &Split,
) -> Result<Vec<f64>, EvaluationError> {
    let baseline = classifier.run(split.input())?;
    let means = split.column_means();
    let mut relevance = Vec::with_capacity(means.len());
    let mut perturbed: Vec<Vec<f64>> = split.input().to_vec();

    for (feature, &mean) in means.iter().enumerate() {
        for (row, original) in perturbed.iter_mut().zip(split.input()) {
            row.copy_from_slice(original);
            row[feature] = mean;
        }

        let output = classifier.run(&perturbed)?;
        relevance.push(mean_squared_error(&baseline, &output)?);
    }

    Ok(relevance)
}

/// Feature relevance of the observer's best snapshot on every split
pub fn best_relevance<C: Classifier>(observer: &Observer<C>) -> AnalysisResult<PerSplit<Vec<f64>>> {
    let best = observer.best().ok_or(AnalysisError::NoSnapshot)?;

    observer.splits().try_map(|kind, split| {
        feature_relevance(&best.classifier, split).map_err(|source| AnalysisError::Evaluation {
            split: kind.name(),
            source,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::doubles::Constant;
    use crate::classifier::LinearClassifier;
    use crate::data::split::fixtures;

    #[test]
    fn test_unused_feature_has_zero_relevance() {
        let classifier = LinearClassifier::new(vec![2.0, 0.0], 0.0);
        let relevance = feature_relevance(&classifier, &fixtures::separable("train", 0.0)).unwrap();

        assert_eq!(relevance.len(), 2);
        assert!(relevance[0] > 0.0);
        assert_eq!(relevance[1], 0.0);
    }

    #[test]
    fn test_heavier_weight_is_more_relevant() {
        let classifier = LinearClassifier::new(vec![0.2, 1.5], 0.0);
        let relevance = feature_relevance(&classifier, &fixtures::separable("test", 0.0)).unwrap();

        assert!(relevance[1] > relevance[0]);
    }

    #[test]
    fn test_constant_classifier_ignores_everything() {
        let relevance =
            feature_relevance(&Constant(0.4), &fixtures::separable("devel", 0.0)).unwrap();
        assert_eq!(relevance, vec![0.0, 0.0]);
    }

    #[test]
    fn test_best_relevance_covers_all_splits() {
        let mut observer = Observer::new(fixtures::splits());
        observer
            .evaluate(&LinearClassifier::new(vec![1.0, 0.0], 0.0), 1)
            .unwrap();

        let relevance = best_relevance(&observer).unwrap();
        for (_, values) in relevance.iter() {
            assert_eq!(values.len(), 2);
            assert_eq!(values[1], 0.0);
        }
    }

    #[test]
    fn test_best_relevance_requires_snapshot() {
        let observer: Observer<Constant> = Observer::new(fixtures::splits());
        assert!(matches!(best_relevance(&observer), Err(AnalysisError::NoSnapshot)));
    }
}
