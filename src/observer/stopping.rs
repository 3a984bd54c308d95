// Early stopping driver
// Alternates training and evaluation until the devel error stops improving

use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, ClassifierError};

use super::monitor::{Observer, ObserverResult};

/// Why the training loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// More than `patience` steps went by without a devel improvement.
    /// `best_step` is `None` when no evaluation ever had a finite devel error.
    Stalled { step: u64, best_step: Option<u64> },

    /// The step budget ran out
    MaxSteps { step: u64 },
}

/// Patience-based stopping policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyStopping {
    /// Steps without improvement tolerated before stopping
    pub patience: u64,

    /// Optional hard limit on training steps
    pub max_steps: Option<u64>,
}

impl Default for EarlyStopping {
    fn default() -> Self {
        EarlyStopping {
            patience: 10,
            max_steps: None,
        }
    }
}

impl EarlyStopping {
    pub fn new(patience: u64) -> Self {
        EarlyStopping {
            patience,
            max_steps: None,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// True once the observer has been stalled for longer than the patience
    pub fn should_stop<C: Classifier>(&self, observer: &Observer<C>, step: u64) -> bool {
        observer.stalled(step) > self.patience
    }

    /// Evaluate the initial classifier at step 0, then repeatedly call
    /// `train` and evaluate at each following step until stalled or out of
    /// steps. Errors from training or evaluation end the loop.
    pub fn run<C, F>(
        &self,
        observer: &mut Observer<C>,
        classifier: &mut C,
        mut train: F,
    ) -> ObserverResult<StopReason>
    where
        C: Classifier,
        F: FnMut(&mut C, u64) -> Result<(), ClassifierError>,
    {
        let mut step = 0;
        observer.evaluate(classifier, step)?;
        log::info!("{}", observer.statistics(step));

        loop {
            if let Some(max_steps) = self.max_steps {
                if step >= max_steps {
                    return Ok(StopReason::MaxSteps { step });
                }
            }

            step += 1;
            train(classifier, step)?;
            observer.evaluate(classifier, step)?;
            log::info!("{}", observer.statistics(step));

            if self.should_stop(observer, step) {
                let best_step = observer.best().map(|b| b.step);
                return Ok(StopReason::Stalled { step, best_step });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::doubles::Constant;
    use crate::data::split::fixtures;
    use crate::observer::monitor::ObserverError;

    #[test]
    fn test_stops_after_patience_exhausted() {
        let mut observer = Observer::new(fixtures::splits());
        let mut classifier = Constant(0.8);
        // Improves for three steps, then gets worse forever
        let schedule = [0.6, 0.4, 0.2];

        let reason = EarlyStopping::new(2)
            .run(&mut observer, &mut classifier, |c, step| {
                c.0 = schedule.get(step as usize - 1).copied().unwrap_or(0.9);
                Ok(())
            })
            .unwrap();

        assert_eq!(reason, StopReason::Stalled {
                step: 6,
                best_step: Some(3)
            });
        assert_eq!(observer.history().len(), 7);
        assert_eq!(observer.best().unwrap().classifier, Constant(0.2));
    }

    #[test]
    fn test_non_finite_training_still_stops() {
        let mut observer = Observer::new(fixtures::splits());
        let mut classifier = Constant(f64::NAN);

        let reason = EarlyStopping::new(3)
            .run(&mut observer, &mut classifier, |_, step| {
                if step > 100 {
                    Err(ClassifierError::Backend("ran past patience".to_string()))
                } else {
                    Ok(())
                }
            })
            .unwrap();

        assert_eq!(
            reason,
            StopReason::Stalled {
                step: 4,
                best_step: None
            }
        );
        assert_eq!(observer.history().len(), 5);
        assert!(observer.best().is_none());
    }

    #[test]
    fn test_stops_at_max_steps() {
        let mut observer = Observer::new(fixtures::splits());
        let mut classifier = Constant(1.0);

        let reason = EarlyStopping::new(100)
            .with_max_steps(4)
            .run(&mut observer, &mut classifier, |c, _| {
                c.0 *= 0.5;
                Ok(())
            })
            .unwrap();

        assert_eq!(reason, StopReason::MaxSteps { step: 4 });
        assert_eq!(observer.history().len(), 5);
        assert_eq!(observer.best().unwrap().step, 4);
    }

    #[test]
    fn test_training_error_ends_loop() {
        let mut observer = Observer::new(fixtures::splits());
        let mut classifier = Constant(0.5);

        let result = EarlyStopping::new(5).run(&mut observer, &mut classifier, |_, step| {
            if step == 2 {
                Err(ClassifierError::Backend("gradient exploded".to_string()))
            } else {
                Ok(())
            }
        });

        assert!(matches!(result, Err(ObserverError::Classifier(_))));
        assert_eq!(observer.history().len(), 2);
    }

    #[test]
    fn test_should_stop() {
        let mut observer = Observer::new(fixtures::splits());
        observer.evaluate(&Constant(0.1), 1).unwrap();
        let policy = EarlyStopping::new(3);

        assert!(!policy.should_stop(&observer, 4));
        assert!(policy.should_stop(&observer, 5));
    }
}
