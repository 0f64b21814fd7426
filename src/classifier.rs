use crate::config::SearchConfig;
use crate::data::{encode_labels, train_test_split, SampleMatrix};
use crate::error::{EvoClassError, Result};
use crate::eval::{misclassification_rate, predict_row, FitnessFunction};
use crate::genome::{decode, dimensionality};
use crate::rules::RuleMatrix;
use crate::schema::{detect_schema, FeatureDescriptor};
use crate::search;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Everything a fitted classifier needs to predict: the detected schema,
/// the class index → label mapping, and the decoded rule matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub features: Vec<FeatureDescriptor>,
    pub class_labels: Vec<String>,
    pub matrix: RuleMatrix,
}

/// Summary of one completed fit.
#[derive(Debug, Clone)]
pub struct FitReport {
    /// Search vector length D.
    pub dimensionality: usize,
    /// Objective evaluations actually spent.
    pub evaluations: usize,
    /// Misclassification rate of the best rules on the training split.
    pub train_score: f64,
    /// Misclassification rate on the held-out split, never seen by the
    /// objective loop.
    pub test_score: f64,
}

/// Rule-based classifier whose rules are evolved by nature-inspired search.
pub struct RuleClassifier {
    config: SearchConfig,
    model: Option<FittedModel>,
}

impl RuleClassifier {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            model: None,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: SearchConfig::default(),
            model: None,
        }
    }

    /// Evolve a rule matrix for the samples in `x` labeled by `y`.
    ///
    /// The search runs on a shuffled training split only; the held-out rest
    /// scores the final rules for the report. The fitted model is stored
    /// only after the whole pipeline succeeds, so a failed fit leaves no
    /// partial state behind.
    pub fn fit(&mut self, x: &DataFrame, y: &Series) -> Result<FitReport> {
        if x.height() == 0 {
            return Err(EvoClassError::InvalidInput("dataset is empty".to_string()));
        }
        if y.len() != x.height() {
            return Err(EvoClassError::InvalidInput(format!(
                "{} samples but {} labels",
                x.height(),
                y.len()
            )));
        }

        let features = Arc::new(detect_schema(x)?);
        let (labels, class_labels) = encode_labels(y)?;
        let num_classes = class_labels.len();
        let sample = Arc::new(SampleMatrix::from_dataframe(x, &features)?);
        let labels = Arc::new(labels);

        let d = dimensionality(&features, num_classes)?;
        log::info!(
            "fitting: {} samples, {} features, {} classes, D = {d}",
            x.height(),
            features.len(),
            num_classes
        );

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (train_rows, test_rows) =
            train_test_split(x.height(), self.config.train_fraction, &mut rng)?;

        let objective = FitnessFunction::new(
            Arc::clone(&features),
            num_classes,
            d,
            Arc::clone(&sample),
            Arc::clone(&labels),
            train_rows,
        );
        let outcome = search::run(
            self.config.algorithm,
            &objective,
            self.config.population_size,
            self.config.max_evaluations,
            &mut rng,
        )?;

        let matrix = decode(&outcome.best_vector, &features, num_classes)?;
        let test_score = misclassification_rate(&matrix, &sample, &labels, &test_rows);
        log::info!(
            "search finished: train score {:.4}, held-out score {:.4} ({} evaluations)",
            outcome.best_score,
            test_score,
            outcome.evaluations
        );

        self.model = Some(FittedModel {
            features: features.as_ref().clone(),
            class_labels,
            matrix,
        });

        Ok(FitReport {
            dimensionality: d,
            evaluations: outcome.evaluations,
            train_score: outcome.best_score,
            test_score,
        })
    }

    /// Predict one label per row of `x`, in input order. `None` means no
    /// class's rules matched the sample.
    pub fn predict(&self, x: &DataFrame) -> Result<Vec<Option<String>>> {
        let model = self.model.as_ref().ok_or(EvoClassError::NotFitted)?;
        let sample = SampleMatrix::from_dataframe(x, &model.features)?;

        let predictions = (0..sample.height())
            .map(|row| {
                predict_row(&model.matrix, &sample, row)
                    .map(|class| model.class_labels[class].clone())
            })
            .collect();
        Ok(predictions)
    }

    /// The decoded rules of the fitted model.
    pub fn rule_matrix(&self) -> Result<&RuleMatrix> {
        self.model
            .as_ref()
            .map(|model| &model.matrix)
            .ok_or(EvoClassError::NotFitted)
    }

    pub fn model(&self) -> Option<&FittedModel> {
        self.model.as_ref()
    }

    /// Serialize the fitted model as JSON.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let model = self.model.as_ref().ok_or(EvoClassError::NotFitted)?;
        let json = serde_json::to_string_pretty(model)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Restore a classifier from a model saved by [`Self::save_model`].
    pub fn load_model<P: AsRef<Path>>(config: SearchConfig, path: P) -> Result<Self> {
        config.validate()?;
        let json = std::fs::read_to_string(path)?;
        let model: FittedModel = serde_json::from_str(&json)?;
        Ok(Self {
            config,
            model: Some(model),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_predict_before_fit_is_rejected() {
        let classifier = RuleClassifier::with_defaults();
        let df = df! { "x" => &[1.0] }.unwrap();
        assert!(matches!(
            classifier.predict(&df),
            Err(EvoClassError::NotFitted)
        ));
        assert!(matches!(
            classifier.rule_matrix(),
            Err(EvoClassError::NotFitted)
        ));
    }

    #[test]
    fn test_fit_rejects_empty_and_mismatched_input() {
        let mut classifier = RuleClassifier::with_defaults();

        let empty = df! { "x" => &[] as &[f64] }.unwrap();
        let y = Series::new("class".into(), &[] as &[&str]);
        assert!(matches!(
            classifier.fit(&empty, &y),
            Err(EvoClassError::InvalidInput(_))
        ));

        let df = df! { "x" => &[1.0, 2.0, 3.0] }.unwrap();
        let y = Series::new("class".into(), &["a", "b"]);
        assert!(matches!(
            classifier.fit(&df, &y),
            Err(EvoClassError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected_at_construction() {
        let mut config = SearchConfig::default();
        config.population_size = 1;
        assert!(RuleClassifier::new(config).is_err());
    }
}
