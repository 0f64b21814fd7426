use crate::data::SampleMatrix;
use crate::genome::decode;
use crate::rules::RuleMatrix;
use crate::schema::FeatureDescriptor;
use crate::search::Objective;
use std::sync::Arc;

/// Predict the class of one sample row.
///
/// A class matches iff every non-absent rule in its rule set is satisfied;
/// absent rules impose no constraint. Multiple classes may match; the
/// lowest class index wins. `None` means unclassified.
pub fn predict_row(matrix: &RuleMatrix, sample: &SampleMatrix, row: usize) -> Option<usize> {
    for class in 0..matrix.num_classes() {
        let matches = matrix
            .class_rules(class)
            .iter()
            .enumerate()
            .all(|(feature, rule)| match rule {
                Some(rule) => rule.matches(&sample.value(row, feature)),
                None => true,
            });
        if matches {
            return Some(class);
        }
    }
    None
}

/// Fraction of the given rows the rule matrix misclassifies, in [0, 1].
///
/// An unclassified row counts as a miss. Lower is better: this is the
/// minimization objective the search algorithms drive toward zero.
pub fn misclassification_rate(
    matrix: &RuleMatrix,
    sample: &SampleMatrix,
    labels: &[usize],
    rows: &[usize],
) -> f64 {
    if rows.is_empty() {
        return 1.0;
    }
    let misses = rows
        .iter()
        .filter(|&&row| predict_row(matrix, sample, row) != Some(labels[row]))
        .count();
    misses as f64 / rows.len() as f64
}

/// The objective function handed to the optimizer.
///
/// Owns immutable shared inputs only, so concurrent evaluation of a
/// population is safe and order-independent.
pub struct FitnessFunction {
    features: Arc<Vec<FeatureDescriptor>>,
    num_classes: usize,
    dimension: usize,
    sample: Arc<SampleMatrix>,
    labels: Arc<Vec<usize>>,
    rows: Vec<usize>,
}

impl FitnessFunction {
    pub fn new(
        features: Arc<Vec<FeatureDescriptor>>,
        num_classes: usize,
        dimension: usize,
        sample: Arc<SampleMatrix>,
        labels: Arc<Vec<usize>>,
        rows: Vec<usize>,
    ) -> Self {
        Self {
            features,
            num_classes,
            dimension,
            sample,
            labels,
            rows,
        }
    }
}

impl Objective for FitnessFunction {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn evaluate(&self, vector: &[f64]) -> f64 {
        // The search only produces vectors of the advertised dimension; a
        // decode failure still must not panic inside the optimizer, so it
        // scores as the worst possible candidate.
        match decode(vector, &self.features, self.num_classes) {
            Ok(matrix) => {
                misclassification_rate(&matrix, &self.sample, &self.labels, &self.rows)
            }
            Err(_) => f64::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::dimensionality;
    use crate::rules::{Rule, RuleMatrix};
    use crate::schema::detect_schema;
    use polars::df;

    fn sample_frame() -> (SampleMatrix, Vec<FeatureDescriptor>) {
        let df = df! {
            "x" => &[3.0, 7.0, 3.0, 12.0],
            "y" => &["a", "b", "b", "a"],
        }
        .unwrap();
        let features = detect_schema(&df).unwrap();
        let sample = SampleMatrix::from_dataframe(&df, &features).unwrap();
        (sample, features)
    }

    fn two_class_matrix() -> RuleMatrix {
        // class 0: x in [2, 5], y unconstrained
        // class 1: x in [6, 9], y == "b"
        RuleMatrix::new(vec![
            vec![Some(Rule::interval(2.0, 5.0)), None],
            vec![Some(Rule::interval(6.0, 9.0)), Some(Rule::category("b"))],
        ])
    }

    #[test]
    fn test_predict_matches_single_class() {
        let (sample, _) = sample_frame();
        let matrix = two_class_matrix();
        assert_eq!(predict_row(&matrix, &sample, 0), Some(0));
        assert_eq!(predict_row(&matrix, &sample, 1), Some(1));
    }

    #[test]
    fn test_predict_unclassified() {
        let (sample, _) = sample_frame();
        let matrix = two_class_matrix();
        // x = 12 satisfies neither interval.
        assert_eq!(predict_row(&matrix, &sample, 3), None);
    }

    #[test]
    fn test_predict_tie_break_lowest_class() {
        let (sample, _) = sample_frame();
        // Both classes accept everything; class 0 wins.
        let matrix = RuleMatrix::new(vec![vec![None, None], vec![None, None]]);
        for row in 0..sample.height() {
            assert_eq!(predict_row(&matrix, &sample, row), Some(0));
        }
    }

    #[test]
    fn test_misclassification_rate() {
        let (sample, _) = sample_frame();
        let matrix = two_class_matrix();
        // True labels: rows 0 and 2 -> class 0, rows 1 and 3 -> class 1.
        let labels = vec![0, 1, 0, 1];
        let rows = vec![0, 1, 2, 3];
        // Row 2 (x=3, y="b") -> class 0, correct. Row 3 (x=12) -> None, miss.
        let rate = misclassification_rate(&matrix, &sample, &labels, &rows);
        assert!((rate - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_fitness_function_is_deterministic() {
        let (sample, features) = sample_frame();
        let num_classes = 2;
        let dimension = dimensionality(&features, num_classes).unwrap();
        let fitness = FitnessFunction::new(
            Arc::new(features),
            num_classes,
            dimension,
            Arc::new(sample),
            Arc::new(vec![0, 1, 0, 1]),
            vec![0, 1, 2, 3],
        );

        let vector = vec![0.5; dimension];
        let first = fitness.evaluate(&vector);
        let second = fitness.evaluate(&vector);
        assert_eq!(first, second);
        assert!((0.0..=1.0).contains(&first));
    }
}
