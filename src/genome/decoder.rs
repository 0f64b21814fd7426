use crate::error::{EvoClassError, Result};
use crate::genome::GeneCursor;
use crate::rules::{Rule, RuleMatrix};
use crate::schema::{FeatureDescriptor, FeatureDomain};

/// Length D of the search vector for a given schema and class count.
///
/// One reserved slot for the activation threshold, then per feature: one
/// activation gene plus, per class, two interval-endpoint genes (numeric)
/// or one value-selector gene (categorical).
pub fn dimensionality(features: &[FeatureDescriptor], num_classes: usize) -> Result<usize> {
    if num_classes < 1 {
        return Err(EvoClassError::InvalidSchema(
            "at least one class is required".to_string(),
        ));
    }
    if features.is_empty() {
        return Err(EvoClassError::InvalidSchema(
            "feature list is empty".to_string(),
        ));
    }

    let mut d = 1;
    for feature in features {
        d += match feature.domain {
            FeatureDomain::Numeric { .. } => 1 + 2 * num_classes,
            FeatureDomain::Categorical { .. } => 1 + num_classes,
        };
    }
    Ok(d)
}

/// Index of `value`'s bin among `num_bins` equal-width bins over [0, 1].
///
/// The upper boundary `value == 1.0` falls into the last bin.
pub fn bin_index(value: f64, num_bins: usize) -> Result<usize> {
    if num_bins == 0 {
        return Err(EvoClassError::InvalidDomain(
            "bin count must be positive".to_string(),
        ));
    }
    let index = (value / (1.0 / num_bins as f64)).floor() as usize;
    Ok(index.min(num_bins - 1))
}

/// Decode a search vector into a per-class, per-feature rule matrix.
///
/// The last element of `vector` is the activation threshold θ. Each feature
/// consumes one activation gene, shared across classes; a feature is active
/// iff that gene is >= θ (boundary inclusive). The per-(feature, class)
/// genes are consumed whether or not the feature is active, so the cursor
/// stays aligned with the layout [`dimensionality`] describes. Inactive
/// (class, feature) slots hold `None`.
///
/// Numeric genes map to bounds via `gene * (max - min) + min`, ordered so
/// the decoded interval always satisfies `lower <= upper`. A categorical
/// gene is bin-indexed over the feature's value list.
///
/// Pure and deterministic: the same vector and schema always decode to the
/// same matrix.
pub fn decode(
    vector: &[f64],
    features: &[FeatureDescriptor],
    num_classes: usize,
) -> Result<RuleMatrix> {
    let expected = dimensionality(features, num_classes)?;
    if vector.len() != expected {
        return Err(EvoClassError::InvalidVectorLength {
            expected,
            actual: vector.len(),
        });
    }

    let threshold = vector[vector.len() - 1];
    let mut cursor = GeneCursor::new(vector);
    let mut classes: Vec<Vec<Option<Rule>>> =
        vec![Vec::with_capacity(features.len()); num_classes];

    for feature in features {
        let activation = cursor.consume();
        for class_rules in classes.iter_mut() {
            let active = activation >= threshold;
            let rule = match &feature.domain {
                FeatureDomain::Numeric { min, max } => {
                    let a = cursor.consume();
                    let b = cursor.consume();
                    if active {
                        let v1 = a * (max - min) + min;
                        let v2 = b * (max - min) + min;
                        Some(Rule::interval(v1, v2))
                    } else {
                        None
                    }
                }
                FeatureDomain::Categorical { values } => {
                    let gene = cursor.consume();
                    if active {
                        let index = bin_index(gene, values.len())?;
                        Some(Rule::category(values[index].clone()))
                    } else {
                        None
                    }
                }
            };
            class_rules.push(rule);
        }
    }

    Ok(RuleMatrix::new(classes))
}
