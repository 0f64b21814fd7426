use crate::error::{EvoClassError, Result};
use crate::schema::{FeatureDescriptor, FeatureDomain};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

/// Load a CSV file into a DataFrame.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()
        .map_err(|e| EvoClassError::InvalidInput(format!("failed to read CSV: {e}")))?;

    Ok(df)
}

/// A borrowed sample value, typed per the feature's domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Numeric(f64),
    Categorical(&'a str),
}

enum FeatureColumn {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

/// Column-major typed materialization of a DataFrame against a feature
/// schema. Built once per fit/predict call so that scoring performs no
/// polars access and no per-row allocation.
pub struct SampleMatrix {
    columns: Vec<FeatureColumn>,
    height: usize,
}

impl SampleMatrix {
    /// Extract the schema's columns from `df`, resolving them by name.
    pub fn from_dataframe(df: &DataFrame, features: &[FeatureDescriptor]) -> Result<Self> {
        let height = df.height();
        let mut columns = Vec::with_capacity(features.len());

        for feature in features {
            let col = df.column(&feature.name).map_err(|_| {
                EvoClassError::InvalidInput(format!("missing column '{}'", feature.name))
            })?;
            if col.len() != height {
                return Err(EvoClassError::InvalidInput(format!(
                    "column '{}' has {} rows, expected {}",
                    feature.name,
                    col.len(),
                    height
                )));
            }

            match &feature.domain {
                FeatureDomain::Numeric { .. } => {
                    let casted = col.cast(&DataType::Float64)?;
                    let chunked = casted.f64()?;
                    let mut values = Vec::with_capacity(height);
                    for value in chunked.into_iter() {
                        values.push(value.ok_or_else(|| {
                            EvoClassError::InvalidInput(format!(
                                "null value in numeric column '{}'",
                                feature.name
                            ))
                        })?);
                    }
                    columns.push(FeatureColumn::Numeric(values));
                }
                FeatureDomain::Categorical { .. } => {
                    let casted = col.cast(&DataType::String)?;
                    let chunked = casted.str()?;
                    let mut values = Vec::with_capacity(height);
                    for value in chunked.into_iter() {
                        let value = value.ok_or_else(|| {
                            EvoClassError::InvalidInput(format!(
                                "null value in categorical column '{}'",
                                feature.name
                            ))
                        })?;
                        values.push(value.to_string());
                    }
                    columns.push(FeatureColumn::Categorical(values));
                }
            }
        }

        Ok(Self { columns, height })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn value(&self, row: usize, feature: usize) -> FeatureValue<'_> {
        match &self.columns[feature] {
            FeatureColumn::Numeric(values) => FeatureValue::Numeric(values[row]),
            FeatureColumn::Categorical(values) => FeatureValue::Categorical(&values[row]),
        }
    }
}

/// Encode a label series as class indices, in first-seen order of the label
/// values. Returns the per-row indices and the index → label mapping.
pub fn encode_labels(y: &Series) -> Result<(Vec<usize>, Vec<String>)> {
    let casted = y.cast(&DataType::String)?;
    let values = casted.str()?;

    let mut class_labels: Vec<String> = Vec::new();
    let mut encoded = Vec::with_capacity(y.len());
    for value in values.into_iter() {
        let value = value
            .ok_or_else(|| EvoClassError::InvalidInput("null value in labels".to_string()))?;
        let index = match class_labels.iter().position(|l| l == value) {
            Some(index) => index,
            None => {
                class_labels.push(value.to_string());
                class_labels.len() - 1
            }
        };
        encoded.push(index);
    }

    Ok((encoded, class_labels))
}

/// Shuffled partition of row indices `0..n` into train and held-out sets.
pub fn train_test_split<R: Rng>(
    n: usize,
    train_fraction: f64,
    rng: &mut R,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let num_train = (train_fraction * n as f64) as usize;
    if num_train == 0 || num_train == n {
        return Err(EvoClassError::InvalidInput(format!(
            "split of {n} rows at fraction {train_fraction} leaves an empty subset"
        )));
    }

    let test = indices.split_off(num_train);
    Ok((indices, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::detect_schema;
    use polars::df;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_materialize_and_access() {
        let df = df! {
            "x" => &[1.0, 2.0, 3.0],
            "y" => &["a", "b", "a"],
        }
        .unwrap();
        let features = detect_schema(&df).unwrap();
        let matrix = SampleMatrix::from_dataframe(&df, &features).unwrap();

        assert_eq!(matrix.height(), 3);
        assert_eq!(matrix.width(), 2);
        assert_eq!(matrix.value(1, 0), FeatureValue::Numeric(2.0));
        assert_eq!(matrix.value(2, 1), FeatureValue::Categorical("a"));
    }

    #[test]
    fn test_missing_column_rejected() {
        let df = df! { "x" => &[1.0, 2.0] }.unwrap();
        let features = vec![crate::schema::FeatureDescriptor::numeric("z", 0.0, 1.0)];
        assert!(matches!(
            SampleMatrix::from_dataframe(&df, &features),
            Err(EvoClassError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_encode_labels_first_seen_order() {
        let y = Series::new("class".into(), &["spam", "ham", "spam", "other"]);
        let (encoded, labels) = encode_labels(&y).unwrap();
        assert_eq!(labels, vec!["spam", "ham", "other"]);
        assert_eq!(encoded, vec![0, 1, 0, 2]);
    }

    #[test]
    fn test_encode_numeric_labels() {
        let y = Series::new("class".into(), &[1i64, 0, 1]);
        let (encoded, labels) = encode_labels(&y).unwrap();
        assert_eq!(labels, vec!["1", "0"]);
        assert_eq!(encoded, vec![0, 1, 0]);
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let mut rng = StdRng::seed_from_u64(7);
        let (train, test) = train_test_split(10, 0.8, &mut rng).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_degenerate_split_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(train_test_split(3, 0.1, &mut rng).is_err());
        assert!(train_test_split(3, 1.0, &mut rng).is_err());
    }
}
