use crate::error::{EvoClassError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Value domain of one input column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureDomain {
    Numeric { min: f64, max: f64 },
    Categorical { values: Vec<String> },
}

/// Immutable per-column metadata, computed once before the search starts.
///
/// The order of descriptors returned by [`detect_schema`] is the canonical
/// feature order: the dimensionality formula, the gene cursor and the rule
/// matrix all index features by position in this sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    pub name: String,
    pub domain: FeatureDomain,
}

impl FeatureDescriptor {
    pub fn numeric(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            domain: FeatureDomain::Numeric { min, max },
        }
    }

    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            domain: FeatureDomain::Categorical {
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }
}

/// Classify every column of `df` as numeric or categorical.
///
/// Numeric columns record their min/max; string and boolean columns record
/// their distinct values in first-occurrence order. That order matters: the
/// decoder's bin index selects a category by position.
pub fn detect_schema(df: &DataFrame) -> Result<Vec<FeatureDescriptor>> {
    if df.width() == 0 || df.height() == 0 {
        return Err(EvoClassError::InvalidSchema(
            "dataset has no columns or no rows".to_string(),
        ));
    }

    let mut features = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let name = col.name().to_string();
        match col.dtype() {
            DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8 => {
                let casted = col.cast(&DataType::Float64)?;
                let values = casted.f64()?;
                let min = values.min().ok_or_else(|| {
                    EvoClassError::InvalidSchema(format!("column '{name}' has no values"))
                })?;
                let max = values.max().ok_or_else(|| {
                    EvoClassError::InvalidSchema(format!("column '{name}' has no values"))
                })?;
                features.push(FeatureDescriptor::numeric(name, min, max));
            }
            DataType::String | DataType::Boolean => {
                let casted = col.cast(&DataType::String)?;
                let values = casted.str()?;
                let mut distinct: Vec<String> = Vec::new();
                for value in values.into_iter() {
                    let value = value.ok_or_else(|| {
                        EvoClassError::InvalidSchema(format!(
                            "column '{name}' contains null values"
                        ))
                    })?;
                    if !distinct.iter().any(|v| v == value) {
                        distinct.push(value.to_string());
                    }
                }
                features.push(FeatureDescriptor::categorical(name, distinct));
            }
            other => {
                return Err(EvoClassError::InvalidSchema(format!(
                    "column '{name}' has unsupported dtype {other:?}"
                )));
            }
        }
    }

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_detect_mixed_schema() {
        let df = df! {
            "age" => &[31.0, 45.0, 22.0],
            "color" => &["red", "blue", "red"],
        }
        .unwrap();

        let features = detect_schema(&df).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(
            features[0],
            FeatureDescriptor::numeric("age", 22.0, 45.0)
        );
        assert_eq!(
            features[1],
            FeatureDescriptor::categorical("color", ["red", "blue"])
        );
    }

    #[test]
    fn test_categorical_order_is_first_seen() {
        let df = df! {
            "label" => &["b", "a", "c", "a", "b"],
        }
        .unwrap();

        let features = detect_schema(&df).unwrap();
        match &features[0].domain {
            FeatureDomain::Categorical { values } => {
                assert_eq!(values, &["b", "a", "c"]);
            }
            _ => panic!("expected categorical"),
        }
    }

    #[test]
    fn test_integer_column_is_numeric() {
        let df = df! {
            "count" => &[3i64, 7, 5],
        }
        .unwrap();

        let features = detect_schema(&df).unwrap();
        assert_eq!(features[0], FeatureDescriptor::numeric("count", 3.0, 7.0));
    }

    #[test]
    fn test_empty_frame_rejected() {
        let df = DataFrame::empty();
        assert!(matches!(
            detect_schema(&df),
            Err(EvoClassError::InvalidSchema(_))
        ));
    }
}
