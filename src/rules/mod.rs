use crate::data::FeatureValue;
use serde::{Deserialize, Serialize};

/// One feature's matching predicate for one class.
///
/// A feature that imposes no constraint for a class is represented as
/// `Option::<Rule>::None` in the [`RuleMatrix`], not as a Rule variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    /// Closed interval for a numeric feature; `lower <= upper` always holds.
    Interval { lower: f64, upper: f64 },
    /// Exact-value match for a categorical feature.
    Category(String),
}

impl Rule {
    /// Build an interval rule, swapping the endpoints if given out of order.
    pub fn interval(a: f64, b: f64) -> Self {
        if b < a {
            Rule::Interval { lower: b, upper: a }
        } else {
            Rule::Interval { lower: a, upper: b }
        }
    }

    pub fn category(value: impl Into<String>) -> Self {
        Rule::Category(value.into())
    }

    /// Whether a sample value satisfies this rule. A kind mismatch between
    /// rule and value never matches.
    pub fn matches(&self, value: &FeatureValue<'_>) -> bool {
        match (self, value) {
            (Rule::Interval { lower, upper }, FeatureValue::Numeric(v)) => {
                *lower <= *v && *v <= *upper
            }
            (Rule::Category(expected), FeatureValue::Categorical(v)) => expected == v,
            _ => false,
        }
    }
}

/// The decoded classifier: one rule (or absence) per (class, feature) pair.
///
/// Outer index = class, inner index = feature, both in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatrix {
    classes: Vec<Vec<Option<Rule>>>,
}

impl RuleMatrix {
    pub fn new(classes: Vec<Vec<Option<Rule>>>) -> Self {
        Self { classes }
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn num_features(&self) -> usize {
        self.classes.first().map_or(0, Vec::len)
    }

    pub fn rule(&self, class: usize, feature: usize) -> Option<&Rule> {
        self.classes[class][feature].as_ref()
    }

    pub fn class_rules(&self, class: usize) -> &[Option<Rule>] {
        &self.classes[class]
    }
}
