//! Rule-based classification driven by nature-inspired search.
//!
//! A metaheuristic optimizer explores the unit hypercube; each candidate
//! vector decodes deterministically into per-class, per-feature matching
//! rules, which are scored by their misclassification rate on a training
//! split. The converged result is an interpretable rule matrix applied at
//! prediction time.

pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod genome;
pub mod rules;
pub mod schema;
pub mod search;

pub use classifier::{FitReport, FittedModel, RuleClassifier};
pub use config::SearchConfig;
pub use error::{EvoClassError, Result};
pub use rules::{Rule, RuleMatrix};
pub use schema::{FeatureDescriptor, FeatureDomain};
pub use search::Algorithm;
