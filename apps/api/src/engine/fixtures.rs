//! Synthetic fitted state for handler and router tests.

use std::sync::Arc;

use crate::corpus::index::RequirementMap;
use crate::engine::classifier::{Classifier, Prediction};
use crate::engine::encoder::{FeatureVector, TfidfEncoder};
use crate::engine::fitted::FittedModel;
use crate::models::skill::skill_set;

/// Returns the same probabilities for every query.
pub struct FixedClassifier {
    pub titles: Vec<String>,
    pub probabilities: Vec<f64>,
}

impl Classifier for FixedClassifier {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn titles(&self) -> &[String] {
        &self.titles
    }

    fn predict_probabilities(&self, _features: &FeatureVector) -> Prediction {
        Prediction::new(
            self.titles
                .iter()
                .cloned()
                .zip(self.probabilities.iter().copied())
                .collect(),
        )
    }
}

/// Data Analyst {sql, excel, python} at 0.7, Data Scientist
/// {python, statistics, sql} at 0.4.
pub fn data_roles_model() -> FittedModel {
    model_with(&[
        ("Data Analyst", &["sql", "excel", "python"], 0.7),
        ("Data Scientist", &["python", "statistics", "sql"], 0.4),
    ])
}

pub fn model_with(entries: &[(&str, &[&str], f64)]) -> FittedModel {
    let requirements: RequirementMap = entries
        .iter()
        .map(|(title, skills, _)| (title.to_string(), skill_set(skills.iter())))
        .collect();
    let docs: Vec<String> = entries.iter().map(|(_, skills, _)| skills.join(", ")).collect();
    let encoder = TfidfEncoder::fit(&docs).expect("fixture corpus has terms");
    let classifier = FixedClassifier {
        titles: entries.iter().map(|(t, _, _)| t.to_string()).collect(),
        probabilities: entries.iter().map(|(_, _, p)| *p).collect(),
    };
    FittedModel::from_parts(requirements, encoder, Arc::new(classifier))
}
