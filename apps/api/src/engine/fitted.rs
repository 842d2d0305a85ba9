//! Fitted model bundle — everything a request needs, built once and shared
//! read-only.
//!
//! `ModelHandle` holds the current bundle behind an `RwLock<Arc<_>>`. Requests
//! clone the `Arc` and release the lock immediately; a reload fits a complete
//! new bundle off-lock and replaces the pointer in one write, so a request
//! never sees a mix of two generations.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;
use uuid::Uuid;

use crate::corpus::index::RequirementMap;
use crate::corpus::ingest::{load_corpus, CorpusRow};
use crate::engine::classifier::{Classifier, OneVsRestNaiveBayes, Prediction, DEFAULT_ALPHA};
use crate::engine::encoder::TfidfEncoder;
use crate::engine::holdout::{evaluate, split_indices, Evaluation};
use crate::engine::labels::LabelSpace;
use crate::errors::ModelError;
use crate::models::badge::Badge;
use crate::models::skill::{query_text, SkillSet};
use crate::recommendation::ranker::recommend;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Share of rows held out for evaluation, in `[0, 1)`.
    pub holdout_fraction: f64,
    pub split_seed: u64,
    /// Additive smoothing of each naive Bayes detector.
    pub alpha: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            holdout_fraction: 0.2,
            split_seed: 4,
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Description of a fitted generation, returned by `GET /api/v1/model`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub generation: Uuid,
    pub fitted_at: DateTime<Utc>,
    pub classifier: String,
    pub corpus_rows: usize,
    pub indexed_titles: usize,
    pub retained_titles: usize,
    pub dropped_titles: usize,
    pub vocabulary_size: usize,
    pub evaluation: Option<Evaluation>,
}

pub struct FittedModel {
    generation: Uuid,
    fitted_at: DateTime<Utc>,
    requirements: RequirementMap,
    encoder: TfidfEncoder,
    labels: LabelSpace,
    classifier: Arc<dyn Classifier>,
    corpus_rows: usize,
    evaluation: Option<Evaluation>,
}

impl FittedModel {
    /// Full fit sequence: requirement map → encoder → label space → classifier.
    pub fn fit(rows: &[CorpusRow], options: &FitOptions) -> Result<Self, ModelError> {
        let requirements = RequirementMap::build(rows)?;

        let texts: Vec<&str> = rows.iter().map(|r| r.skills_required.as_str()).collect();
        let encoder = TfidfEncoder::fit(&texts)?;
        let features = encoder.transform_all(&texts);

        let row_labels: Vec<Vec<String>> = rows.iter().map(CorpusRow::labels).collect();
        let (labels, matrix) = LabelSpace::fit(&row_labels, requirements.titles());
        if labels.len() < 2 {
            return Err(ModelError::InsufficientData(format!(
                "only {} job title(s) have training examples; at least 2 are required",
                labels.len()
            )));
        }

        let unindexed: Vec<&str> = labels
            .titles()
            .iter()
            .map(String::as_str)
            .filter(|t| !requirements.contains(t))
            .collect();
        if !unindexed.is_empty() {
            return Err(ModelError::Data(format!(
                "job titles appear only in combined title cells and have no requirement entry: {}",
                unindexed.join(", ")
            )));
        }

        let split = split_indices(rows.len(), options.holdout_fraction, options.split_seed);
        let x_train: Vec<_> = split.train.iter().map(|&i| features[i].clone()).collect();
        let y_train: Vec<_> = split.train.iter().map(|&i| matrix[i].clone()).collect();

        let classifier = OneVsRestNaiveBayes::fit(
            &x_train,
            &y_train,
            labels.titles().to_vec(),
            encoder.dim(),
            options.alpha,
        )?;

        let x_test: Vec<_> = split.test.iter().map(|&i| features[i].clone()).collect();
        let y_test: Vec<_> = split.test.iter().map(|&i| matrix[i].clone()).collect();
        let evaluation = evaluate(&classifier, &x_test, &y_test);

        info!(
            "Fitted model: {} rows ({} train / {} held out), {} terms, {} titles ({} dropped)",
            rows.len(),
            split.train.len(),
            split.test.len(),
            encoder.dim(),
            labels.len(),
            labels.dropped().len()
        );
        if let Some(eval) = &evaluation {
            info!(
                "Hold-out evaluation: subset accuracy {:.3}, hamming loss {:.4}",
                eval.subset_accuracy, eval.hamming_loss
            );
        }

        Ok(Self {
            generation: Uuid::new_v4(),
            fitted_at: Utc::now(),
            requirements,
            encoder,
            labels,
            classifier: Arc::new(classifier),
            corpus_rows: rows.len(),
            evaluation,
        })
    }

    /// Assembles a bundle from already-built parts around a synthetic
    /// classifier.
    #[cfg(test)]
    pub fn from_parts(
        requirements: RequirementMap,
        encoder: TfidfEncoder,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            generation: Uuid::new_v4(),
            fitted_at: Utc::now(),
            corpus_rows: 0,
            labels: LabelSpace::from_titles(classifier.titles().to_vec()),
            requirements,
            encoder,
            classifier,
            evaluation: None,
        }
    }

    pub fn generation(&self) -> Uuid {
        self.generation
    }

    #[cfg(test)]
    pub fn requirements(&self) -> &RequirementMap {
        &self.requirements
    }

    #[cfg(test)]
    pub fn label_space(&self) -> &LabelSpace {
        &self.labels
    }

    /// Encodes the user's skills and scores every retained title.
    pub fn predict(&self, user_skills: &SkillSet) -> Prediction {
        let features = self.encoder.transform(&query_text(user_skills));
        self.classifier.predict_probabilities(&features)
    }

    /// Prediction followed by ranking.
    pub fn recommend(
        &self,
        user_skills: &SkillSet,
        required_additional: Option<&SkillSet>,
        n: usize,
    ) -> Result<Vec<Badge>, ModelError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let prediction = self.predict(user_skills);
        recommend(
            user_skills,
            required_additional,
            n,
            &prediction,
            &self.requirements,
        )
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            generation: self.generation,
            fitted_at: self.fitted_at,
            classifier: self.classifier.name().to_string(),
            corpus_rows: self.corpus_rows,
            indexed_titles: self.requirements.len(),
            retained_titles: self.labels.len(),
            dropped_titles: self.labels.dropped().len(),
            vocabulary_size: self.encoder.dim(),
            evaluation: self.evaluation.clone(),
        }
    }
}

/// Loads the corpus at `path` and fits a new bundle. Blocking.
pub fn fit_from_path(path: &Path, options: &FitOptions) -> Result<FittedModel, ModelError> {
    let rows = load_corpus(path)?;
    FittedModel::fit(&rows, options)
}

/// Shared, swappable pointer to the current fitted model.
#[derive(Clone)]
pub struct ModelHandle {
    current: Arc<RwLock<Arc<FittedModel>>>,
    reload: Arc<Mutex<()>>,
}

impl ModelHandle {
    pub fn new(model: FittedModel) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(model))),
            reload: Arc::new(Mutex::new(())),
        }
    }

    /// Snapshot of the generation serving right now.
    pub fn current(&self) -> Arc<FittedModel> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current generation and returns the previous one.
    pub fn swap(&self, model: FittedModel) -> Arc<FittedModel> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, Arc::new(model))
    }

    /// Claims the reload slot; `None` while another reload holds it.
    pub fn try_begin_reload(&self) -> Option<OwnedMutexGuard<()>> {
        self.reload.clone().try_lock_owned().ok()
    }
}
