//! Classifier — one independent probabilistic detector per job title.
//!
//! The ranker only consumes a `Prediction`, so any per-title model can sit
//! behind the `Classifier` trait. `AppState` carries it as `Arc<dyn Classifier>`
//! inside the fitted model bundle.
//!
//! Default: `OneVsRestNaiveBayes`, a binary multinomial naive Bayes detector
//! per title with additive smoothing.

use crate::engine::encoder::FeatureVector;
use crate::engine::labels::LabelVector;
use crate::errors::ModelError;

// ────────────────────────────────────────────────────────────────────────────
// Prediction
// ────────────────────────────────────────────────────────────────────────────

/// Per-title probabilities, in the classifier's title order.
/// Values are independent and do not sum to 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prediction {
    scores: Vec<(String, f64)>,
}

impl Prediction {
    /// Later duplicates of a title are ignored.
    pub fn new(scores: Vec<(String, f64)>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let scores = scores
            .into_iter()
            .filter(|(title, _)| seen.insert(title.clone()))
            .collect();
        Self { scores }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(t, p)| (t.as_str(), *p))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

pub trait Classifier: Send + Sync {
    /// Short backend label, surfaced in the model description.
    fn name(&self) -> &'static str;

    /// Titles this classifier scores, in prediction order.
    fn titles(&self) -> &[String];

    fn predict_probabilities(&self, features: &FeatureVector) -> Prediction;
}

// ────────────────────────────────────────────────────────────────────────────
// OneVsRestNaiveBayes
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_ALPHA: f64 = 1.0;

#[derive(Debug, Clone)]
enum Detector {
    /// Training fold had only negatives (0.0) or only positives (1.0).
    Constant(f64),
    Fitted {
        /// [negative, positive]
        log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    },
}

impl Detector {
    fn fit(features: &[FeatureVector], targets: &[bool], dim: usize, alpha: f64) -> Self {
        let positives = targets.iter().filter(|&&t| t).count();
        let rows = targets.len();
        if positives == 0 {
            return Detector::Constant(0.0);
        }
        if positives == rows {
            return Detector::Constant(1.0);
        }

        let mut counts = [vec![0.0_f64; dim], vec![0.0_f64; dim]];
        for (x, &target) in features.iter().zip(targets) {
            let class = usize::from(target);
            for (idx, w) in x.iter().filter(|&(idx, _)| idx < dim) {
                counts[class][idx] += w;
            }
        }

        let class_rows = [(rows - positives) as f64, positives as f64];
        let log_prior = [
            (class_rows[0] / rows as f64).ln(),
            (class_rows[1] / rows as f64).ln(),
        ];

        let feature_log_prob = counts.map(|class_counts| {
            let denom = class_counts.iter().sum::<f64>() + alpha * dim as f64;
            class_counts
                .into_iter()
                .map(|c| ((c + alpha) / denom).ln())
                .collect::<Vec<f64>>()
        });

        Detector::Fitted {
            log_prior,
            feature_log_prob,
        }
    }

    fn probability(&self, x: &FeatureVector) -> f64 {
        match self {
            Detector::Constant(p) => *p,
            Detector::Fitted {
                log_prior,
                feature_log_prob,
            } => {
                let jll = |class: usize| -> f64 {
                    log_prior[class]
                        + x.iter()
                            .filter_map(|(idx, w)| feature_log_prob[class].get(idx).map(|lp| w * lp))
                            .sum::<f64>()
                };
                // softmax over the two classes
                let p = 1.0 / (1.0 + (jll(0) - jll(1)).exp());
                p.clamp(0.0, 1.0)
            }
        }
    }
}

/// One binary multinomial naive Bayes detector per title.
#[derive(Debug, Clone)]
pub struct OneVsRestNaiveBayes {
    titles: Vec<String>,
    detectors: Vec<Detector>,
}

impl OneVsRestNaiveBayes {
    /// Fits one detector per column of `labels`.
    ///
    /// Errors with `InsufficientData` when fewer than two titles are given
    /// or there are no training rows.
    pub fn fit(
        features: &[FeatureVector],
        labels: &[LabelVector],
        titles: Vec<String>,
        dim: usize,
        alpha: f64,
    ) -> Result<Self, ModelError> {
        if titles.len() < 2 {
            return Err(ModelError::InsufficientData(format!(
                "need at least 2 job titles with training examples, found {}",
                titles.len()
            )));
        }
        if features.is_empty() {
            return Err(ModelError::InsufficientData(
                "no training rows left to fit the classifier".to_string(),
            ));
        }
        if features.len() != labels.len() {
            return Err(ModelError::Data(format!(
                "{} feature rows but {} label rows",
                features.len(),
                labels.len()
            )));
        }
        if let Some(x) = features.iter().find(|x| x.dim() != dim) {
            return Err(ModelError::Data(format!(
                "feature vector has dimension {} but the vocabulary has {dim} terms",
                x.dim()
            )));
        }
        if alpha.is_nan() || alpha <= 0.0 {
            return Err(ModelError::Data(format!(
                "smoothing alpha must be positive, got {alpha}"
            )));
        }

        let detectors = (0..titles.len())
            .map(|col| {
                let targets: Vec<bool> = labels
                    .iter()
                    .map(|row| row.get(col).copied().unwrap_or(false))
                    .collect();
                Detector::fit(features, &targets, dim, alpha)
            })
            .collect();

        Ok(Self { titles, detectors })
    }
}

impl Classifier for OneVsRestNaiveBayes {
    fn name(&self) -> &'static str {
        "one_vs_rest_naive_bayes"
    }

    fn titles(&self) -> &[String] {
        &self.titles
    }

    fn predict_probabilities(&self, features: &FeatureVector) -> Prediction {
        Prediction::new(
            self.titles
                .iter()
                .zip(&self.detectors)
                .map(|(title, detector)| (title.clone(), detector.probability(features)))
                .collect(),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
