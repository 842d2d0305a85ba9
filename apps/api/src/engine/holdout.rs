//! Hold-out split and evaluation of a fitted classifier.
//!
//! Rows are shuffled with a seeded `StdRng`, so the same corpus, fraction and
//! seed always produce the same split. Evaluation is informational only; the
//! ranker never depends on it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::engine::classifier::Classifier;
use crate::engine::encoder::FeatureVector;
use crate::engine::labels::LabelVector;

/// A title counts as predicted when its probability exceeds this.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldoutSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Splits `rows` indices into train/test. `ceil(fraction * rows)` rows are
/// held out, capped so at least one row is left to train on.
pub fn split_indices(rows: usize, fraction: f64, seed: u64) -> HoldoutSplit {
    if rows < 2 || fraction <= 0.0 {
        return HoldoutSplit {
            train: (0..rows).collect(),
            test: Vec::new(),
        };
    }

    let n_test = ((fraction * rows as f64).ceil() as usize).min(rows - 1);

    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut test = indices[..n_test].to_vec();
    let mut train = indices[n_test..].to_vec();
    test.sort_unstable();
    train.sort_unstable();
    HoldoutSplit { train, test }
}

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub rows: usize,
    /// Share of rows whose predicted title set equals the true one.
    pub subset_accuracy: f64,
    /// Share of (row, title) cells predicted wrongly.
    pub hamming_loss: f64,
}

/// Scores `classifier` on held-out rows. Returns `None` when there are none.
pub fn evaluate(
    classifier: &dyn Classifier,
    features: &[FeatureVector],
    labels: &[LabelVector],
) -> Option<Evaluation> {
    if features.is_empty() || features.len() != labels.len() {
        return None;
    }

    let n_titles = classifier.titles().len();
    let mut exact = 0usize;
    let mut wrong_cells = 0usize;

    for (x, truth) in features.iter().zip(labels) {
        let predicted: Vec<bool> = classifier
            .predict_probabilities(x)
            .iter()
            .map(|(_, p)| p > DECISION_THRESHOLD)
            .collect();
        let wrong = predicted
            .iter()
            .zip(truth)
            .filter(|(p, t)| p != t)
            .count();
        if wrong == 0 {
            exact += 1;
        }
        wrong_cells += wrong;
    }

    let rows = features.len();
    Some(Evaluation {
        rows,
        subset_accuracy: exact as f64 / rows as f64,
        hamming_loss: if n_titles == 0 {
            0.0
        } else {
            wrong_cells as f64 / (rows * n_titles) as f64
        },
    })
}
