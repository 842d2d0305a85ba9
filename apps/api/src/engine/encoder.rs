//! Feature Encoder — TF-IDF over a vocabulary fitted once from the corpus.
//!
//! Weighting:
//! - tokens: lowercase runs of two or more word characters
//! - tf: raw term count in the text
//! - idf: `ln((1 + N) / (1 + df)) + 1`  (smoothed, N = fitted documents)
//! - the weighted vector is L2-normalised
//!
//! Vocabulary indices follow lexicographic term order, so the same corpus
//! always yields the same columns and bit-identical vectors.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ModelError;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

/// Sparse fixed-dimension feature vector. Entries are sorted by index and
/// only non-zero weights are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    #[cfg(test)]
    pub fn new(dim: usize, entries: Vec<(usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = entries
            .into_iter()
            .filter(|&(idx, w)| idx < dim && w != 0.0)
            .collect();
        entries.sort_by_key(|&(idx, _)| idx);
        Self { dim, entries }
    }

    #[cfg(test)]
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }
}

#[derive(Debug, Clone)]
pub struct TfidfEncoder {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfEncoder {
    /// Fits vocabulary and IDF weights over the given documents.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self, ModelError> {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<String> = tokenize(doc.as_ref()).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(ModelError::Data(
                "empty vocabulary: corpus skills contain no usable terms".to_string(),
            ));
        }

        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        Ok(Self { vocabulary, idf })
    }

    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    /// Encodes a text. Out-of-vocabulary tokens contribute nothing.
    pub fn transform(&self, text: &str) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let norm = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }

        FeatureVector {
            dim: self.dim(),
            entries,
        }
    }

    pub fn transform_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<FeatureVector> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
}
