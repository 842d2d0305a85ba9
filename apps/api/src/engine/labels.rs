use std::collections::{BTreeSet, HashMap};

use tracing::debug;

/// Binary indicator over the retained titles, aligned with `LabelSpace::titles`.
pub type LabelVector = Vec<bool>;

/// Ordered set of job titles the classifier is trained on.
///
/// Column order is lexicographic. Titles with no positive row are dropped
/// before the classifier ever sees them, so they can never be recommended.
#[derive(Debug, Clone, Default)]
pub struct LabelSpace {
    titles: Vec<String>,
    dropped: Vec<String>,
}

impl LabelSpace {
    /// Fits the label space and returns it with the binary label matrix.
    ///
    /// `known_titles` adds candidate columns beyond those observed in the
    /// rows (for example every requirement-map key); any that never occur as
    /// a row label end up in `dropped`.
    pub fn fit<S: AsRef<str>>(
        row_labels: &[Vec<String>],
        known_titles: impl IntoIterator<Item = S>,
    ) -> (Self, Vec<LabelVector>) {
        let classes: Vec<String> = row_labels
            .iter()
            .flatten()
            .cloned()
            .chain(known_titles.into_iter().map(|t| t.as_ref().to_string()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let class_index: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let full: Vec<LabelVector> = row_labels
            .iter()
            .map(|labels| {
                let mut row = vec![false; classes.len()];
                for label in labels {
                    if let Some(&i) = class_index.get(label.as_str()) {
                        row[i] = true;
                    }
                }
                row
            })
            .collect();

        let keep: Vec<bool> = (0..classes.len())
            .map(|col| full.iter().any(|row| row[col]))
            .collect();

        let mut titles = Vec::new();
        let mut dropped = Vec::new();
        for (class, &kept) in classes.into_iter().zip(&keep) {
            if kept {
                titles.push(class);
            } else {
                dropped.push(class);
            }
        }
        if !dropped.is_empty() {
            debug!("Dropping {} titles with no positive rows", dropped.len());
        }

        let matrix = full
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&keep)
                    .filter_map(|(v, &k)| k.then_some(v))
                    .collect()
            })
            .collect();

        (Self { titles, dropped }, matrix)
    }

    /// Label space over an explicit, already-filtered title list.
    #[cfg(test)]
    pub fn from_titles(titles: Vec<String>) -> Self {
        Self {
            titles,
            dropped: Vec::new(),
        }
    }

    /// Retained titles, in column order.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Titles that were seen but had no positive training row.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_columns_are_sorted_and_deduplicated() {
        let rows = labels(&[&["Data Scientist"], &["Data Analyst"], &["Data Scientist"]]);
        let (space, matrix) = LabelSpace::fit(&rows, Vec::<String>::new());
        assert_eq!(space.titles(), &["Data Analyst", "Data Scientist"]);
        assert_eq!(matrix, vec![vec![false, true], vec![true, false], vec![false, true]]);
    }

    #[test]
    fn test_multi_label_rows() {
        let rows = labels(&[&["Data Analyst", "BI Developer"], &["Data Analyst"]]);
        let (space, matrix) = LabelSpace::fit(&rows, Vec::<String>::new());
        assert_eq!(space.titles(), &["BI Developer", "Data Analyst"]);
        assert_eq!(matrix[0], vec![true, true]);
        assert_eq!(matrix[1], vec![false, true]);
    }

    #[test]
    fn test_all_zero_columns_dropped() {
        let rows = labels(&[&["Data Analyst"], &["Data Scientist"]]);
        let (space, matrix) =
            LabelSpace::fit(&rows, ["Data Analyst, Data Scientist", "Data Analyst"]);
        assert_eq!(space.titles(), &["Data Analyst", "Data Scientist"]);
        assert_eq!(space.dropped(), &["Data Analyst, Data Scientist"]);
        assert!(matrix.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_known_titles_without_rows_are_all_dropped() {
        let (space, matrix) = LabelSpace::fit(&[], ["Data Analyst", "Rust Engineer"]);
        assert_eq!(space.len(), 0);
        assert_eq!(space.dropped(), &["Data Analyst", "Rust Engineer"]);
        assert!(matrix.is_empty());
    }
}
