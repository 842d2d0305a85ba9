//! Recommendation Ranker — turns raw per-title probabilities into the final
//! badge list.
//!
//! Pure and bounded: no I/O, no shared mutable state. Identical arguments
//! always produce identical output.

use std::collections::HashSet;

use tracing::debug;

use crate::corpus::index::RequirementMap;
use crate::engine::classifier::Prediction;
use crate::errors::ModelError;
use crate::models::badge::{Badge, SkillInfo};
use crate::models::skill::SkillSet;

struct Candidate<'a> {
    title: &'a str,
    required: &'a SkillSet,
    info: SkillInfo,
}

/// Ranks, filters and deduplicates predicted titles.
///
/// Algorithm:
/// 1. Sort titles by probability, descending (stable: ties keep prediction order)
/// 2. Compute matched/missing skills per title against the requirement map
/// 3. If `required_additional` is non-empty, keep only titles whose missing
///    skills include all of it
/// 4. Walk candidates in order, skipping any whose requirement set equals one
///    already accepted, until `n` are accepted
/// 5. If still short of `n`, backfill from step 3's list in order with any
///    title not yet accepted, duplicate requirement sets allowed
/// 6. Stable-sort the accepted titles by ascending missing-skill count
///
/// Errors with `DataConsistency` when a predicted title has no requirement
/// entry. Every other edge case yields a (possibly empty) list.
pub fn recommend(
    user_skills: &SkillSet,
    required_additional: Option<&SkillSet>,
    n: usize,
    prediction: &Prediction,
    requirements: &RequirementMap,
) -> Result<Vec<Badge>, ModelError> {
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut ranked: Vec<(&str, f64)> = prediction.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut candidates = ranked
        .into_iter()
        .map(|(title, _)| -> Result<Candidate, ModelError> {
            let required = requirements
                .get(title)
                .ok_or_else(|| ModelError::DataConsistency(title.to_string()))?;
            Ok(Candidate {
                title,
                required,
                info: SkillInfo::compute(required, user_skills),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(wanted) = required_additional.filter(|s| !s.is_empty()) {
        candidates.retain(|c| wanted.is_subset(&c.info.missing));
    }

    let mut accepted: Vec<usize> = Vec::with_capacity(n.min(candidates.len()));
    let mut taken = vec![false; candidates.len()];
    let mut seen_requirements: HashSet<&SkillSet> = HashSet::new();

    for (i, candidate) in candidates.iter().enumerate() {
        if accepted.len() >= n {
            break;
        }
        if seen_requirements.insert(candidate.required) {
            accepted.push(i);
            taken[i] = true;
        }
    }

    let distinct = accepted.len();
    if distinct < n {
        for i in 0..candidates.len() {
            if accepted.len() >= n {
                break;
            }
            if !taken[i] {
                accepted.push(i);
                taken[i] = true;
            }
        }
    }

    accepted.sort_by_key(|&i| candidates[i].info.missing_count());

    debug!(
        "Ranked {} candidates into {} badges ({} backfilled)",
        candidates.len(),
        accepted.len(),
        accepted.len() - distinct
    );

    Ok(accepted
        .into_iter()
        .map(|i| Badge {
            job_title: candidates[i].title.to_string(),
            skills: candidates[i].info.clone(),
        })
        .collect())
}
