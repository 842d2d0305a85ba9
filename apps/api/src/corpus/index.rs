use std::collections::HashMap;

use crate::corpus::ingest::CorpusRow;
use crate::errors::ModelError;
use crate::models::skill::{parse_skill_list, SkillSet};

/// Job title → full set of required skills, unioned across duplicate titles.
/// Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RequirementMap {
    requirements: HashMap<String, SkillSet>,
}

impl RequirementMap {
    /// Builds the map from corpus rows. Every row must carry at least one skill.
    pub fn build(rows: &[CorpusRow]) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::Data("cannot index an empty corpus".to_string()));
        }

        let mut requirements: HashMap<String, SkillSet> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            let skills = parse_skill_list(&row.skills_required);
            if skills.is_empty() {
                return Err(ModelError::Data(format!(
                    "row {}: '{}' has no skills",
                    i + 1,
                    row.job_title
                )));
            }
            requirements
                .entry(row.job_title.clone())
                .or_default()
                .extend(skills);
        }

        Ok(Self { requirements })
    }

    pub fn get(&self, job_title: &str) -> Option<&SkillSet> {
        self.requirements.get(job_title)
    }

    pub fn contains(&self, job_title: &str) -> bool {
        self.requirements.contains_key(job_title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.requirements.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }
}

#[cfg(test)]
impl FromIterator<(String, SkillSet)> for RequirementMap {
    fn from_iter<T: IntoIterator<Item = (String, SkillSet)>>(iter: T) -> Self {
        let mut requirements: HashMap<String, SkillSet> = HashMap::new();
        for (title, skills) in iter {
            requirements.entry(title).or_default().extend(skills);
        }
        Self { requirements }
    }
}
