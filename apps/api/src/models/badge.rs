use serde::Serialize;

use crate::models::skill::SkillSet;

/// Matched/missing breakdown of a title's required skills against a user's skills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillInfo {
    pub matched: SkillSet,
    pub missing: SkillSet,
}

impl SkillInfo {
    /// matched = required ∩ user, missing = required − user
    pub fn compute(required: &SkillSet, user: &SkillSet) -> Self {
        Self {
            matched: required.intersection(user).cloned().collect(),
            missing: required.difference(user).cloned().collect(),
        }
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }
}

/// One recommended job title with its skill breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub job_title: String,
    pub skills: SkillInfo,
}

/// Wire shape of a badge in the `/predict` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    pub job_title: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl From<Badge> for BadgeResponse {
    fn from(badge: Badge) -> Self {
        Self {
            job_title: badge.job_title,
            matched_skills: badge.skills.matched.into_iter().collect(),
            missing_skills: badge.skills.missing.into_iter().collect(),
        }
    }
}
