use std::collections::BTreeSet;

/// A lowercase, whitespace-trimmed skill token.
pub type Skill = String;

/// Skills are kept in a `BTreeSet` so iteration order (and therefore the
/// encoded query text and the serialized output) is always sorted.
pub type SkillSet = BTreeSet<Skill>;

/// Normalizes a single raw skill. Returns `None` for blank input.
pub fn normalize_skill(raw: &str) -> Option<Skill> {
    let skill = raw.trim().to_lowercase();
    if skill.is_empty() {
        None
    } else {
        Some(skill)
    }
}

/// Builds a skill set from user-supplied strings, dropping blanks and duplicates.
pub fn skill_set<I, S>(raw: I) -> SkillSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|s| normalize_skill(s.as_ref()))
        .collect()
}

/// Parses a comma-separated skills cell (`"SQL, Excel,python"`).
pub fn parse_skill_list(cell: &str) -> SkillSet {
    skill_set(cell.split(','))
}

/// Text fed to the feature encoder for a user's skills: sorted, space-joined.
pub fn query_text(skills: &SkillSet) -> String {
    skills.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}
