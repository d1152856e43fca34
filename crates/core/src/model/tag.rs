use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delimiter used by the tabular source for multi-valued cells.
pub const LIST_DELIMITER: char = ';';

/// Separator used when joining multi-valued cells back into text.
pub const LIST_SEPARATOR: &str = "; ";

/// Validated tag name (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    /// Create a validated tag name.
    ///
    /// # Errors
    ///
    /// Returns `TagError::EmptyName` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TagError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TagError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TagName {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.0
    }
}

/// Ordered, deduplicated set of tags.
pub type TagSet = BTreeSet<TagName>;

/// Parse a delimited tag cell (`"PCP; GEN"`) into a set, skipping blank items.
#[must_use]
pub fn parse_tag_list(raw: &str) -> TagSet {
    raw.split(LIST_DELIMITER)
        .filter_map(|item| TagName::new(item).ok())
        .collect()
}

/// Join tags into the delimited text form used by the results sink.
#[must_use]
pub fn join_tags<'a>(tags: impl IntoIterator<Item = &'a TagName>) -> String {
    let distinct: BTreeSet<&str> = tags.into_iter().map(TagName::as_str).collect();
    distinct.into_iter().collect::<Vec<_>>().join(LIST_SEPARATOR)
}

/// True when the two sets share at least one tag.
#[must_use]
pub fn intersects(left: &TagSet, right: &TagSet) -> bool {
    left.iter().any(|tag| right.contains(tag))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TagError {
    #[error("tag name cannot be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> TagName {
        TagName::new(name).unwrap()
    }

    #[test]
    fn tag_name_is_trimmed() {
        assert_eq!(tag("  PCP ").as_str(), "PCP");
        assert_eq!(TagName::new("   ").unwrap_err(), TagError::EmptyName);
    }

    #[test]
    fn parse_tag_list_trims_and_dedups() {
        let tags = parse_tag_list(" PCP ;GEN; ;PCP");
        let names: Vec<_> = tags.iter().map(TagName::as_str).collect();
        assert_eq!(names, vec!["GEN", "PCP"]);
    }

    #[test]
    fn join_tags_is_sorted_and_distinct() {
        let tags = [tag("Heat Transfer"), tag("CHE"), tag("CHE")];
        assert_eq!(join_tags(tags.iter()), "CHE; Heat Transfer");
        assert_eq!(join_tags(std::iter::empty()), "");
    }

    #[test]
    fn intersects_requires_a_shared_tag() {
        let a = parse_tag_list("PCP; GEN");
        let b = parse_tag_list("GEN");
        let c = parse_tag_list("CHE");
        assert!(intersects(&a, &b));
        assert!(!intersects(&a, &c));
        assert!(!intersects(&a, &TagSet::new()));
    }
}
