//! Tag model and title normalization
//!
//! Titles are stored lowercase; `TagTitle` is the only way in.

use serde::{Deserialize, Serialize};

use super::validation::{check_length, ValidationError};

/// Maximum length for tag titles
pub const MAX_TAG_TITLE_LEN: usize = 20;

/// Validated, lowercase tag title
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagTitle(String);

impl TagTitle {
    /// Create a tag title, trimming and lowercasing the input.
    ///
    /// # Example
    /// ```
    /// use blogctl_server::models::TagTitle;
    ///
    /// assert_eq!(TagTitle::new("  News ").unwrap().as_str(), "news");
    /// assert!(TagTitle::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let normalized = s.trim().to_lowercase();
        check_length("tag title", &normalized, MAX_TAG_TITLE_LEN)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for TagTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Tag record. `posts_count` is only present when the query that loaded
/// the tag aggregated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts_count: Option<i64>,
}

impl Tag {
    /// Route of the tag-filter page for this tag
    pub fn absolute_url(&self) -> String {
        format!("/tag/{}", path_segment(&self.title))
    }
}

/// Percent-encode a tag title for use as one URL path segment.
///
/// Titles may hold `/`, `#`, `?` or spaces; the router decodes the segment
/// back to the stored title.
pub fn path_segment(title: &str) -> String {
    urlencoding::encode(title).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_any_input() {
        for raw in ["NEWS", "News", "nEwS", "news"] {
            assert_eq!(TagTitle::new(raw).unwrap().as_str(), "news");
        }
        assert_eq!(TagTitle::new("ПРИРОДА").unwrap().as_str(), "природа");
    }

    #[test]
    fn rejects_empty() {
        let err = TagTitle::new("   ").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn max_length() {
        assert!(TagTitle::new(&"a".repeat(MAX_TAG_TITLE_LEN)).is_ok());
        let err = TagTitle::new(&"a".repeat(MAX_TAG_TITLE_LEN + 1)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 20, .. }));
    }

    #[test]
    fn absolute_url_uses_title() {
        let tag = Tag {
            id: 1,
            title: "rust".into(),
            posts_count: None,
        };
        assert_eq!(tag.absolute_url(), "/tag/rust");
    }

    #[test]
    fn absolute_url_encodes_reserved_characters() {
        let tag = Tag {
            id: 1,
            title: TagTitle::new("CI/CD #1").unwrap().into_string(),
            posts_count: None,
        };
        assert_eq!(tag.absolute_url(), "/tag/ci%2Fcd%20%231");
        assert_eq!(path_segment("c#"), "c%23");
    }
}
