// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Content, Assertions, Citations
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TrustError, TrustResult};

/// Raw text under evaluation with its derived size metrics.
///
/// On the wire it is the bare text; the metrics are always recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Content {
    text: String,
    /// Character count (not bytes).
    length: usize,
    /// Whitespace-separated token count.
    word_count: usize,
}

impl Content {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        let word_count = text.split_whitespace().count();
        Self {
            text,
            length,
            word_count,
        }
    }

    /// Build content, rejecting anything with fewer than `min_chars`
    /// non-whitespace-trimmed characters.
    pub fn validated(text: impl Into<String>, min_chars: usize) -> TrustResult<Self> {
        let content = Self::new(text);
        let trimmed = content.text.trim().chars().count();
        if trimmed < min_chars {
            return Err(TrustError::Validation(format!(
                "content must be at least {min_chars} characters long, got {trimmed}"
            )));
        }
        Ok(content)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<Content> for String {
    fn from(content: Content) -> Self {
        content.text
    }
}

/// A sentence-level candidate claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub text: String,
    /// Byte offset of `text` inside the source content, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_offset: Option<usize>,
}

impl Assertion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_offset: None,
        }
    }

    pub fn at(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            source_offset: Some(offset),
        }
    }
}

impl From<&str> for Assertion {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    Url,
    YearRef,
}

impl fmt::Display for CitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url => f.write_str("url"),
            Self::YearRef => f.write_str("year_ref"),
        }
    }
}

/// A reference-pattern match taken as evidence of sourcing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub text: String,
    pub kind: CitationKind,
}

impl Citation {
    pub fn url(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CitationKind::Url,
        }
    }

    pub fn year_ref(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CitationKind::YearRef,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_metrics_count_chars_not_bytes() {
        let c = Content::new("naïve café test");
        assert_eq!(c.length(), 15);
        assert_eq!(c.word_count(), 3);
    }

    #[test]
    fn test_validated_rejects_short_trimmed_text() {
        let err = Content::validated("   short   ", 10).unwrap_err();
        assert!(matches!(err, TrustError::Validation(_)));
    }

    #[test]
    fn test_validated_accepts_ten_chars() {
        assert!(Content::validated("0123456789", 10).is_ok());
    }

    #[test]
    fn test_deserialized_content_recomputes_metrics() {
        let c: Content = serde_json::from_str("\"naïve café test\"").unwrap();
        assert_eq!(c.length(), 15);
        assert_eq!(c.word_count(), 3);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"naïve café test\"");

        let forged = r#"{"text":"two words","length":900,"word_count":77}"#;
        assert!(serde_json::from_str::<Content>(forged).is_err());
    }

    #[test]
    fn test_assertion_offset_skipped_when_absent() {
        let json = serde_json::to_string(&Assertion::new("A claim worth noting")).unwrap();
        assert!(!json.contains("source_offset"));
    }
}
