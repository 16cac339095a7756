//! Reader comments attached to blog posts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::post::PostId;
use super::user::{DisplayName, UserId};

/// Validation errors for comment payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    #[error("comment text must not be empty")]
    EmptyText,
}

/// Stable numeric comment identifier assigned by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i32);

impl CommentId {
    /// Wrap a store-assigned identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value, used by persistence adapters.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated comment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentText(String);

impl CommentText {
    /// Validate comment text, rejecting blank submissions.
    pub fn new(text: impl Into<String>) -> Result<Self, CommentValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        Ok(Self(text))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CommentText> for String {
    fn from(value: CommentText) -> Self {
        value.0
    }
}

impl TryFrom<String> for CommentText {
    type Error = CommentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A reply to a post.
///
/// ## Invariants
/// - `post_id` and `author_id` reference existing records; the store rejects
///   orphans and removes comments when their post is deleted.
/// - Comments are never edited or deleted through any exposed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    /// Byline recorded at write time, like a post's author name.
    pub author_name: DisplayName,
    pub text: CommentText,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_comment_text_is_rejected(#[case] input: &str) {
        let err = CommentText::new(input).expect_err("must fail");
        assert_eq!(err, CommentValidationError::EmptyText);
    }

    #[rstest]
    fn comment_text_keeps_interior_whitespace() {
        let text = CommentText::new("Nice post\n\nreally.").expect("valid text");
        assert_eq!(text.as_ref(), "Nice post\n\nreally.");
    }
}
