//! Blog post content items.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use url::Url;

use super::user::{DisplayName, UserId};

/// Format used for the immutable publication date, e.g. `April 05, 2024`.
const PUBLICATION_DATE_FORMAT: &str = "%B %d, %Y";

/// Render a local timestamp as the stored publication date string.
pub fn format_publication_date(moment: DateTime<Local>) -> String {
    moment.format(PUBLICATION_DATE_FORMAT).to_string()
}

/// Validation errors returned by the post component constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("subtitle must not be empty")]
    EmptySubtitle,
    #[error("body must not be empty")]
    EmptyBody,
    #[error("image URL is not a valid absolute URL")]
    InvalidImageUrl,
}

/// Stable numeric post identifier assigned by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i32);

impl PostId {
    /// Wrap a store-assigned identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value, used by persistence adapters and routes.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post image location; must parse as an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Validate an image URL, rejecting relative or unparsable values.
    pub fn new(url: impl Into<String>) -> Result<Self, PostValidationError> {
        let raw = url.into();
        Url::parse(&raw).map_err(|_| PostValidationError::InvalidImageUrl)?;
        Ok(Self(raw))
    }
}

impl AsRef<str> for ImageUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ImageUrl> for String {
    fn from(value: ImageUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImageUrl {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Fields supplied when authoring a new post.
///
/// The publication date is stamped by the blog service, and the author is
/// taken from the authenticated identity, so neither appears here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image_url: ImageUrl,
}

impl PostDraft {
    /// Validate draft fields from raw form inputs.
    pub fn try_from_parts(
        title: &str,
        subtitle: &str,
        body: &str,
        image_url: &str,
    ) -> Result<Self, PostValidationError> {
        let title = validated_text(title, PostValidationError::EmptyTitle)?;
        let subtitle = validated_text(subtitle, PostValidationError::EmptySubtitle)?;
        if body.trim().is_empty() {
            return Err(PostValidationError::EmptyBody);
        }
        Ok(Self {
            title,
            subtitle,
            body: body.to_owned(),
            image_url: ImageUrl::new(image_url)?,
        })
    }
}

fn validated_text(raw: &str, empty: PostValidationError) -> Result<String, PostValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    Ok(trimmed.to_owned())
}

/// Partial update applied by the edit-post operation.
///
/// `None` leaves the stored field untouched. The author name is post-local:
/// editing it renames the byline on this post only, never the underlying
/// account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<ImageUrl>,
    pub author_name: Option<DisplayName>,
}

impl PostChanges {
    /// Validate the text fields of a partial edit.
    ///
    /// Absent fields leave the stored value untouched; present ones follow
    /// the same trim and non-empty rules as a new draft.
    pub fn try_from_text_parts(
        title: Option<&str>,
        subtitle: Option<&str>,
        body: Option<&str>,
    ) -> Result<Self, PostValidationError> {
        let title = title
            .map(|raw| validated_text(raw, PostValidationError::EmptyTitle))
            .transpose()?;
        let subtitle = subtitle
            .map(|raw| validated_text(raw, PostValidationError::EmptySubtitle))
            .transpose()?;
        let body = body
            .map(|raw| {
                if raw.trim().is_empty() {
                    Err(PostValidationError::EmptyBody)
                } else {
                    Ok(raw.to_owned())
                }
            })
            .transpose()?;
        Ok(Self {
            title,
            subtitle,
            body,
            ..Self::default()
        })
    }

    /// Whether the update carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.body.is_none()
            && self.image_url.is_none()
            && self.author_name.is_none()
    }
}

/// Published content item.
///
/// ## Invariants
/// - `title` is unique across the content store.
/// - `date` is stamped at creation and immutable afterwards.
/// - `author_id` references an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub subtitle: String,
    /// Formatted calendar date, e.g. `April 05, 2024`.
    pub date: String,
    pub body: String,
    pub image_url: ImageUrl,
    pub author_id: UserId,
    /// Byline recorded at write time; independent of the account name.
    pub author_name: DisplayName,
}
