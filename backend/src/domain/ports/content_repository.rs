//! Port abstraction for the content store (posts and comments).

use async_trait::async_trait;

use crate::domain::comment::{Comment, CommentText};
use crate::domain::post::{BlogPost, ImageUrl, PostChanges, PostId};
use crate::domain::user::{DisplayName, UserId};

/// Persistence errors raised by content store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentPersistenceError {
    /// The referenced post does not exist.
    #[error("post not found")]
    PostNotFound,
    /// The referenced author does not exist; referential integrity holds.
    #[error("referenced user not found")]
    UserNotFound,
    /// Another post already holds this exact title.
    #[error("a post with that title already exists")]
    DuplicateTitle,
    /// Repository connection could not be established.
    #[error("content store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("content store query failed: {message}")]
    Query { message: String },
}

impl ContentPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Fields persisted for a new post.
///
/// The blog service stamps `date` before handing the record over; the store
/// never consults the clock.
#[derive(Debug, Clone)]
pub struct NewPostRecord {
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub image_url: ImageUrl,
    pub author_id: UserId,
    pub author_name: DisplayName,
}

/// Fields persisted for a new comment.
#[derive(Debug, Clone)]
pub struct NewCommentRecord {
    pub post_id: PostId,
    pub author_id: UserId,
    pub author_name: DisplayName,
    pub text: CommentText,
}

/// Driven port for post and comment storage.
///
/// ## Contract
/// - Each method is one transactional unit: it either commits entirely or
///   leaves no visible change.
/// - `create_post` fails with [`ContentPersistenceError::DuplicateTitle`] on
///   a title collision (one winner under concurrency) and with
///   [`ContentPersistenceError::UserNotFound`] for an absent author.
/// - `delete_post` removes the post's comments in the same transaction so
///   no comment can dangle.
/// - Orderings are ascending id, i.e. insertion order.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// All posts, ordered by ascending id.
    async fn list_posts(&self) -> Result<Vec<BlogPost>, ContentPersistenceError>;

    /// Fetch a single post.
    async fn find_post(&self, id: PostId) -> Result<Option<BlogPost>, ContentPersistenceError>;

    /// Persist a new post and return it with its assigned id.
    async fn create_post(&self, record: NewPostRecord)
        -> Result<BlogPost, ContentPersistenceError>;

    /// Apply a partial update and return the stored result.
    async fn update_post(
        &self,
        id: PostId,
        changes: PostChanges,
    ) -> Result<BlogPost, ContentPersistenceError>;

    /// Remove a post and all of its comments.
    async fn delete_post(&self, id: PostId) -> Result<(), ContentPersistenceError>;

    /// Comments on a post, ordered by ascending id.
    ///
    /// Fails with [`ContentPersistenceError::PostNotFound`] when the post
    /// itself is absent.
    async fn comments_for_post(
        &self,
        id: PostId,
    ) -> Result<Vec<Comment>, ContentPersistenceError>;

    /// Persist a new comment and return it with its assigned id.
    async fn add_comment(
        &self,
        record: NewCommentRecord,
    ) -> Result<Comment, ContentPersistenceError>;
}
