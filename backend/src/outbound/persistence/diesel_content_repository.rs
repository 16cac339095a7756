//! PostgreSQL-backed `ContentRepository` implementation using Diesel ORM.
//!
//! Deletion removes a post's comments inside the same transaction as the
//! post row, so a crash between the two statements cannot leave dangling
//! comments behind.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    ContentPersistenceError, ContentRepository, NewCommentRecord, NewPostRecord,
};
use crate::domain::{
    BlogPost, Comment, CommentId, CommentText, DisplayName, ImageUrl, PostChanges, PostId, UserId,
};

use super::models::{CommentRow, NewCommentRow, NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{blog_posts, comments};

/// Diesel-backed implementation of the `ContentRepository` port.
#[derive(Clone)]
pub struct DieselContentRepository {
    pool: DbPool,
}

impl DieselContentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContentPersistenceError {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    ContentPersistenceError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> ContentPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ContentPersistenceError::DuplicateTitle
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            // Constraint names follow the PostgreSQL default of
            // `<table>_<column>_fkey`.
            match info.constraint_name() {
                Some(name) if name.contains("post_id") => ContentPersistenceError::PostNotFound,
                _ => ContentPersistenceError::UserNotFound,
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ContentPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => ContentPersistenceError::PostNotFound,
        _ => ContentPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain post.
fn row_to_post(row: PostRow) -> Result<BlogPost, ContentPersistenceError> {
    let image_url = ImageUrl::new(row.img_url)
        .map_err(|err| ContentPersistenceError::query(format!("corrupt image URL: {err}")))?;
    let author_name = DisplayName::new(row.author_name)
        .map_err(|err| ContentPersistenceError::query(format!("corrupt author name: {err}")))?;
    Ok(BlogPost {
        id: PostId::new(row.id),
        title: row.title,
        subtitle: row.subtitle,
        date: row.date,
        body: row.body,
        image_url,
        author_id: UserId::new(row.author_id),
        author_name,
    })
}

/// Convert a database row to a domain comment.
fn row_to_comment(row: CommentRow) -> Result<Comment, ContentPersistenceError> {
    let author_name = DisplayName::new(row.author_name)
        .map_err(|err| ContentPersistenceError::query(format!("corrupt author name: {err}")))?;
    let text = CommentText::new(row.text)
        .map_err(|err| ContentPersistenceError::query(format!("corrupt comment text: {err}")))?;
    Ok(Comment {
        id: CommentId::new(row.id),
        post_id: PostId::new(row.post_id),
        author_id: UserId::new(row.author_id),
        author_name,
        text,
    })
}

fn changes_to_update(changes: PostChanges) -> PostUpdate {
    PostUpdate {
        title: changes.title,
        subtitle: changes.subtitle,
        body: changes.body,
        img_url: changes.image_url.map(String::from),
        author_name: changes.author_name.map(String::from),
    }
}

#[async_trait]
impl ContentRepository for DieselContentRepository {
    async fn list_posts(&self) -> Result<Vec<BlogPost>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PostRow> = blog_posts::table
            .order(blog_posts::id.asc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_post).collect()
    }

    async fn find_post(&self, id: PostId) -> Result<Option<BlogPost>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PostRow> = blog_posts::table
            .find(id.value())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_post).transpose()
    }

    async fn create_post(
        &self,
        record: NewPostRecord,
    ) -> Result<BlogPost, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewPostRow {
            title: &record.title,
            subtitle: &record.subtitle,
            date: &record.date,
            body: &record.body,
            img_url: record.image_url.as_ref(),
            author_id: record.author_id.value(),
            author_name: record.author_name.as_ref(),
        };

        let row: PostRow = diesel::insert_into(blog_posts::table)
            .values(&new_row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_post(row)
    }

    async fn update_post(
        &self,
        id: PostId,
        changes: PostChanges,
    ) -> Result<BlogPost, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Callers filter out empty change sets; Diesel rejects an update
        // with no columns.
        let row: PostRow = diesel::update(blog_posts::table.find(id.value()))
            .set(changes_to_update(changes))
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_post(row)
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::delete(comments::table.filter(comments::post_id.eq(id.value())))
                    .execute(conn)
                    .await?;

                let deleted = diesel::delete(blog_posts::table.find(id.value()))
                    .execute(conn)
                    .await?;

                if deleted == 0 {
                    return Err(diesel::result::Error::NotFound);
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn comments_for_post(
        &self,
        id: PostId,
    ) -> Result<Vec<Comment>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let post_exists: Option<i32> = blog_posts::table
            .find(id.value())
            .select(blog_posts::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if post_exists.is_none() {
            return Err(ContentPersistenceError::PostNotFound);
        }

        let rows: Vec<CommentRow> = comments::table
            .filter(comments::post_id.eq(id.value()))
            .order(comments::id.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_comment).collect()
    }

    async fn add_comment(
        &self,
        record: NewCommentRecord,
    ) -> Result<Comment, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewCommentRow {
            post_id: record.post_id.value(),
            author_id: record.author_id.value(),
            author_name: record.author_name.as_ref(),
            text: record.text.as_ref(),
        };

        let row: CommentRow = diesel::insert_into(comments::table)
            .values(&new_row)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_comment(row)
    }
}
