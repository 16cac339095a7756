//! Blog content use-cases, gated by the authorization policy.
//!
//! Every mutating method takes the caller's [`Identity`] explicitly and runs
//! its gate before touching the content store.

use std::sync::Arc;

use tracing::info;

use super::comment::{Comment, CommentText};
use super::error::Error;
use super::identity::{require_admin, require_authenticated, Identity};
use super::ports::{
    Clock, ContentPersistenceError, ContentRepository, NewCommentRecord, NewPostRecord,
};
use super::post::{format_publication_date, BlogPost, PostChanges, PostDraft, PostId};

fn map_persistence_error(error: ContentPersistenceError) -> Error {
    match error {
        ContentPersistenceError::PostNotFound => Error::not_found("post not found"),
        ContentPersistenceError::UserNotFound => Error::not_found("referenced user not found"),
        ContentPersistenceError::DuplicateTitle => {
            Error::conflict("a post with that title already exists")
                .with_details(serde_json::json!({ "field": "title" }))
        }
        ContentPersistenceError::Connection { message } => Error::service_unavailable(message),
        ContentPersistenceError::Query { message } => Error::internal(message),
    }
}

/// Post and comment use-cases over the content store.
#[derive(Clone)]
pub struct BlogService {
    content: Arc<dyn ContentRepository>,
    clock: Arc<dyn Clock>,
}

impl BlogService {
    /// Create a service backed by the given content store and clock.
    pub fn new(content: Arc<dyn ContentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { content, clock }
    }

    /// All posts in insertion order. Open to anonymous callers.
    pub async fn list_posts(&self) -> Result<Vec<BlogPost>, Error> {
        self.content
            .list_posts()
            .await
            .map_err(map_persistence_error)
    }

    /// A single post. Open to anonymous callers.
    pub async fn get_post(&self, id: PostId) -> Result<BlogPost, Error> {
        self.content
            .find_post(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("post not found"))
    }

    /// Create a post. Admin only.
    ///
    /// Stamps today's date from the injected clock and records the caller's
    /// display name as the byline.
    pub async fn create_post(
        &self,
        identity: &Identity,
        draft: PostDraft,
    ) -> Result<BlogPost, Error> {
        let author = require_admin(identity)?;
        let record = NewPostRecord {
            title: draft.title,
            subtitle: draft.subtitle,
            date: format_publication_date(self.clock.now()),
            body: draft.body,
            image_url: draft.image_url,
            author_id: author.id(),
            author_name: author.name().clone(),
        };
        let post = self
            .content
            .create_post(record)
            .await
            .map_err(map_persistence_error)?;
        info!(post_id = %post.id, "post created");
        Ok(post)
    }

    /// Apply a partial edit. Admin only.
    ///
    /// The byline change, when present, is post-local: the underlying
    /// account keeps its name.
    pub async fn update_post(
        &self,
        identity: &Identity,
        id: PostId,
        changes: PostChanges,
    ) -> Result<BlogPost, Error> {
        require_admin(identity)?;
        if changes.is_empty() {
            return self.get_post(id).await;
        }
        let post = self
            .content
            .update_post(id, changes)
            .await
            .map_err(map_persistence_error)?;
        info!(post_id = %post.id, "post updated");
        Ok(post)
    }

    /// Delete a post and its comments. Admin only.
    pub async fn delete_post(&self, identity: &Identity, id: PostId) -> Result<(), Error> {
        require_admin(identity)?;
        self.content
            .delete_post(id)
            .await
            .map_err(map_persistence_error)?;
        info!(post_id = %id, "post deleted");
        Ok(())
    }

    /// Comments on a post in insertion order. Open to anonymous callers.
    pub async fn comments_for_post(&self, id: PostId) -> Result<Vec<Comment>, Error> {
        self.content
            .comments_for_post(id)
            .await
            .map_err(map_persistence_error)
    }

    /// Add a comment. Any authenticated user.
    pub async fn add_comment(
        &self,
        identity: &Identity,
        post_id: PostId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        let author = require_authenticated(identity)?;
        let record = NewCommentRecord {
            post_id,
            author_id: author.id(),
            author_name: author.name().clone(),
            text,
        };
        let comment = self
            .content
            .add_comment(record)
            .await
            .map_err(map_persistence_error)?;
        info!(post_id = %post_id, comment_id = %comment.id, "comment added");
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    //! Gate ordering and error mapping coverage against a stub store.
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::domain::password::PasswordHash;
    use crate::domain::post::ImageUrl;
    use crate::domain::user::{DisplayName, EmailAddress, User, UserId};
    use crate::domain::ErrorCode;
    use async_trait::async_trait;
    use chrono::{Local, TimeZone};
    use rstest::rstest;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> chrono::DateTime<Local> {
            Local
                .with_ymd_and_hms(2024, 4, 5, 9, 30, 0)
                .single()
                .expect("unambiguous local time")
        }
    }

    #[derive(Default)]
    struct StubContentRepository {
        state: Mutex<StubState>,
        mutation_calls: AtomicUsize,
    }

    #[derive(Default)]
    struct StubState {
        posts: Vec<BlogPost>,
        comments: Vec<Comment>,
        fail_with: Option<ContentPersistenceError>,
    }

    impl StubContentRepository {
        fn set_failure(&self, failure: ContentPersistenceError) {
            self.state.lock().expect("state lock").fail_with = Some(failure);
        }

        fn mutation_count(&self) -> usize {
            self.mutation_calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl ContentRepository for StubContentRepository {
        async fn list_posts(&self) -> Result<Vec<BlogPost>, ContentPersistenceError> {
            Ok(self.state.lock().expect("state lock").posts.clone())
        }

        async fn find_post(
            &self,
            id: PostId,
        ) -> Result<Option<BlogPost>, ContentPersistenceError> {
            let state = self.state.lock().expect("state lock");
            Ok(state.posts.iter().find(|p| p.id == id).cloned())
        }

        async fn create_post(
            &self,
            record: NewPostRecord,
        ) -> Result<BlogPost, ContentPersistenceError> {
            self.mutation_calls.fetch_add(1, Ordering::Relaxed);
            let mut state = self.state.lock().expect("state lock");
            if let Some(failure) = state.fail_with.clone() {
                return Err(failure);
            }
            if state.posts.iter().any(|p| p.title == record.title) {
                return Err(ContentPersistenceError::DuplicateTitle);
            }
            let post = BlogPost {
                id: PostId::new(i32::try_from(state.posts.len()).expect("small") + 1),
                title: record.title,
                subtitle: record.subtitle,
                date: record.date,
                body: record.body,
                image_url: record.image_url,
                author_id: record.author_id,
                author_name: record.author_name,
            };
            state.posts.push(post.clone());
            Ok(post)
        }

        async fn update_post(
            &self,
            id: PostId,
            changes: PostChanges,
        ) -> Result<BlogPost, ContentPersistenceError> {
            self.mutation_calls.fetch_add(1, Ordering::Relaxed);
            let mut state = self.state.lock().expect("state lock");
            let post = state
                .posts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(ContentPersistenceError::PostNotFound)?;
            if let Some(title) = changes.title {
                post.title = title;
            }
            if let Some(subtitle) = changes.subtitle {
                post.subtitle = subtitle;
            }
            if let Some(body) = changes.body {
                post.body = body;
            }
            if let Some(image_url) = changes.image_url {
                post.image_url = image_url;
            }
            if let Some(author_name) = changes.author_name {
                post.author_name = author_name;
            }
            Ok(post.clone())
        }

        async fn delete_post(&self, id: PostId) -> Result<(), ContentPersistenceError> {
            self.mutation_calls.fetch_add(1, Ordering::Relaxed);
            let mut state = self.state.lock().expect("state lock");
            if !state.posts.iter().any(|p| p.id == id) {
                return Err(ContentPersistenceError::PostNotFound);
            }
            state.posts.retain(|p| p.id != id);
            state.comments.retain(|c| c.post_id != id);
            Ok(())
        }

        async fn comments_for_post(
            &self,
            id: PostId,
        ) -> Result<Vec<Comment>, ContentPersistenceError> {
            let state = self.state.lock().expect("state lock");
            if !state.posts.iter().any(|p| p.id == id) {
                return Err(ContentPersistenceError::PostNotFound);
            }
            Ok(state
                .comments
                .iter()
                .filter(|c| c.post_id == id)
                .cloned()
                .collect())
        }

        async fn add_comment(
            &self,
            record: NewCommentRecord,
        ) -> Result<Comment, ContentPersistenceError> {
            self.mutation_calls.fetch_add(1, Ordering::Relaxed);
            let mut state = self.state.lock().expect("state lock");
            if !state.posts.iter().any(|p| p.id == record.post_id) {
                return Err(ContentPersistenceError::PostNotFound);
            }
            let comment = Comment {
                id: crate::domain::comment::CommentId::new(
                    i32::try_from(state.comments.len()).expect("small") + 1,
                ),
                post_id: record.post_id,
                author_id: record.author_id,
                author_name: record.author_name,
                text: record.text,
            };
            state.comments.push(comment.clone());
            Ok(comment)
        }
    }

    fn user(id: i32, name: &str, admin: bool) -> Identity {
        Identity::User(User::new(
            UserId::new(id),
            DisplayName::new(name).expect("valid name"),
            EmailAddress::new(format!("user{id}@example.com")).expect("valid email"),
            PasswordHash::from_stored("$pbkdf2-sha256$unused"),
            admin,
        ))
    }

    fn service() -> (Arc<StubContentRepository>, BlogService) {
        let repository = Arc::new(StubContentRepository::default());
        let service = BlogService::new(repository.clone(), Arc::new(FixedClock));
        (repository, service)
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_owned(),
            subtitle: "Sub".to_owned(),
            body: "Body".to_owned(),
            image_url: ImageUrl::new("https://img.example/a.jpg").expect("valid url"),
        }
    }

    #[tokio::test]
    async fn create_post_stamps_date_and_byline() {
        let (_, service) = service();
        let admin = user(1, "Ada Lovelace", true);

        let post = service
            .create_post(&admin, draft("Hello"))
            .await
            .expect("admin creates post");

        assert_eq!(post.date, "April 05, 2024");
        assert_eq!(post.author_name.as_ref(), "Ada Lovelace");
        assert_eq!(post.author_id, UserId::new(1));

        let fetched = service.get_post(post.id).await.expect("post readable");
        assert_eq!(fetched, post);
    }

    #[rstest]
    #[case(Identity::Anonymous, ErrorCode::Unauthorized)]
    #[case(user(2, "Bob", false), ErrorCode::Forbidden)]
    #[tokio::test]
    async fn gates_run_before_any_mutation(
        #[case] identity: Identity,
        #[case] expected: ErrorCode,
    ) {
        let (repository, service) = service();

        let create = service
            .create_post(&identity, draft("Hello"))
            .await
            .expect_err("gate must fail");
        let update = service
            .update_post(&identity, PostId::new(1), PostChanges::default())
            .await
            .expect_err("gate must fail");
        let delete = service
            .delete_post(&identity, PostId::new(1))
            .await
            .expect_err("gate must fail");

        assert_eq!(create.code(), expected);
        assert_eq!(update.code(), expected);
        assert_eq!(delete.code(), expected);
        assert_eq!(repository.mutation_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_title_maps_to_conflict() {
        let (_, service) = service();
        let admin = user(1, "Ada", true);
        service
            .create_post(&admin, draft("Hello"))
            .await
            .expect("first post succeeds");

        let err = service
            .create_post(&admin, draft("Hello"))
            .await
            .expect_err("duplicate title must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn editing_the_byline_does_not_touch_the_account() {
        let (_, service) = service();
        let admin = user(1, "Ada Lovelace", true);
        let post = service
            .create_post(&admin, draft("Hello"))
            .await
            .expect("post created");

        let updated = service
            .update_post(
                &admin,
                post.id,
                PostChanges {
                    author_name: Some(DisplayName::new("A. Byron").expect("valid name")),
                    ..PostChanges::default()
                },
            )
            .await
            .expect("update succeeds");

        assert_eq!(updated.author_name.as_ref(), "A. Byron");
        // The identity still carries the account's original name.
        assert_eq!(
            admin.user().expect("user").name().as_ref(),
            "Ada Lovelace"
        );
    }

    #[tokio::test]
    async fn anonymous_cannot_comment_but_any_user_can() {
        let (_, service) = service();
        let admin = user(1, "Ada", true);
        let reader = user(2, "Bob", false);
        let post = service
            .create_post(&admin, draft("Hello"))
            .await
            .expect("post created");
        let text = CommentText::new("Nice post").expect("valid text");

        let err = service
            .add_comment(&Identity::Anonymous, post.id, text.clone())
            .await
            .expect_err("anonymous comment must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);

        let comment = service
            .add_comment(&reader, post.id, text)
            .await
            .expect("reader comments");
        assert_eq!(comment.author_name.as_ref(), "Bob");
    }

    #[tokio::test]
    async fn deleting_a_post_removes_its_comments() {
        let (_, service) = service();
        let admin = user(1, "Ada", true);
        let reader = user(2, "Bob", false);
        let post = service
            .create_post(&admin, draft("Hello"))
            .await
            .expect("post created");
        service
            .add_comment(
                &reader,
                post.id,
                CommentText::new("Nice post").expect("valid text"),
            )
            .await
            .expect("comment added");

        service
            .delete_post(&admin, post.id)
            .await
            .expect("delete succeeds");

        let err = service
            .comments_for_post(post.id)
            .await
            .expect_err("comments on a deleted post are gone");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn missing_post_maps_to_not_found() {
        let (_, service) = service();
        let err = service
            .get_post(PostId::new(42))
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_service_unavailable() {
        let (repository, service) = service();
        repository.set_failure(ContentPersistenceError::connection("database unavailable"));
        let admin = user(1, "Ada", true);

        let err = service
            .create_post(&admin, draft("Hello"))
            .await
            .expect_err("outage must surface");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
