//! In-memory adapters for the repository ports.
//!
//! Used as the storage backend when no database is configured and as the
//! backend for handler and integration tests. Both adapters honour the same
//! contracts as their Diesel counterparts: first-account administrator
//! grant, duplicate detection, and comment cascade on post deletion.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{
    ContentPersistenceError, ContentRepository, NewCommentRecord, NewPostRecord, NewUserRecord,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    BlogPost, Comment, CommentId, EmailAddress, PostChanges, PostId, User, UserId,
};

/// Mutex-guarded user directory.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Mutex<UserState>,
}

#[derive(Default)]
struct UserState {
    users: Vec<User>,
    next_id: i32,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, record: NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut state = self.state.lock().expect("user state lock");
        if state.users.iter().any(|u| u.email() == &record.email) {
            return Err(UserPersistenceError::DuplicateEmail);
        }
        state.next_id += 1;
        let user = User::new(
            UserId::new(state.next_id),
            record.name,
            record.email,
            record.password,
            state.users.is_empty(),
        );
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().expect("user state lock");
        Ok(state.users.iter().find(|u| u.email() == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().expect("user state lock");
        Ok(state.users.iter().find(|u| u.id() == id).cloned())
    }
}

/// Mutex-guarded content store.
#[derive(Default)]
pub struct InMemoryContentRepository {
    state: Mutex<ContentState>,
}

#[derive(Default)]
struct ContentState {
    posts: Vec<BlogPost>,
    comments: Vec<Comment>,
    next_post_id: i32,
    next_comment_id: i32,
}

fn apply_changes(post: &mut BlogPost, changes: PostChanges) {
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
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn list_posts(&self) -> Result<Vec<BlogPost>, ContentPersistenceError> {
        let state = self.state.lock().expect("content state lock");
        Ok(state.posts.clone())
    }

    async fn find_post(&self, id: PostId) -> Result<Option<BlogPost>, ContentPersistenceError> {
        let state = self.state.lock().expect("content state lock");
        Ok(state.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create_post(
        &self,
        record: NewPostRecord,
    ) -> Result<BlogPost, ContentPersistenceError> {
        let mut state = self.state.lock().expect("content state lock");
        if state.posts.iter().any(|p| p.title == record.title) {
            return Err(ContentPersistenceError::DuplicateTitle);
        }
        state.next_post_id += 1;
        let post = BlogPost {
            id: PostId::new(state.next_post_id),
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
        let mut state = self.state.lock().expect("content state lock");
        if let Some(new_title) = &changes.title {
            if state
                .posts
                .iter()
                .any(|p| p.id != id && &p.title == new_title)
            {
                return Err(ContentPersistenceError::DuplicateTitle);
            }
        }
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ContentPersistenceError::PostNotFound)?;
        apply_changes(post, changes);
        Ok(post.clone())
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ContentPersistenceError> {
        let mut state = self.state.lock().expect("content state lock");
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        if state.posts.len() == before {
            return Err(ContentPersistenceError::PostNotFound);
        }
        state.comments.retain(|c| c.post_id != id);
        Ok(())
    }

    async fn comments_for_post(
        &self,
        id: PostId,
    ) -> Result<Vec<Comment>, ContentPersistenceError> {
        let state = self.state.lock().expect("content state lock");
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
        let mut state = self.state.lock().expect("content state lock");
        if !state.posts.iter().any(|p| p.id == record.post_id) {
            return Err(ContentPersistenceError::PostNotFound);
        }
        state.next_comment_id += 1;
        let comment = Comment {
            id: CommentId::new(state.next_comment_id),
            post_id: record.post_id,
            author_id: record.author_id,
            author_name: record.author_name,
            text: record.text,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }
}
