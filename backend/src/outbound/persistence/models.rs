//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;

use super::schema::{blog_posts, comments, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub is_admin: bool,
}

/// Row struct for reading from the blog_posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blog_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
    pub author_id: i32,
    pub author_name: String,
}

/// Insertable struct for creating new posts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blog_posts)]
pub(crate) struct NewPostRow<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub date: &'a str,
    pub body: &'a str,
    pub img_url: &'a str,
    pub author_id: i32,
    pub author_name: &'a str,
}

/// Changeset struct for partial post updates; `None` leaves a column alone.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = blog_posts)]
pub(crate) struct PostUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub img_url: Option<String>,
    pub author_name: Option<String>,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub author_name: String,
    pub text: String,
}

/// Insertable struct for creating new comments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub post_id: i32,
    pub author_id: i32,
    pub author_name: &'a str,
    pub text: &'a str,
}
