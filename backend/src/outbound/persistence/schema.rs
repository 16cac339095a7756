//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. Regenerate with `diesel print-schema` after a migration.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` carries a unique index; `is_admin` is set for the first
    /// account only.
    users (id) {
        id -> Int4,
        name -> Varchar,
        email -> Varchar,
        /// PHC-formatted PBKDF2 credential, never plaintext.
        password -> Varchar,
        is_admin -> Bool,
    }
}

diesel::table! {
    /// Published posts.
    ///
    /// `title` carries a unique index. `date` stores the formatted
    /// publication date stamped at creation.
    blog_posts (id) {
        id -> Int4,
        title -> Varchar,
        subtitle -> Varchar,
        date -> Varchar,
        body -> Text,
        img_url -> Varchar,
        author_id -> Int4,
        /// Byline recorded at write time, independent of the account name.
        author_name -> Varchar,
    }
}

diesel::table! {
    /// Reader comments, removed together with their post.
    comments (id) {
        id -> Int4,
        post_id -> Int4,
        author_id -> Int4,
        author_name -> Varchar,
        text -> Text,
    }
}

diesel::joinable!(blog_posts -> users (author_id));
diesel::joinable!(comments -> blog_posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(users, blog_posts, comments);
