//! Post and comment API handlers.
//!
//! ```text
//! GET  /                     post list
//! GET  /blog/{id}            single post with comments
//! POST /blog/{id}            add a comment (authenticated)
//! GET  /new-post             form pre-fill (admin)
//! POST /new-post             create (admin)
//! GET  /edit-post/{id}       form pre-fill from the stored post (admin)
//! POST /edit-post/{id}       update (admin)
//! POST /delete-post/{id}     delete with comment cascade (admin)
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    BlogPost, Comment, CommentText, CommentValidationError, DisplayName, Error, Identity,
    ImageUrl, PostChanges, PostDraft, PostId, PostValidationError, UserValidationError,
};

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// A post as returned to the rendering layer.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    /// Formatted publication date, e.g. `April 05, 2024`.
    pub date: String,
    pub body: String,
    pub image_url: String,
    pub author: String,
}

impl From<BlogPost> for PostView {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id.value(),
            title: post.title,
            subtitle: post.subtitle,
            date: post.date,
            body: post.body,
            image_url: post.image_url.into(),
            author: post.author_name.into(),
        }
    }
}

/// A comment as returned to the rendering layer.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i32,
    pub author: String,
    pub text: String,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.value(),
            author: comment.author_name.into(),
            text: comment.text.into(),
        }
    }
}

/// Values the index template needs: header block, posts, caller flags.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostListPage {
    pub heading: String,
    pub subheading: String,
    pub image: String,
    pub posts: Vec<PostView>,
    pub logged_in: bool,
    pub is_admin: bool,
}

/// Values the single-post template needs.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub heading: String,
    pub subheading: String,
    pub image: String,
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub logged_in: bool,
    pub is_admin: bool,
}

/// Pre-fill values for the shared new/edit form.
#[derive(Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostFormPrefill {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub image_url: String,
    pub body: String,
}

/// Values the post form template needs.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostFormPage {
    pub heading: String,
    pub subheading: String,
    pub image: String,
    pub form: PostFormPrefill,
}

/// Request body for `POST /new-post`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image_url: String,
}

/// Request body for `POST /edit-post/{id}`; absent fields stay unchanged.
#[derive(Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditPostRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    /// Post-local byline; editing it does not rename the account.
    pub author: Option<String>,
}

/// Request body for `POST /blog/{id}`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub text: String,
}

fn map_post_validation_error(err: PostValidationError) -> Error {
    let field = match err {
        PostValidationError::EmptyTitle => "title",
        PostValidationError::EmptySubtitle => "subtitle",
        PostValidationError::EmptyBody => "body",
        PostValidationError::InvalidImageUrl => "imageUrl",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_comment_validation_error(err: CommentValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "text" }))
}

fn map_author_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "author" }))
}

/// List all posts in publication order.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Post list page values", body = PostListPage),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PostListPage>> {
    let identity = state.identity(&session).await?;
    let posts = state.blog.list_posts().await?;
    Ok(web::Json(PostListPage {
        heading: "Some Blogs".to_owned(),
        subheading: "A Blog Theme by Start Bootstrap".to_owned(),
        image: "static/assets/img/home-bg.jpg".to_owned(),
        posts: posts.into_iter().map(PostView::from).collect(),
        logged_in: identity.is_authenticated(),
        is_admin: identity.is_admin(),
    }))
}

/// Show a single post with its comments.
#[utoipa::path(
    get,
    path = "/blog/{id}",
    params(("id" = i32, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post page values", body = PostPage),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "showPost",
    security([])
)]
#[get("/blog/{id}")]
pub async fn show_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<PostPage>> {
    let id = PostId::new(path.into_inner());
    let identity = state.identity(&session).await?;
    let post = state.blog.get_post(id).await?;
    let comments = state.blog.comments_for_post(id).await?;
    Ok(web::Json(PostPage {
        heading: post.title.clone(),
        subheading: post.subtitle.clone(),
        image: post.image_url.as_ref().to_owned(),
        post: PostView::from(post),
        comments: comments.into_iter().map(CommentView::from).collect(),
        logged_in: identity.is_authenticated(),
        is_admin: identity.is_admin(),
    }))
}

/// Add a comment to a post. Requires a logged-in caller.
#[utoipa::path(
    post,
    path = "/blog/{id}",
    params(("id" = i32, Path, description = "Post id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "addComment"
)]
#[post("/blog/{id}")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let identity = state.identity(&session).await?;
    let text = CommentText::new(payload.into_inner().text).map_err(map_comment_validation_error)?;
    let comment = state.blog.add_comment(&identity, id, text).await?;
    Ok(HttpResponse::Created().json(CommentView::from(comment)))
}

fn post_form_page(form: PostFormPrefill, heading: &str) -> PostFormPage {
    PostFormPage {
        heading: heading.to_owned(),
        subheading: "Let's wow the readers!".to_owned(),
        image: "static/assets/img/edit-bg.jpg".to_owned(),
        form,
    }
}

async fn require_admin_identity(
    state: &HttpState,
    session: &SessionContext,
) -> Result<Identity, Error> {
    let identity = state.identity(session).await?;
    crate::domain::require_admin(&identity)?;
    Ok(identity)
}

/// Blank pre-fill for the new-post form. Admin only.
#[utoipa::path(
    get,
    path = "/new-post",
    responses(
        (status = 200, description = "Form page values", body = PostFormPage),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["posts"],
    operation_id = "newPostForm"
)]
#[get("/new-post")]
pub async fn new_post_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PostFormPage>> {
    require_admin_identity(&state, &session).await?;
    Ok(web::Json(post_form_page(
        PostFormPrefill::default(),
        "New Post",
    )))
}

/// Create a post. Admin only.
#[utoipa::path(
    post,
    path = "/new-post",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 409, description = "Duplicate title", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/new-post")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    let request = payload.into_inner();
    let draft = PostDraft::try_from_parts(
        &request.title,
        &request.subtitle,
        &request.body,
        &request.image_url,
    )
    .map_err(map_post_validation_error)?;
    let post = state.blog.create_post(&identity, draft).await?;
    Ok(HttpResponse::Created().json(PostView::from(post)))
}

/// Pre-fill for the edit form from the stored post. Admin only.
#[utoipa::path(
    get,
    path = "/edit-post/{id}",
    params(("id" = i32, Path, description = "Post id")),
    responses(
        (status = 200, description = "Form page values", body = PostFormPage),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "editPostForm"
)]
#[get("/edit-post/{id}")]
pub async fn edit_post_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<PostFormPage>> {
    require_admin_identity(&state, &session).await?;
    let post = state.blog.get_post(PostId::new(path.into_inner())).await?;
    let prefill = PostFormPrefill {
        title: post.title,
        subtitle: post.subtitle,
        author: post.author_name.into(),
        image_url: post.image_url.into(),
        body: post.body,
    };
    Ok(web::Json(post_form_page(prefill, "Edit Post")))
}

/// Apply a partial edit to a post. Admin only.
#[utoipa::path(
    post,
    path = "/edit-post/{id}",
    params(("id" = i32, Path, description = "Post id")),
    request_body = EditPostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Post not found", body = Error),
        (status = 409, description = "Duplicate title", body = Error)
    ),
    tags = ["posts"],
    operation_id = "editPost"
)]
#[post("/edit-post/{id}")]
pub async fn edit_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<EditPostRequest>,
) -> ApiResult<web::Json<PostView>> {
    let identity = state.identity(&session).await?;
    let request = payload.into_inner();
    let mut changes = PostChanges::try_from_text_parts(
        request.title.as_deref(),
        request.subtitle.as_deref(),
        request.body.as_deref(),
    )
    .map_err(map_post_validation_error)?;
    changes.image_url = request
        .image_url
        .map(ImageUrl::new)
        .transpose()
        .map_err(map_post_validation_error)?;
    changes.author_name = request
        .author
        .map(DisplayName::new)
        .transpose()
        .map_err(map_author_validation_error)?;
    let post = state
        .blog
        .update_post(&identity, PostId::new(path.into_inner()), changes)
        .await?;
    Ok(web::Json(PostView::from(post)))
}

/// Delete a post and its comments. Admin only.
#[utoipa::path(
    post,
    path = "/delete-post/{id}",
    params(("id" = i32, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[post("/delete-post/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let identity = state.identity(&session).await?;
    state
        .blog
        .delete_post(&identity, PostId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
