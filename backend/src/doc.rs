//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every endpoint from the inbound layer, the request and
//! response schemas, and the session cookie security scheme. The generated
//! document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::pages::{ContactConfirmation, ContactRequest, PageView};
use crate::inbound::http::posts::{
    CommentRequest, CommentView, CreatePostRequest, EditPostRequest, PostFormPage,
    PostFormPrefill, PostListPage, PostPage, PostView,
};
use crate::inbound::http::users::{AccountView, LoginRequest, RegisterRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login or POST /register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog backend API",
        description = "HTTP interface for posts, comments, accounts, and the contact form."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::show_post,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::posts::new_post_form,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::edit_post_form,
        crate::inbound::http::posts::edit_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::pages::about,
        crate::inbound::http::pages::contact_form,
        crate::inbound::http::pages::send_contact_message,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PostView,
        CommentView,
        PostListPage,
        PostPage,
        PostFormPage,
        PostFormPrefill,
        CreatePostRequest,
        EditPostRequest,
        CommentRequest,
        AccountView,
        RegisterRequest,
        LoginRequest,
        PageView,
        ContactRequest,
        ContactConfirmation,
    )),
    tags(
        (name = "posts", description = "Post listing, authoring, and comments"),
        (name = "accounts", description = "Registration, login, and logout"),
        (name = "pages", description = "Static pages and the contact form")
    )
)]
pub struct ApiDoc;
