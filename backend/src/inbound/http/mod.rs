//! HTTP inbound adapter exposing the blog's REST endpoints.

pub mod error;
pub mod pages;
pub mod posts;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
pub use state::HttpState;

use actix_web::web;

/// Register every route on an application or test harness.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(posts::list_posts)
        .service(posts::show_post)
        .service(posts::add_comment)
        .service(posts::new_post_form)
        .service(posts::create_post)
        .service(posts::edit_post_form)
        .service(posts::edit_post)
        .service(posts::delete_post)
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(pages::about)
        .service(pages::contact_form)
        .service(pages::send_contact_message);
}
