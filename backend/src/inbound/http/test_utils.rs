//! Shared helpers for HTTP adapter tests.
//!
//! Builds a full application instance backed by the in-memory adapters so
//! handler tests exercise real routing, session middleware, and JSON
//! serialisation without a database or SMTP relay.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, App};
use async_trait::async_trait;

use crate::domain::ports::{Clock, Mailer, MailerError, OutboundMail, SystemClock};
use crate::domain::{AccountService, BlogService};
use crate::outbound::persistence::memory::{InMemoryContentRepository, InMemoryUserRepository};

use super::state::HttpState;

/// Cookie session middleware with a fixed key and no TLS requirement.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    let key = Key::from(&[0x5f; 64]);
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mailer that accepts everything silently.
struct AcceptingMailer;

#[async_trait]
impl Mailer for AcceptingMailer {
    async fn send(&self, _mail: OutboundMail) -> Result<(), MailerError> {
        Ok(())
    }
}

/// Mailer that refuses every message, for outage-path tests.
struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: OutboundMail) -> Result<(), MailerError> {
        Err(MailerError::transport("relay refused the connection"))
    }
}

fn state_with_mailer(mailer: Arc<dyn Mailer>) -> HttpState {
    let users = Arc::new(InMemoryUserRepository::default());
    let content = Arc::new(InMemoryContentRepository::default());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    HttpState::new(
        Arc::new(AccountService::new(users)),
        Arc::new(BlogService::new(content, clock)),
        mailer,
    )
}

fn app_with_state(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(actix_web::web::Data::new(state))
        .wrap(test_session_middleware())
        .configure(super::configure)
}

/// Full application over in-memory adapters.
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    app_with_state(state_with_mailer(Arc::new(AcceptingMailer)))
}

/// Application whose mail transport rejects every message.
pub fn test_app_with_failing_mailer() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    app_with_state(state_with_mailer(Arc::new(FailingMailer)))
}

/// Session cookie from a response, if one was set.
pub fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
}

/// Register an account and return its signed-in session cookie.
///
/// Registration signs the caller in, so the first call per app instance
/// yields the administrator account.
pub async fn register_and_login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .to_request(),
    )
    .await;
    assert!(
        res.status().is_success(),
        "registration failed: {}",
        res.status()
    );
    session_cookie(&res).expect("registration sets a session cookie")
}
