//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{Clock, Mailer, SystemClock};
use crate::domain::{AccountService, BlogService};
use crate::inbound::http::{self, HttpState};
use crate::middleware::RequestLog;
use crate::outbound::mail::{LoggingMailer, SmtpMailer, SmtpMailerConfig};
use crate::outbound::persistence::memory::{InMemoryContentRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DieselContentRepository, DieselUserRepository};

fn build_mailer(smtp: Option<SmtpMailerConfig>) -> std::io::Result<Arc<dyn Mailer>> {
    match smtp {
        Some(config) => {
            let mailer = SmtpMailer::new(config)
                .map_err(|err| std::io::Error::other(format!("SMTP setup failed: {err}")))?;
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("no SMTP relay configured; contact messages will only be logged");
            Ok(Arc::new(LoggingMailer))
        }
    }
}

/// Wire services onto the configured storage backend.
fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (accounts, blog) = match &config.db_pool {
        Some(pool) => {
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            let content = Arc::new(DieselContentRepository::new(pool.clone()));
            (
                AccountService::new(users),
                BlogService::new(content, clock),
            )
        }
        None => {
            warn!("no database configured; falling back to in-memory storage");
            let users = Arc::new(InMemoryUserRepository::default());
            let content = Arc::new(InMemoryContentRepository::default());
            (
                AccountService::new(users),
                BlogService::new(content, clock),
            )
        }
    };
    let mailer = build_mailer(config.smtp.clone())?;
    Ok(HttpState::new(Arc::new(accounts), Arc::new(blog), mailer))
}

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let app = App::new()
        .app_data(http_state)
        .wrap(session)
        .wrap(RequestLog)
        .configure(http::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when state wiring or socket binding fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        smtp: _,
    } = config;

    info!(%bind_addr, "starting blog server");
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
