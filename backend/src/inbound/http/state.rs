//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::Mailer;
use crate::domain::{AccountService, BlogService, Error, Identity};

use super::session::SessionContext;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<AccountService>,
    pub blog: Arc<BlogService>,
    pub mailer: Arc<dyn Mailer>,
}

impl HttpState {
    /// Construct state from the wired services.
    pub fn new(
        accounts: Arc<AccountService>,
        blog: Arc<BlogService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            accounts,
            blog,
            mailer,
        }
    }

    /// Resolve the caller's identity for this request.
    ///
    /// Runs once per handler invocation; a missing or stale session reads
    /// as [`Identity::Anonymous`].
    pub async fn identity(&self, session: &SessionContext) -> Result<Identity, Error> {
        self.accounts.resolve_identity(session.user_id()).await
    }
}
