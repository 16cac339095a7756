//! Backend entry-point: reads environment configuration and starts the
//! server.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::outbound::mail::SmtpMailerConfig;
use backend::outbound::persistence::{run_pending_migrations, DbPool, PoolConfig};
use backend::server::{create_server, ServerConfig};

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// SMTP settings from the environment; `None` when no relay is configured.
fn smtp_config() -> Option<SmtpMailerConfig> {
    let host = env::var("SMTP_HOST").ok()?;
    let port = env::var("SMTP_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(587);
    Some(SmtpMailerConfig {
        host,
        port,
        username: env::var("SMTP_USERNAME").unwrap_or_default(),
        password: env::var("SMTP_PASSWORD").unwrap_or_default(),
        sender: env::var("MAIL_SENDER").unwrap_or_else(|_| "blog@localhost".into()),
        recipient: env::var("MAIL_RECIPIENT").unwrap_or_else(|_| "owner@localhost".into()),
    })
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        run_pending_migrations(&database_url)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let mut pool_config = PoolConfig::new(database_url);
        if let Some(max_size) = env::var("DB_POOL_MAX_SIZE")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            pool_config = pool_config.with_max_size(max_size);
        }
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        config = config.with_db_pool(pool);
    }
    if let Some(smtp) = smtp_config() {
        config = config.with_smtp(smtp);
    }

    create_server(config)?.await
}
