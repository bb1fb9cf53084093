use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{add_extension::AddExtensionLayer, trace::TraceLayer};

use crate::config::Config;
use crate::handlers::{create_user, delete_user, get_user, list_users};
use crate::store::UserStore;

/// Process-wide state shared by every request.
///
/// Holds the store handle only; each request checks a connection out of its pool and returns
/// it before the response is written.
#[derive(Debug)]
pub(crate) struct State {
    pub(crate) store: UserStore,
}

impl State {
    /// Attempt to open the store and make sure its schema exists.
    pub(crate) async fn try_new(config: &Config) -> Result<State> {
        let store = UserStore::open(&config.database_url, config.max_connections)
            .await
            .with_context(|| format!("failed to open database at {}", config.database_url))?;
        store
            .init_schema()
            .await
            .context("failed to create the users table")?;

        Ok(State { store })
    }
}

/// Build the router. Both `/users` and `/users/` are accepted for the collection.
pub(crate) fn app(state: Arc<State>) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).delete(delete_user))
        .layer(AddExtensionLayer::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the server until Ctrl+C or SIGTERM, then close the store.
pub async fn run(config: Config) -> Result<()> {
    let state = Arc::new(State::try_new(&config).await?);

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, database = %config.database_url, "listening");

    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    state.store.close().await;
    tracing::info!("store closed, shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("received Ctrl+C, shutting down gracefully"),
        _ = terminate => tracing::warn!("received SIGTERM, shutting down gracefully"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DATABASE_MAX_CONNECTIONS;

    #[tokio::test]
    async fn startup_creates_database_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");
        let config = Config {
            database_url: format!("sqlite://{}", path.display()),
            addr: "127.0.0.1:0".parse().unwrap(),
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
        };

        let state = State::try_new(&config).await.unwrap();

        assert!(path.exists());
        assert!(state.store.list_all().await.unwrap().is_empty());
        state.store.close().await;

        // a second start over the same file keeps what is there
        let state = State::try_new(&config).await.unwrap();
        state.store.insert("Ana", "ana@x.com", "p1").await.unwrap();
        state.store.close().await;
        let state = State::try_new(&config).await.unwrap();
        assert_eq!(state.store.list_all().await.unwrap().len(), 1);
    }
}
