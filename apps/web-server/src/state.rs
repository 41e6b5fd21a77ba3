//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{GroupRepository, PostRepository, UserRepository};
use yatube_core::services::PostService;
use yatube_infra::InMemoryStore;
use yatube_infra::database::DatabaseConfig;

#[cfg(feature = "postgres")]
use yatube_infra::{DatabaseConnections, PostgresStore};

/// Which store the repositories run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub users: Arc<dyn UserRepository>,
    pub backend: StoreBackend,
}

impl AppState {
    /// Build the state on top of one store implementing every repository.
    pub fn from_store<S>(store: Arc<S>, backend: StoreBackend) -> Self
    where
        S: UserRepository + GroupRepository + PostRepository + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let groups: Arc<dyn GroupRepository> = store.clone();
        let posts: Arc<dyn PostRepository> = store;

        Self {
            posts: Arc::new(PostService::new(users.clone(), groups, posts)),
            users,
            backend,
        }
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match DatabaseConnections::init(config).await {
                    Ok(connections) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self::from_store(
                            Arc::new(PostgresStore::new(connections.main)),
                            StoreBackend::Postgres,
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if db_config.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::from_store(Arc::new(InMemoryStore::new()), StoreBackend::Memory)
    }
}
