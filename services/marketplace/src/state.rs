//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    middleware::TokenVerifier,
    repositories::{
        MemoryStore, PgPortfolioRepository, PgUserRepository, PortfolioRepository, UserRepository,
    },
    services::{PortfolioService, UserService},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Present only when backed by PostgreSQL; used by the health endpoint
    pub db_pool: Option<PgPool>,
    pub verifier: Arc<TokenVerifier>,
    pub user_service: UserService,
    pub portfolio_service: PortfolioService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn PortfolioRepository>,
        verifier: TokenVerifier,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            db_pool,
            verifier: Arc::new(verifier),
            user_service: UserService::new(users.clone(), projects.clone()),
            portfolio_service: PortfolioService::new(users, projects),
        }
    }

    /// State backed by PostgreSQL repositories
    pub fn postgres(pool: PgPool, verifier: TokenVerifier) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgPortfolioRepository::new(pool.clone())),
            verifier,
            Some(pool),
        )
    }

    /// State backed by a fresh in-process store
    pub fn in_memory(verifier: TokenVerifier) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, verifier, None)
    }
}
