use std::sync::Arc;

use crate::auth::TokenService;
use crate::ownership::OwnershipCoordinator;
use crate::store::{TaskStore, UserStore};

/// Shared application state handed to every handler.
///
/// The stores sit behind trait objects so the same wiring serves the
/// Postgres store in production and the in-memory store in tests.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub tokens: TokenService,
    pub coordinator: OwnershipCoordinator,
}

impl AppState {
    /// Builds the state from one store serving both repositories.
    pub fn new<S>(store: Arc<S>, tokens: TokenService) -> Self
    where
        S: UserStore + TaskStore + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let tasks: Arc<dyn TaskStore> = store;
        let coordinator = OwnershipCoordinator::new(users.clone(), tasks.clone());
        Self {
            users,
            tasks,
            tokens,
            coordinator,
        }
    }
}
