//! Shared handler state

use std::sync::Arc;

use super::auth::AuthManager;
use crate::data::{TransactionalRepository, TransactionalService};

/// State shared by all page routes
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<TransactionalService>,
    pub auth: Arc<AuthManager>,
}

impl AppState {
    pub fn new(database: Arc<TransactionalService>, auth: Arc<AuthManager>) -> Self {
        Self { database, auth }
    }

    pub fn repository(&self) -> Box<dyn TransactionalRepository + Send + Sync> {
        self.database.repository()
    }
}
