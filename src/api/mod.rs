pub mod handlers;
pub mod types;

pub use handlers::create_api_router;

use crate::repository::Database;
use crate::tokens::TokenRegistry;
use handlers::ApiErrorResponse;
use std::sync::Mutex;

/// Shared state for the query/registration API. The connection sits behind
/// a mutex because SQLite handles are not Sync; every query is short and
/// never held across an await point.
pub struct ApiState {
    pub db: Mutex<Database>,
    pub registry: TokenRegistry,
}

impl ApiState {
    pub fn new(db: Database, registry: TokenRegistry) -> Self {
        ApiState {
            db: Mutex::new(db),
            registry,
        }
    }

    fn lock_db(&self) -> Result<std::sync::MutexGuard<'_, Database>, ApiErrorResponse> {
        self.db
            .lock()
            .map_err(|_| ApiErrorResponse::internal("Database lock poisoned"))
    }
}
