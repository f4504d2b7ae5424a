use std::sync::Arc;

use storage::repository::RepairStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    repairs: Arc<dyn RepairStore>,
}

impl AppState {
    pub fn new(repairs: Arc<dyn RepairStore>) -> Self {
        Self { repairs }
    }

    pub fn repairs(&self) -> &dyn RepairStore {
        self.repairs.as_ref()
    }
}
