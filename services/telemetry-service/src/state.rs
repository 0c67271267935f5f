use std::sync::Arc;

use crate::store::TelemetryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TelemetryStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TelemetryStore>) -> Self {
        Self { store }
    }
}
