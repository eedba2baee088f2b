use std::sync::Arc;

use crate::config::Config;
use crate::observability::Metrics;
use crate::storage::ScreenshotStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<ScreenshotStore>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, store: ScreenshotStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
