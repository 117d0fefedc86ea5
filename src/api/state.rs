use std::sync::Arc;

use crate::fetch::ClanDataSource;
use crate::sync::LoaderConfig;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ClanDataSource>,
    pub loader: LoaderConfig,
}

impl AppState {
    pub fn new(source: Arc<dyn ClanDataSource>, loader: LoaderConfig) -> Self {
        Self { source, loader }
    }
}
