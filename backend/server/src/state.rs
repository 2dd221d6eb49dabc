use std::sync::Arc;

use reqwest::Client;

use super::config::Config;

pub struct AppState {
    pub config: Config,
    pub http: Client,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Self::with_config(Config::load())
    }

    pub fn with_config(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            http: Client::new(),
        })
    }
}
