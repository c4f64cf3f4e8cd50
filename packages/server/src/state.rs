use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::info;

use crate::models::{config::ServerConfig, room::Room};
use crate::services::{
    notifier::Notifier,
    scheduler::PhaseScheduler,
    store::{JsonFileStore, StatsStore},
};

/// Owns every live room plus the services that act on them.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<Mutex<HashMap<String, Room>>>,
    pub scheduler: Arc<PhaseScheduler>,
    pub notifier: Arc<Notifier>,
    pub store: Arc<dyn StatsStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn StatsStore>) -> Self {
        AppState {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            scheduler: Arc::new(PhaseScheduler::new()),
            notifier: Arc::new(Notifier::new()),
            store,
            config: Arc::new(config),
        }
    }

    pub fn from_config(config: ServerConfig) -> Self {
        let store: Arc<dyn StatsStore> = match &config.store_file {
            Some(path) => Arc::new(JsonFileStore::open(path)),
            None => Arc::new(JsonFileStore::in_memory()),
        };
        Self::new(config, store)
    }

    /// Stops every phase timer and drops all rooms.
    pub async fn shutdown(&self) {
        let mut rooms = self.rooms.lock().await;
        self.scheduler.cancel_all().await;
        info!(rooms = rooms.len(), "shutting down room manager");
        rooms.clear();
    }
}
