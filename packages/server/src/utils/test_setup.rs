use std::sync::{Arc, Once};

use crate::models::config::ServerConfig;
use crate::services::store::JsonFileStore;
use crate::state::AppState;

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "werewolf_server=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Config for tests: no store file, phases advanced by hand.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        store_file: None,
        auto_advance_phases: false,
        ..ServerConfig::default()
    }
}

/// State plus a handle on its in-memory store for assertions.
pub fn test_state_with(config: ServerConfig) -> (AppState, Arc<JsonFileStore>) {
    setup_test_env();
    let store = Arc::new(JsonFileStore::in_memory());
    let state = AppState::new(config, store.clone());
    (state, store)
}

pub fn test_state() -> (AppState, Arc<JsonFileStore>) {
    test_state_with(test_config())
}
