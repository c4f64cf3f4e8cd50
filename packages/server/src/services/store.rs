//! Durable record of room settings and finished-game counts.
//!
//! The game never waits on or fails because of this store: write errors are
//! logged and the in-memory copy stays authoritative. Inside a tokio runtime
//! the file is written on the blocking pool.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, RwLock,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::room::RoomSettings;

pub trait StatsStore: Send + Sync {
    fn room_saved(&self, code: &str, settings: &RoomSettings);
    fn room_removed(&self, code: &str);
    fn game_completed(&self, code: &str);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRecord {
    pub created: DateTime<Utc>,
    pub settings: RoomSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomStats {
    pub games: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    pub rooms: HashMap<String, RoomRecord>,
    pub stats: HashMap<String, RoomStats>,
}

#[derive(Default)]
pub struct JsonFileStore {
    path: Option<PathBuf>,
    data: RwLock<StoreData>,
    revision: AtomicU64,
    /// Revision currently on disk.
    written: Arc<Mutex<u64>>,
}

impl JsonFileStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens `path`, starting empty if it is missing or unreadable.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed store file");
                StoreData::default()
            }),
            Err(_) => StoreData::default(),
        };
        info!(path = %path.display(), rooms = data.rooms.len(), "stats store loaded");
        Self {
            path: Some(path),
            data: RwLock::new(data),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> StoreData {
        self.data.read().map(|d| d.clone()).unwrap_or_default()
    }

    fn update<F: FnOnce(&mut StoreData)>(&self, f: F) {
        let Ok(mut data) = self.data.write() else {
            warn!("stats store lock poisoned");
            return;
        };
        f(&mut data);
        let Some(path) = self.path.clone() else {
            return;
        };
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        let json = match serde_json::to_string_pretty(&*data) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode stats store");
                return;
            }
        };
        drop(data);

        let written = Arc::clone(&self.written);
        let save = move || save_revision(&path, &json, revision, &written);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(save);
            }
            Err(_) => save(),
        }
    }
}

/// Writes `json` unless a newer revision already reached the disk.
fn save_revision(path: &Path, json: &str, revision: u64, written: &Mutex<u64>) {
    let Ok(mut on_disk) = written.lock() else {
        warn!("stats store writer lock poisoned");
        return;
    };
    if *on_disk >= revision {
        debug!(revision, on_disk = *on_disk, "skipping stale stats store write");
        return;
    }
    match fs::write(path, json) {
        Ok(()) => *on_disk = revision,
        Err(e) => warn!(path = %path.display(), error = %e, "failed to save stats store"),
    }
}

impl StatsStore for JsonFileStore {
    fn room_saved(&self, code: &str, settings: &RoomSettings) {
        self.update(|data| {
            data.rooms.insert(
                code.to_string(),
                RoomRecord {
                    created: Utc::now(),
                    settings: settings.clone(),
                },
            );
        });
    }

    fn room_removed(&self, code: &str) {
        self.update(|data| {
            data.rooms.remove(code);
        });
    }

    fn game_completed(&self, code: &str) {
        self.update(|data| {
            data.stats.entry(code.to_string()).or_default().games += 1;
        });
    }
}
