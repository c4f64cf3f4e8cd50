use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::game::bot::BotTuning;
use crate::models::room::RoomSettings;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    // None keeps statistics in memory only
    pub store_file: Option<PathBuf>,
    pub cors_origin: String,
    pub min_players: usize,
    // Run phase timers; tests switch this off and drive phases by hand
    pub auto_advance_phases: bool,
    pub default_settings: RoomSettings,
    pub bot_tuning: BotTuning,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            store_file: Some(PathBuf::from("data_store.json")),
            cors_origin: "http://localhost:3000".to_string(),
            min_players: 4,
            auto_advance_phases: true,
            default_settings: RoomSettings::default(),
            bot_tuning: BotTuning::default(),
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn probability(key: &str, fallback: f64) -> f64 {
    parsed::<f64>(key)
        .filter(|p| (0.0..=1.0).contains(p))
        .unwrap_or(fallback)
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = parsed("WEREWOLF_HOST").unwrap_or(defaults.host);
        let port = parsed("WEREWOLF_PORT").unwrap_or(defaults.port);
        let store_file = match env::var("WEREWOLF_STORE_FILE") {
            Ok(v) if v.trim().is_empty() => None,
            Ok(v) => Some(PathBuf::from(v)),
            Err(_) => defaults.store_file,
        };
        let cors_origin = env::var("WEREWOLF_CORS_ORIGIN").unwrap_or(defaults.cors_origin);
        let min_players = parsed("WEREWOLF_MIN_PLAYERS").unwrap_or(defaults.min_players);
        let auto_advance_phases = env::var("WEREWOLF_AUTO_ADVANCE")
            .map(|v| v != "false")
            .unwrap_or(true);

        let mut default_settings = defaults.default_settings;
        if let Some(day) = parsed("WEREWOLF_DAY_SECONDS") {
            default_settings.day_duration_seconds = day;
        }
        if let Some(night) = parsed("WEREWOLF_NIGHT_SECONDS") {
            default_settings.night_duration_seconds = night;
        }

        let bot_tuning = BotTuning {
            heal_probability: probability(
                "WEREWOLF_BOT_HEAL_PROBABILITY",
                defaults.bot_tuning.heal_probability,
            ),
            poison_probability: probability(
                "WEREWOLF_BOT_POISON_PROBABILITY",
                defaults.bot_tuning.poison_probability,
            ),
        };

        Self {
            host,
            port,
            store_file,
            cors_origin,
            min_players,
            auto_advance_phases,
            default_settings,
            bot_tuning,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
