use serde::{Deserialize, Serialize};

use super::{
    action::NightAction,
    player::{Player, PlayerId},
    role::{Faction, Role},
};
use crate::game::collector::Collector;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    Lobby,
    Night,
    Day,
    Ended,
}

impl RoomState {
    pub fn is_running(self) -> bool {
        matches!(self, RoomState::Night | RoomState::Day)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoomSettings {
    pub day_duration_seconds: u64,
    pub night_duration_seconds: u64,
    pub role_pool: Vec<Role>,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            day_duration_seconds: 60,
            night_duration_seconds: 30,
            role_pool: vec![
                Role::Werewolf,
                Role::Seer,
                Role::Witch,
                Role::Guard,
                Role::Villager,
                Role::Villager,
            ],
        }
    }
}

/// Host-supplied partial update; absent fields keep their value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub day_duration_seconds: Option<u64>,
    pub night_duration_seconds: Option<u64>,
    pub role_pool: Option<Vec<Role>>,
}

impl RoomSettings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(day) = patch.day_duration_seconds {
            self.day_duration_seconds = day;
        }
        if let Some(night) = patch.night_duration_seconds {
            self.night_duration_seconds = night;
        }
        if let Some(pool) = patch.role_pool {
            self.role_pool = pool;
        }
    }

    pub fn duration_for(&self, state: RoomState) -> Option<u64> {
        match state {
            RoomState::Night => Some(self.night_duration_seconds),
            RoomState::Day => Some(self.day_duration_seconds),
            RoomState::Lobby | RoomState::Ended => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub code: String,
    /// Join order. Every tie-break enumerates players in this order.
    pub players: Vec<Player>,
    pub host: PlayerId,
    pub state: RoomState,
    pub settings: RoomSettings,
    #[serde(skip)]
    pub votes: Collector<PlayerId>,
    #[serde(skip)]
    pub night_actions: Collector<NightAction>,
    pub last_protected: Option<PlayerId>,
    #[serde(skip)]
    pub last_night_kill: Option<PlayerId>,
    pub bot_ids: Vec<PlayerId>,
    pub winner: Option<Faction>,
    pub round: u32,
}

impl Room {
    pub fn new(code: String, host: Player, settings: RoomSettings) -> Self {
        Room {
            code,
            host: host.id.clone(),
            players: vec![host],
            state: RoomState::Lobby,
            settings,
            votes: Collector::new(),
            night_actions: Collector::new(),
            last_protected: None,
            last_night_kill: None,
            bot_ids: Vec::new(),
            winner: None,
            round: 0,
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.player(id).is_some()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn is_alive(&self, id: &str) -> bool {
        self.player(id).map_or(false, |p| p.alive)
    }

    /// The witch whose potions resolve this night: first witch in join order.
    pub fn witch(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.role == Some(Role::Witch))
    }

    pub fn add_player(&mut self, player: Player) {
        if player.is_bot {
            self.bot_ids.push(player.id.clone());
        }
        self.players.push(player);
    }

    /// Removes a member and hands the host seat on if needed.
    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let removed = self.players.remove(index);
        self.bot_ids.retain(|b| b != id);
        self.votes.remove(id);
        self.night_actions.remove(id);
        if self.host == id {
            if let Some(next) = self.players.first() {
                self.host = next.id.clone();
            }
        }
        Some(removed)
    }

    /// Swaps a departing member for a bot in the same seat.
    pub fn substitute(&mut self, id: &str, bot_id: PlayerId) -> Option<&Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let bot = Player::substitute_for(bot_id.clone(), &self.players[index]);
        self.players[index] = bot;
        self.bot_ids.push(bot_id);
        self.votes.remove(id);
        self.night_actions.remove(id);
        if self.host == id {
            self.host = self
                .players
                .iter()
                .find(|p| !p.is_bot)
                .unwrap_or(&self.players[index])
                .id
                .clone();
        }
        self.players.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
