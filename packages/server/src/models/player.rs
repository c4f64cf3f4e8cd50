use serde::{Deserialize, Serialize};

use super::role::Role;

/// Transport-assigned identifier, stable for the lifetime of a connection.
pub type PlayerId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potions {
    pub heal: bool,
    pub poison: bool,
}

impl Default for Potions {
    fn default() -> Self {
        Self {
            heal: true,
            poison: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub alive: bool,
    pub role: Option<Role>,
    pub ready: bool,
    pub is_bot: bool,
    pub potions: Potions,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            alive: true,
            role: None,
            ready: false,
            is_bot: false,
            potions: Potions::default(),
        }
    }

    pub fn bot(id: PlayerId, name: String) -> Self {
        Self {
            ready: true,
            is_bot: true,
            ..Self::new(id, name)
        }
    }

    /// Builds the bot that takes over a disconnected player's seat.
    pub fn substitute_for(id: PlayerId, leaving: &Player) -> Self {
        Self {
            id,
            name: format!("{} (bot)", leaving.name),
            alive: leaving.alive,
            role: leaving.role,
            ready: true,
            is_bot: true,
            potions: leaving.potions,
        }
    }

    pub fn is_alive_as(&self, role: Role) -> bool {
        self.alive && self.role == Some(role)
    }
}
