use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Werewolf,
    Seer,
    Witch,
    Guard,
    Villager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Villagers,
    Werewolves,
}

impl Role {
    pub fn faction(self) -> Faction {
        match self {
            Role::Werewolf => Faction::Werewolves,
            Role::Seer | Role::Witch | Role::Guard | Role::Villager => Faction::Villagers,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Werewolf => write!(f, "werewolf"),
            Role::Seer => write!(f, "seer"),
            Role::Witch => write!(f, "witch"),
            Role::Guard => write!(f, "guard"),
            Role::Villager => write!(f, "villager"),
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Villagers => write!(f, "villagers"),
            Faction::Werewolves => write!(f, "werewolves"),
        }
    }
}
