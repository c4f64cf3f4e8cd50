use serde::{Deserialize, Serialize};

use super::{player::PlayerId, role::Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NightAction {
    Kill { target: PlayerId },
    Inspect { target: PlayerId },
    /// Without a target the heal applies to the night's pending kill.
    Heal {
        #[serde(default)]
        target: Option<PlayerId>,
    },
    Poison { target: PlayerId },
    Protect { target: PlayerId },
}

impl NightAction {
    /// Role an actor must hold for the action to count at resolution.
    pub fn required_role(&self) -> Role {
        match self {
            NightAction::Kill { .. } => Role::Werewolf,
            NightAction::Inspect { .. } => Role::Seer,
            NightAction::Heal { .. } | NightAction::Poison { .. } => Role::Witch,
            NightAction::Protect { .. } => Role::Guard,
        }
    }
}
