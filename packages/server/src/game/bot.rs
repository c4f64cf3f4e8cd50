//! Decision heuristics for system-controlled players.

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::models::{
    action::NightAction,
    player::{Player, PlayerId},
    role::Role,
    room::{Room, RoomState},
};

use super::night::pending_kill;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotTuning {
    pub heal_probability: f64,
    pub poison_probability: f64,
}

impl Default for BotTuning {
    fn default() -> Self {
        Self {
            heal_probability: 0.3,
            poison_probability: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotMove {
    Vote(PlayerId),
    Night(NightAction),
}

fn pick<R, F>(room: &Room, rng: &mut R, keep: F) -> Option<PlayerId>
where
    R: Rng + ?Sized,
    F: Fn(&Player) -> bool,
{
    let targets: Vec<&PlayerId> = room
        .alive_players()
        .filter(|p| keep(p))
        .map(|p| &p.id)
        .collect();
    targets.choose(rng).map(|id| (*id).clone())
}

/// Chooses what `bot_id` submits this phase, if anything.
pub fn decide<R: Rng + ?Sized>(
    room: &Room,
    bot_id: &str,
    tuning: &BotTuning,
    rng: &mut R,
) -> Option<BotMove> {
    let bot = room.player(bot_id).filter(|p| p.alive)?;

    match room.state {
        RoomState::Day => pick(room, rng, |p| p.id != bot_id).map(BotMove::Vote),
        RoomState::Night => {
            let action = match bot.role? {
                Role::Werewolf => pick(room, rng, |p| p.role != Some(Role::Werewolf))
                    .map(|target| NightAction::Kill { target }),
                Role::Seer => pick(room, rng, |p| p.id != bot_id)
                    .map(|target| NightAction::Inspect { target }),
                Role::Guard => {
                    pick(room, rng, |_| true).map(|target| NightAction::Protect { target })
                }
                Role::Witch => {
                    let can_heal = bot.potions.heal && pending_kill(room).is_some();
                    if can_heal && rng.gen::<f64>() < tuning.heal_probability {
                        Some(NightAction::Heal { target: None })
                    } else if bot.potions.poison && rng.gen::<f64>() < tuning.poison_probability {
                        pick(room, rng, |p| p.id != bot_id)
                            .map(|target| NightAction::Poison { target })
                    } else {
                        None
                    }
                }
                Role::Villager => None,
            };
            action.map(BotMove::Night)
        }
        RoomState::Lobby | RoomState::Ended => None,
    }
}

/// Lets one bot act, recording its choice in the current phase's collector.
pub fn act<R: Rng + ?Sized>(
    room: &mut Room,
    bot_id: &str,
    tuning: &BotTuning,
    rng: &mut R,
) -> Option<BotMove> {
    let choice = decide(room, bot_id, tuning, rng)?;
    match &choice {
        BotMove::Vote(target) => {
            room.votes.record(bot_id.to_string(), target.clone());
        }
        BotMove::Night(action) => {
            room.night_actions.record(bot_id.to_string(), action.clone());
        }
    }
    Some(choice)
}

/// Runs every bot in the room once; returns how many submitted something.
pub fn act_all<R: Rng + ?Sized>(room: &mut Room, tuning: &BotTuning, rng: &mut R) -> usize {
    let bots = room.bot_ids.clone();
    bots.iter()
        .filter(|id| act(room, id, tuning, rng).is_some())
        .count()
}
