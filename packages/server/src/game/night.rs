//! Night resolution.
//!
//! Runs once per night on the sealed action set: protection, kill tally,
//! protection check, inspections, then the witch's potions. Actions whose
//! actor was dead at dusk or lacks the matching role are dropped, as are
//! references to players who are not (alive) members.

use tracing::debug;

use crate::models::{
    action::NightAction,
    player::PlayerId,
    role::Role,
    room::Room,
};

use super::collector::plurality;

/// Private role reveal owed to an inspecting player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub seer: PlayerId,
    pub target: PlayerId,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightOutcome {
    pub protected: Option<PlayerId>,
    /// Kill victim that stayed dead after the witch acted.
    pub killed: Option<PlayerId>,
    pub saved: Option<PlayerId>,
    pub poisoned: Option<PlayerId>,
    pub reveals: Vec<Reveal>,
}

impl NightOutcome {
    pub fn deaths(&self) -> impl Iterator<Item = &PlayerId> {
        self.killed.iter().chain(self.poisoned.iter())
    }
}

/// Whether `actor` may perform `action` tonight.
fn is_eligible(room: &Room, actor: &str, action: &NightAction) -> bool {
    let Some(player) = room.player(actor) else {
        return false;
    };
    if !player.is_alive_as(action.required_role()) {
        return false;
    }
    match action {
        NightAction::Heal { .. } | NightAction::Poison { .. } => {
            room.witch().map_or(false, |w| w.id == actor)
        }
        _ => true,
    }
}

fn eligible_actions(room: &Room, actions: Vec<(PlayerId, NightAction)>) -> Vec<(PlayerId, NightAction)> {
    actions
        .into_iter()
        .filter(|(actor, action)| {
            let ok = is_eligible(room, actor, action);
            if !ok {
                debug!(room = %room.code, %actor, ?action, "ignoring ineligible night action");
            }
            ok
        })
        .collect()
}

/// First protect wins; kill target is the plurality of kill votes.
fn plan(actions: &[(PlayerId, NightAction)]) -> (Option<PlayerId>, Option<PlayerId>) {
    let protected = actions.iter().find_map(|(_, action)| match action {
        NightAction::Protect { target } => Some(target.clone()),
        _ => None,
    });
    let kill = plurality(actions.iter().filter_map(|(_, action)| match action {
        NightAction::Kill { target } => Some(target),
        _ => None,
    }));
    (protected, kill)
}

/// The victim tonight's kill would claim if the night ended now.
pub fn pending_kill(room: &Room) -> Option<PlayerId> {
    let recorded = room
        .night_actions
        .ordered(&room.player_ids())
        .into_iter()
        .map(|(actor, action)| (actor.clone(), action.clone()))
        .collect();
    let (protected, kill) = plan(&eligible_actions(room, recorded));
    kill.filter(|target| protected.as_ref() != Some(target) && room.is_alive(target))
}

/// Seals the room's night actions and applies them.
pub fn resolve_night(room: &mut Room) -> NightOutcome {
    let order = room.player_ids();
    let sealed = room.night_actions.seal(&order);
    let actions = eligible_actions(room, sealed);
    let mut outcome = NightOutcome::default();

    room.last_night_kill = None;
    let (protected, kill) = plan(&actions);
    room.last_protected = protected.clone();
    outcome.protected = protected;

    if let Some(target) = kill {
        if room.last_protected.as_ref() == Some(&target) {
            debug!(room = %room.code, %target, "kill blocked by protection");
        } else if let Some(victim) = room.player_mut(&target).filter(|p| p.alive) {
            victim.alive = false;
            room.last_night_kill = Some(target);
        }
    }

    for (seer, action) in &actions {
        let NightAction::Inspect { target } = action else {
            continue;
        };
        match room.player(target) {
            Some(p) if p.is_bot => {
                debug!(room = %room.code, %seer, %target, "inspection of a bot withheld");
            }
            Some(p) => {
                if let Some(role) = p.role {
                    outcome.reveals.push(Reveal {
                        seer: seer.clone(),
                        target: target.clone(),
                        role,
                    });
                }
            }
            None => {}
        }
    }

    for (witch, action) in &actions {
        match action {
            NightAction::Heal { target } => {
                outcome.saved = heal(room, witch, target.as_deref());
            }
            NightAction::Poison { target } => {
                outcome.poisoned = poison(room, witch, target);
            }
            _ => {}
        }
    }

    outcome.killed = room.last_night_kill.clone();
    outcome
}

fn heal(room: &mut Room, witch: &str, target: Option<&str>) -> Option<PlayerId> {
    let has_potion = room.player(witch).map_or(false, |w| w.potions.heal);
    let victim = room.last_night_kill.clone()?;
    if !has_potion || target.map_or(false, |t| t != victim) {
        return None;
    }

    if let Some(p) = room.player_mut(&victim) {
        p.alive = true;
    }
    if let Some(w) = room.player_mut(witch) {
        w.potions.heal = false;
    }
    room.last_night_kill = None;
    Some(victim)
}

fn poison(room: &mut Room, witch: &str, target: &str) -> Option<PlayerId> {
    let has_potion = room.player(witch).map_or(false, |w| w.potions.poison);
    if !has_potion || !room.is_alive(target) {
        return None;
    }

    if let Some(p) = room.player_mut(target) {
        p.alive = false;
    }
    if let Some(w) = room.player_mut(witch) {
        w.potions.poison = false;
    }
    Some(target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{room_with_roles, submit};
    use crate::models::room::RoomState;

    fn classic() -> Room {
        let mut room = room_with_roles(&[
            ("wolf", Role::Werewolf),
            ("seer", Role::Seer),
            ("witch", Role::Witch),
            ("vill", Role::Villager),
        ]);
        room.state = RoomState::Night;
        room
    }

    fn kill(target: &str) -> NightAction {
        NightAction::Kill {
            target: target.to_string(),
        }
    }

    #[test]
    fn unprotected_unhealed_target_dies() {
        let mut room = classic();
        submit(&mut room, "wolf", kill("vill"));

        let outcome = resolve_night(&mut room);

        assert!(!room.is_alive("vill"));
        assert_eq!(room.last_night_kill.as_deref(), Some("vill"));
        assert_eq!(outcome.killed.as_deref(), Some("vill"));
        assert!(room.night_actions.is_empty());
    }

    #[test]
    fn witch_heal_without_target_saves_the_victim() {
        let mut room = classic();
        submit(&mut room, "wolf", kill("vill"));
        submit(&mut room, "witch", NightAction::Heal { target: None });

        let outcome = resolve_night(&mut room);

        assert!(room.is_alive("vill"));
        assert_eq!(room.last_night_kill, None);
        assert_eq!(outcome.saved.as_deref(), Some("vill"));
        assert_eq!(outcome.killed, None);
        assert!(!room.player("witch").unwrap().potions.heal);
    }

    #[test]
    fn heal_aimed_elsewhere_does_nothing() {
        let mut room = classic();
        submit(&mut room, "wolf", kill("vill"));
        submit(
            &mut room,
            "witch",
            NightAction::Heal {
                target: Some("seer".to_string()),
            },
        );

        resolve_night(&mut room);

        assert!(!room.is_alive("vill"));
        assert!(room.player("witch").unwrap().potions.heal);
    }

    #[test]
    fn heal_fires_once_per_game() {
        let mut room = classic();
        submit(&mut room, "wolf", kill("vill"));
        submit(&mut room, "witch", NightAction::Heal { target: None });
        resolve_night(&mut room);
        assert!(room.is_alive("vill"));

        submit(&mut room, "wolf", kill("vill"));
        submit(&mut room, "witch", NightAction::Heal { target: None });
        let outcome = resolve_night(&mut room);

        assert!(!room.is_alive("vill"));
        assert_eq!(outcome.saved, None);
        assert!(!room.player("witch").unwrap().potions.heal);
    }

    #[test]
    fn protected_target_never_dies() {
        let mut room = room_with_roles(&[
            ("wolf", Role::Werewolf),
            ("guard", Role::Guard),
            ("vill", Role::Villager),
            ("vill2", Role::Villager),
        ]);
        submit(&mut room, "wolf", kill("vill"));
        submit(
            &mut room,
            "guard",
            NightAction::Protect {
                target: "vill".to_string(),
            },
        );

        let outcome = resolve_night(&mut room);

        assert!(room.is_alive("vill"));
        assert_eq!(room.last_protected.as_deref(), Some("vill"));
        assert_eq!(room.last_night_kill, None);
        assert_eq!(outcome.killed, None);
    }

    #[test]
    fn poison_ignores_protection() {
        let mut room = room_with_roles(&[
            ("wolf", Role::Werewolf),
            ("guard", Role::Guard),
            ("witch", Role::Witch),
            ("vill", Role::Villager),
        ]);
        submit(
            &mut room,
            "guard",
            NightAction::Protect {
                target: "vill".to_string(),
            },
        );
        submit(
            &mut room,
            "witch",
            NightAction::Poison {
                target: "vill".to_string(),
            },
        );

        let outcome = resolve_night(&mut room);

        assert!(!room.is_alive("vill"));
        assert_eq!(outcome.poisoned.as_deref(), Some("vill"));
        assert!(!room.player("witch").unwrap().potions.poison);
    }

    #[test]
    fn kill_tie_goes_to_first_wolf_in_join_order() {
        let mut room = room_with_roles(&[
            ("w1", Role::Werewolf),
            ("w2", Role::Werewolf),
            ("a", Role::Villager),
            ("b", Role::Villager),
            ("c", Role::Villager),
        ]);
        submit(&mut room, "w2", kill("b"));
        submit(&mut room, "w1", kill("a"));

        resolve_night(&mut room);

        assert!(!room.is_alive("a"));
        assert!(room.is_alive("b"));
    }

    #[test]
    fn first_guard_in_join_order_sets_protection() {
        let mut room = room_with_roles(&[
            ("g1", Role::Guard),
            ("g2", Role::Guard),
            ("wolf", Role::Werewolf),
            ("a", Role::Villager),
        ]);
        submit(
            &mut room,
            "g2",
            NightAction::Protect {
                target: "wolf".to_string(),
            },
        );
        submit(
            &mut room,
            "g1",
            NightAction::Protect {
                target: "a".to_string(),
            },
        );
        submit(&mut room, "wolf", kill("a"));

        resolve_night(&mut room);

        assert_eq!(room.last_protected.as_deref(), Some("a"));
        assert!(room.is_alive("a"));
    }

    #[test]
    fn actions_from_wrong_role_or_dead_actor_are_ignored() {
        let mut room = classic();
        room.player_mut("wolf").unwrap().alive = false;
        room.player_mut("seer").unwrap().alive = true;
        submit(&mut room, "wolf", kill("vill"));
        submit(&mut room, "seer", kill("witch"));

        let outcome = resolve_night(&mut room);

        assert!(room.is_alive("vill"));
        assert!(room.is_alive("witch"));
        assert_eq!(outcome, NightOutcome::default());
    }

    #[test]
    fn inspection_reveals_role_but_not_for_bots() {
        let mut room = classic();
        room.player_mut("vill").unwrap().is_bot = true;
        submit(
            &mut room,
            "seer",
            NightAction::Inspect {
                target: "wolf".to_string(),
            },
        );
        let outcome = resolve_night(&mut room);
        assert_eq!(
            outcome.reveals,
            vec![Reveal {
                seer: "seer".to_string(),
                target: "wolf".to_string(),
                role: Role::Werewolf,
            }]
        );

        submit(
            &mut room,
            "seer",
            NightAction::Inspect {
                target: "vill".to_string(),
            },
        );
        let outcome = resolve_night(&mut room);
        assert!(outcome.reveals.is_empty());
    }

    #[test]
    fn missing_targets_are_no_ops() {
        let mut room = classic();
        submit(&mut room, "wolf", kill("nobody"));
        submit(
            &mut room,
            "witch",
            NightAction::Poison {
                target: "nobody".to_string(),
            },
        );

        let outcome = resolve_night(&mut room);

        assert_eq!(room.alive_players().count(), 4);
        assert!(room.player("witch").unwrap().potions.poison);
        assert_eq!(outcome.deaths().count(), 0);
    }

    #[test]
    fn pending_kill_previews_the_tally() {
        let mut room = classic();
        assert_eq!(pending_kill(&room), None);
        submit(&mut room, "wolf", kill("seer"));
        assert_eq!(pending_kill(&room).as_deref(), Some("seer"));
        assert_eq!(room.night_actions.len(), 1);
    }
}
