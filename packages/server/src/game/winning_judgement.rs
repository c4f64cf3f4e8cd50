use tracing::info;

use crate::models::{
    role::{Faction, Role},
    room::{Room, RoomState},
};

/// Judges the alive population. `None` means the game goes on.
pub fn judge(room: &Room) -> Option<Faction> {
    let (wolves, alive) = room.alive_players().fold((0usize, 0usize), |(w, a), p| {
        (w + usize::from(p.role == Some(Role::Werewolf)), a + 1)
    });
    let others = alive - wolves;

    if wolves == 0 {
        Some(Faction::Villagers)
    } else if wolves >= others {
        Some(Faction::Werewolves)
    } else {
        None
    }
}

/// Ends the game if a faction has won.
///
/// Returns the winner only on the call that actually ends the game, so a
/// repeated evaluation never announces the result twice.
pub fn conclude(room: &mut Room) -> Option<Faction> {
    if room.state == RoomState::Ended {
        return None;
    }
    let winner = judge(room)?;
    room.state = RoomState::Ended;
    room.winner = Some(winner);
    info!(room = %room.code, %winner, "game over");
    Some(winner)
}
