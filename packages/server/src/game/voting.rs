use tracing::debug;

use crate::models::{player::PlayerId, room::Room};

use super::collector::plurality;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayOutcome {
    pub eliminated: Option<PlayerId>,
    pub ballots: usize,
}

/// Seals the day's votes and eliminates the plurality target.
///
/// Ballots from dead voters are discarded; every other ballot counts, even
/// one naming a dead player or a stranger. A winning target that is not an
/// alive member is spared. Ties go to the target that shows up first when
/// ballots are read in the voters' join order.
pub fn resolve_day(room: &mut Room) -> DayOutcome {
    let order = room.player_ids();
    let ballots: Vec<PlayerId> = room
        .votes
        .seal(&order)
        .into_iter()
        .filter(|(voter, _)| room.is_alive(voter))
        .map(|(_, target)| target)
        .collect();

    let eliminated = plurality(&ballots).filter(|target| room.is_alive(target));
    match &eliminated {
        Some(target) => {
            if let Some(p) = room.player_mut(target) {
                p.alive = false;
            }
            debug!(room = %room.code, %target, ballots = ballots.len(), "day vote eliminated player");
        }
        None if !ballots.is_empty() => {
            debug!(room = %room.code, ballots = ballots.len(), "day vote eliminated nobody");
        }
        None => {}
    }

    DayOutcome {
        eliminated,
        ballots: ballots.len(),
    }
}
