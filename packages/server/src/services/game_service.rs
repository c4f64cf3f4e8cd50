use tracing::{debug, info};

use crate::{
    error::GameError,
    game::role_assignment,
    models::{
        action::NightAction,
        chat::ChatMessage,
        event::ServerEvent,
        room::{Room, RoomState},
    },
    services::scheduler,
    state::AppState,
};

/// Deals roles and opens the first night.
pub async fn start_game(state: &AppState, code: &str) -> Result<Room, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(code).ok_or_else(|| GameError::room(code))?;

    if room.state.is_running() {
        return Err(GameError::GameInProgress);
    }
    let required = state.config.min_players;
    if room.players.len() < required {
        return Err(GameError::InsufficientPlayers {
            present: room.players.len(),
            required,
        });
    }

    role_assignment::assign_roles(room, &mut rand::thread_rng());
    room.state = RoomState::Night;
    room.round = 0;
    room.winner = None;
    room.votes.clear();
    room.night_actions.clear();
    room.last_protected = None;
    room.last_night_kill = None;
    info!(room = %code, players = room.players.len(), "game started");

    state.notifier.broadcast_room(room);
    for player in room.players.iter().filter(|p| !p.is_bot) {
        if let Some(role) = player.role {
            state
                .notifier
                .send_to(&player.id, ServerEvent::YourRole { role });
        }
    }
    scheduler::enter_phase(state, room);
    let snapshot = room.clone();

    if state.config.auto_advance_phases {
        scheduler::start(state, code).await;
    }
    Ok(snapshot)
}

fn ensure_member(room: &Room, player_id: &str) -> Result<(), GameError> {
    if room.contains(player_id) {
        Ok(())
    } else {
        Err(GameError::NotFound(format!("player {}", player_id)))
    }
}

/// Records a night action for `actor`. Outside the night it is dropped.
pub async fn submit_night_action(
    state: &AppState,
    code: &str,
    actor: &str,
    action: NightAction,
) -> Result<(), GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(code).ok_or_else(|| GameError::room(code))?;
    ensure_member(room, actor)?;

    if room.state != RoomState::Night {
        debug!(room = %code, %actor, "night action outside the night ignored");
        return Ok(());
    }
    debug!(room = %code, %actor, ?action, "night action recorded");
    room.night_actions.record(actor.to_string(), action);
    Ok(())
}

/// Records a day vote and returns the number of ballots cast so far.
pub async fn submit_vote(
    state: &AppState,
    code: &str,
    voter: &str,
    target: &str,
) -> Result<usize, GameError> {
    if target.trim().is_empty() {
        return Err(GameError::InvalidTarget(target.to_string()));
    }
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(code).ok_or_else(|| GameError::room(code))?;
    ensure_member(room, voter)?;

    if room.state != RoomState::Day {
        debug!(room = %code, %voter, "vote outside the day ignored");
        return Ok(room.votes.len());
    }
    room.votes.record(voter.to_string(), target.to_string());
    let count = room.votes.len();
    state
        .notifier
        .broadcast(room, ServerEvent::VotesUpdate { count });
    Ok(count)
}

/// Relays a chat line to the room unchanged.
pub async fn chat(state: &AppState, code: &str, from: &str, msg: String) -> Result<(), GameError> {
    let rooms = state.rooms.lock().await;
    let room = rooms.get(code).ok_or_else(|| GameError::room(code))?;
    let name = room
        .player(from)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "Player".to_string());
    let message = ChatMessage::new(from.to_string(), name, msg);
    state.notifier.broadcast(room, ServerEvent::Chat { message });
    Ok(())
}

pub async fn get_game_state(state: &AppState, code: &str) -> Result<Room, GameError> {
    let rooms = state.rooms.lock().await;
    rooms.get(code).cloned().ok_or_else(|| GameError::room(code))
}
