use std::collections::HashMap;

use tracing::info;

use crate::{
    error::GameError,
    game::bot,
    models::{
        player::Player,
        room::{Room, RoomState, SettingsPatch},
    },
    state::AppState,
    utils::ids,
};

fn display_name(name: Option<String>, fallback: &str) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Players arriving after the deal watch until the next game.
fn arriving(mut player: Player, room: &Room) -> Player {
    if room.state != RoomState::Lobby {
        player.alive = false;
    }
    player
}

pub async fn create_room(
    state: &AppState,
    player_id: &str,
    name: Option<String>,
) -> Result<Room, GameError> {
    let mut rooms = state.rooms.lock().await;
    let code = loop {
        let candidate = ids::room_code(&mut rand::thread_rng());
        if !rooms.contains_key(&candidate) {
            break candidate;
        }
    };

    let host = Player::new(player_id.to_string(), display_name(name, "Player"));
    let room = Room::new(code.clone(), host, state.config.default_settings.clone());
    state.store.room_saved(&code, &room.settings);
    state.notifier.broadcast_room(&room);
    info!(room = %code, host = %player_id, "room created");

    rooms.insert(code, room.clone());
    Ok(room)
}

pub async fn join_room(
    state: &AppState,
    code: &str,
    player_id: &str,
    name: Option<String>,
) -> Result<Room, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(code).ok_or_else(|| GameError::room(code))?;

    if !room.contains(player_id) {
        let player = arriving(
            Player::new(player_id.to_string(), display_name(name, "Player")),
            room,
        );
        room.add_player(player);
        info!(room = %code, player = %player_id, "player joined");
    }
    state.notifier.broadcast_room(room);
    Ok(room.clone())
}

pub async fn become_bot(
    state: &AppState,
    code: &str,
    bot_name: Option<String>,
) -> Result<Room, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(code).ok_or_else(|| GameError::room(code))?;

    let bot_id = ids::bot_id(&mut rand::thread_rng());
    let bot = arriving(Player::bot(bot_id.clone(), display_name(bot_name, "Bot")), room);
    room.add_player(bot);
    info!(room = %code, bot = %bot_id, "bot added");

    state.notifier.broadcast_room(room);
    Ok(room.clone())
}

async fn destroy_room(state: &AppState, rooms: &mut HashMap<String, Room>, code: &str) {
    rooms.remove(code);
    state.scheduler.cancel(code).await;
    state.store.room_removed(code);
    info!(room = %code, "room destroyed");
}

/// Removes a member. Returns the room, or `None` if it was destroyed.
pub async fn leave_room(
    state: &AppState,
    code: &str,
    player_id: &str,
) -> Result<Option<Room>, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(code).ok_or_else(|| GameError::room(code))?;
    room.remove_player(player_id)
        .ok_or_else(|| GameError::NotFound(format!("player {}", player_id)))?;
    info!(room = %code, player = %player_id, "player left");

    if room.is_empty() {
        destroy_room(state, &mut rooms, code).await;
        return Ok(None);
    }
    state.notifier.broadcast_room(room);
    Ok(Some(room.clone()))
}

pub async fn set_ready(
    state: &AppState,
    code: &str,
    player_id: &str,
    ready: bool,
) -> Result<Room, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(code).ok_or_else(|| GameError::room(code))?;
    let player = room
        .player_mut(player_id)
        .ok_or_else(|| GameError::NotFound(format!("player {}", player_id)))?;
    player.ready = ready;

    state.notifier.broadcast_room(room);
    Ok(room.clone())
}

pub async fn update_settings(
    state: &AppState,
    code: &str,
    sender: &str,
    patch: SettingsPatch,
) -> Result<Room, GameError> {
    let mut rooms = state.rooms.lock().await;
    let room = rooms.get_mut(code).ok_or_else(|| GameError::room(code))?;
    if room.host != sender {
        return Err(GameError::PermissionDenied);
    }

    room.settings.apply(patch);
    state.store.room_saved(code, &room.settings);
    state.notifier.broadcast_room(room);
    Ok(room.clone())
}

/// Connection loss. In the lobby the player simply leaves; once a game has
/// started a bot takes over the seat so the head count never changes.
///
/// Returns the codes of the rooms the player was in.
pub async fn disconnect(state: &AppState, player_id: &str) -> Vec<String> {
    let mut rooms = state.rooms.lock().await;
    let codes: Vec<String> = rooms
        .iter()
        .filter(|(_, room)| room.contains(player_id))
        .map(|(code, _)| code.clone())
        .collect();

    for code in &codes {
        let Some(room) = rooms.get_mut(code) else {
            continue;
        };
        if room.state == RoomState::Lobby {
            room.remove_player(player_id);
            info!(room = %code, player = %player_id, "player disconnected from lobby");
        } else {
            let bot_id = ids::bot_id(&mut rand::thread_rng());
            room.substitute(player_id, bot_id.clone());
            bot::act(room, &bot_id, &state.config.bot_tuning, &mut rand::thread_rng());
            info!(room = %code, player = %player_id, bot = %bot_id, "bot took over seat");
        }

        if room.is_empty() {
            destroy_room(state, &mut rooms, code).await;
        } else {
            state.notifier.broadcast_room(room);
        }
    }
    codes
}

pub async fn get_rooms(state: &AppState) -> HashMap<String, Room> {
    state.rooms.lock().await.clone()
}

pub async fn get_room_info(state: &AppState, code: &str) -> Result<Room, GameError> {
    let rooms = state.rooms.lock().await;
    rooms.get(code).cloned().ok_or_else(|| GameError::room(code))
}
