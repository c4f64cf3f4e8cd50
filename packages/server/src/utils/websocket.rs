use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::GameError,
    models::event::{ClientMessage, ServerEvent},
    services::{game_service, room_service},
    state::AppState,
};

pub async fn handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs one request against the room manager; `Ok` carries the ack's room code.
async fn dispatch(
    state: &AppState,
    player_id: &str,
    message: ClientMessage,
) -> Result<Option<String>, GameError> {
    match message {
        ClientMessage::CreateRoom { name } => {
            let room = room_service::create_room(state, player_id, name).await?;
            Ok(Some(room.code))
        }
        ClientMessage::JoinRoom { code, name } => {
            room_service::join_room(state, &code, player_id, name).await?;
            Ok(Some(code))
        }
        ClientMessage::BecomeBot { code, bot_name } => {
            room_service::become_bot(state, &code, bot_name).await?;
            Ok(Some(code))
        }
        ClientMessage::LeaveRoom { code } => {
            room_service::leave_room(state, &code, player_id).await?;
            Ok(None)
        }
        ClientMessage::SetReady { code, ready } => {
            room_service::set_ready(state, &code, player_id, ready).await?;
            Ok(None)
        }
        ClientMessage::UpdateSettings { code, settings } => {
            room_service::update_settings(state, &code, player_id, settings).await?;
            Ok(None)
        }
        ClientMessage::StartGame { code } => {
            game_service::start_game(state, &code).await?;
            Ok(None)
        }
        ClientMessage::NightAction { code, action } => {
            game_service::submit_night_action(state, &code, player_id, action).await?;
            Ok(None)
        }
        ClientMessage::Vote { code, target } => {
            game_service::submit_vote(state, &code, player_id, &target).await?;
            Ok(None)
        }
        ClientMessage::Chat { code, msg } => {
            game_service::chat(state, &code, player_id, msg).await?;
            Ok(None)
        }
    }
}

pub async fn handle_socket(ws: WebSocket, state: AppState) {
    let player_id = Uuid::new_v4().to_string();
    info!(player = %player_id, "websocket connected");

    let (mut sender, mut receiver) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    state.notifier.register(player_id.clone(), tx.clone());
    let _ = tx.send(ServerEvent::Welcome {
        player_id: player_id.clone(),
    });

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let reply = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(request) => match dispatch(&state, &player_id, request).await {
                Ok(code) => ServerEvent::Ack { code },
                Err(e) => ServerEvent::Error {
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                },
            },
            Err(e) => ServerEvent::Error {
                kind: "badRequest".to_string(),
                message: e.to_string(),
            },
        };
        if tx.send(reply).is_err() {
            break;
        }
    }

    state.notifier.unregister(&player_id);
    let rooms = room_service::disconnect(&state, &player_id).await;
    send_task.abort();
    info!(player = %player_id, rooms = rooms.len(), "websocket disconnected");
}
