use werewolf_server::{
    error::GameError,
    models::{
        player::Potions,
        role::Role,
        room::{RoomState, SettingsPatch},
    },
    services::{game_service, room_service},
    state::AppState,
    utils::test_setup::test_state,
};

/// Creates a room hosted by "p1" and joins p2..=pN.
async fn setup_room(state: &AppState, players: usize) -> String {
    let room = room_service::create_room(state, "p1", Some("Player1".to_string()))
        .await
        .unwrap();
    for i in 2..=players {
        room_service::join_room(state, &room.code, &format!("p{}", i), Some(format!("Player{}", i)))
            .await
            .unwrap();
    }
    room.code
}

#[tokio::test]
async fn test_create_room_records_settings() {
    let (state, store) = test_state();
    let room = room_service::create_room(&state, "host", None).await.unwrap();

    assert_eq!(room.code.len(), 6);
    assert_eq!(room.host, "host");
    assert_eq!(room.state, RoomState::Lobby);
    assert_eq!(room.players.len(), 1);
    assert_eq!(room.players[0].name, "Player");
    assert!(room.players[0].role.is_none());
    assert!(store.snapshot().rooms.contains_key(&room.code));
}

#[tokio::test]
async fn test_join_unknown_room_is_not_found() {
    let (state, _) = test_state();
    let result = room_service::join_room(&state, "XXXXXX", "p1", None).await;
    assert!(matches!(result, Err(GameError::NotFound(_))));
}

#[tokio::test]
async fn test_join_twice_keeps_one_seat() {
    let (state, _) = test_state();
    let code = setup_room(&state, 2).await;
    let room = room_service::join_room(&state, &code, "p2", None).await.unwrap();
    assert_eq!(room.players.len(), 2);
}

#[tokio::test]
async fn test_host_leaving_hands_over_host() {
    let (state, _) = test_state();
    let code = setup_room(&state, 3).await;

    let room = room_service::leave_room(&state, &code, "p1")
        .await
        .unwrap()
        .expect("room should survive");

    assert_eq!(room.host, "p2");
    assert_eq!(room.players.len(), 2);
}

#[tokio::test]
async fn test_last_member_leaving_destroys_room() {
    let (state, store) = test_state();
    let code = setup_room(&state, 1).await;

    let result = room_service::leave_room(&state, &code, "p1").await.unwrap();

    assert!(result.is_none());
    assert!(state.rooms.lock().await.get(&code).is_none());
    assert!(!store.snapshot().rooms.contains_key(&code));
}

#[tokio::test]
async fn test_leaving_mid_night_keeps_room_for_others() {
    let (state, store) = test_state();
    let code = setup_room(&state, 4).await;
    game_service::start_game(&state, &code).await.unwrap();

    let room = room_service::leave_room(&state, &code, "p4")
        .await
        .unwrap()
        .expect("others remain");

    assert_eq!(room.state, RoomState::Night);
    assert_eq!(room.players.len(), 3);
    assert!(store.snapshot().rooms.contains_key(&code));
}

#[tokio::test]
async fn test_leaving_room_you_are_not_in() {
    let (state, _) = test_state();
    let code = setup_room(&state, 2).await;
    let result = room_service::leave_room(&state, &code, "stranger").await;
    assert!(matches!(result, Err(GameError::NotFound(_))));
}

#[tokio::test]
async fn test_only_host_updates_settings() {
    let (state, store) = test_state();
    let code = setup_room(&state, 2).await;

    let patch = SettingsPatch {
        day_duration_seconds: Some(90),
        role_pool: Some(vec![Role::Werewolf, Role::Seer]),
        ..Default::default()
    };
    let denied = room_service::update_settings(&state, &code, "p2", patch.clone()).await;
    assert_eq!(denied.unwrap_err(), GameError::PermissionDenied);
    assert_eq!(
        state.rooms.lock().await[&code].settings.day_duration_seconds,
        60
    );

    let room = room_service::update_settings(&state, &code, "p1", patch)
        .await
        .unwrap();
    assert_eq!(room.settings.day_duration_seconds, 90);
    assert_eq!(room.settings.night_duration_seconds, 30);
    assert_eq!(room.settings.role_pool, vec![Role::Werewolf, Role::Seer]);
    assert_eq!(
        store.snapshot().rooms[&code].settings.day_duration_seconds,
        90
    );
}

#[tokio::test]
async fn test_set_ready() {
    let (state, _) = test_state();
    let code = setup_room(&state, 2).await;
    let room = room_service::set_ready(&state, &code, "p2", true).await.unwrap();
    assert!(room.player("p2").unwrap().ready);
    assert!(!room.player("p1").unwrap().ready);
}

#[tokio::test]
async fn test_become_bot_adds_ready_bot() {
    let (state, _) = test_state();
    let code = setup_room(&state, 1).await;

    let room = room_service::become_bot(&state, &code, Some("Robo".to_string()))
        .await
        .unwrap();

    let bot = &room.players[1];
    assert!(bot.is_bot);
    assert!(bot.ready);
    assert!(bot.alive);
    assert_eq!(bot.name, "Robo");
    assert_eq!(room.bot_ids, vec![bot.id.clone()]);
}

#[tokio::test]
async fn test_disconnect_in_lobby_removes_player() {
    let (state, _) = test_state();
    let code = setup_room(&state, 3).await;

    let rooms = room_service::disconnect(&state, "p2").await;

    assert_eq!(rooms, vec![code.clone()]);
    let room = room_service::get_room_info(&state, &code).await.unwrap();
    assert_eq!(room.players.len(), 2);
    assert!(room.bot_ids.is_empty());
}

#[tokio::test]
async fn test_disconnect_mid_game_substitutes_bot() {
    let (state, _) = test_state();
    let code = setup_room(&state, 4).await;
    game_service::start_game(&state, &code).await.unwrap();
    {
        let mut rooms = state.rooms.lock().await;
        let p3 = rooms.get_mut(&code).unwrap().player_mut("p3").unwrap();
        p3.role = Some(Role::Witch);
        p3.alive = false;
        p3.potions = Potions {
            heal: false,
            poison: true,
        };
    }

    room_service::disconnect(&state, "p3").await;

    let room = room_service::get_room_info(&state, &code).await.unwrap();
    assert_eq!(room.players.len(), 4);
    let bot = &room.players[2];
    assert!(bot.is_bot);
    assert_eq!(bot.name, "Player3 (bot)");
    assert_eq!(bot.role, Some(Role::Witch));
    assert!(!bot.alive);
    assert_eq!(
        bot.potions,
        Potions {
            heal: false,
            poison: true
        }
    );
    assert!(room.bot_ids.contains(&bot.id));
    assert!(room.player("p3").is_none());
}

#[tokio::test]
async fn test_disconnecting_host_mid_game_moves_host_to_a_human() {
    let (state, _) = test_state();
    let code = setup_room(&state, 4).await;
    game_service::start_game(&state, &code).await.unwrap();

    room_service::disconnect(&state, "p1").await;

    let room = room_service::get_room_info(&state, &code).await.unwrap();
    assert_eq!(room.host, "p2");
    assert_eq!(room.players.len(), 4);
}

#[tokio::test]
async fn test_late_joiner_spectates() {
    let (state, _) = test_state();
    let code = setup_room(&state, 4).await;
    game_service::start_game(&state, &code).await.unwrap();

    let room = room_service::join_room(&state, &code, "late", None).await.unwrap();

    let late = room.player("late").unwrap();
    assert!(!late.alive);
    assert!(late.role.is_none());
}
