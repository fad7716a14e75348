//! End-to-end tests: real WebSocket clients against a running server.

use std::time::Duration;

use catclash_protocol::{PlayerId, ServerEvent};
use catclash_server::Server;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn start_server() -> String {
    let server = Server::builder().bind("127.0.0.1:0").build().await.unwrap();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    addr
}

async fn connect(addr: &str) -> Ws {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    ws
}

async fn send(ws: &mut Ws, event: &str, data: serde_json::Value) {
    let envelope = json!({ "event": event, "data": data });
    ws.send(Message::text(envelope.to_string())).await.unwrap();
}

/// Reads events until one matches `pred`, skipping everything else.
async fn expect_event(ws: &mut Ws, pred: impl Fn(&ServerEvent) -> bool) -> ServerEvent {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(10), ws.next())
            .await
            .expect("timed out waiting for event")
            .expect("connection closed")
            .expect("websocket error");
        if matches!(msg, Message::Ping(_) | Message::Pong(_)) {
            continue;
        }
        let event: ServerEvent = serde_json::from_slice(&msg.into_data()).unwrap();
        if pred(&event) {
            return event;
        }
    }
}

/// Connects and returns the socket plus the server-assigned id.
async fn connect_and_greet(addr: &str) -> (Ws, PlayerId) {
    let mut ws = connect(addr).await;
    let greeting = expect_event(&mut ws, |e| matches!(e, ServerEvent::Connected { .. })).await;
    let ServerEvent::Connected { player_id, .. } = greeting else {
        unreachable!()
    };
    (ws, player_id)
}

/// Two clients joined into one room with the match started.
async fn start_match(addr: &str) -> (Ws, PlayerId, Ws, PlayerId) {
    let (mut p1, id1) = connect_and_greet(addr).await;
    let (mut p2, id2) = connect_and_greet(addr).await;

    send(&mut p1, "player:join", json!({ "playerName": "Misu" })).await;
    expect_event(&mut p1, |e| matches!(e, ServerEvent::RoomState { .. })).await;
    send(&mut p2, "player:join", json!({ "playerName": "Garfield" })).await;
    expect_event(&mut p2, |e| matches!(e, ServerEvent::RoomState { .. })).await;

    send(&mut p1, "player:ready", json!({})).await;
    send(&mut p2, "player:ready", json!({})).await;

    expect_event(&mut p1, |e| matches!(e, ServerEvent::GameStart {})).await;
    expect_event(&mut p2, |e| matches!(e, ServerEvent::GameStart {})).await;

    (p1, id1, p2, id2)
}

#[tokio::test]
async fn test_connection_receives_assigned_identity() {
    let addr = start_server().await;
    let (_ws, player_id) = connect_and_greet(&addr).await;
    assert!(player_id.0 > 0);
}

#[tokio::test]
async fn test_two_players_pair_and_both_receive_game_start() {
    let addr = start_server().await;
    let _ = start_match(&addr).await;
}

#[tokio::test]
async fn test_click_yields_player_update_with_earnings() {
    let addr = start_server().await;
    let (mut p1, id1, mut p2, _id2) = start_match(&addr).await;

    send(&mut p1, "player:click", json!({})).await;

    // Base click power 1 on top of initial 50 money. Passive income is 0,
    // so 51 can only come from the click.
    let update = expect_event(&mut p1, |e| {
        matches!(e, ServerEvent::PlayerUpdate { player_id, player }
            if *player_id == id1 && player.money >= 51.0)
    })
    .await;
    if let ServerEvent::PlayerUpdate { player, .. } = update {
        assert_eq!(player.money, 51.0);
    }

    // The opponent sees the same payload mirrored as an enemy update.
    expect_event(&mut p2, |e| {
        matches!(e, ServerEvent::EnemyUpdate { player_id, player }
            if *player_id == id1 && player.money >= 51.0)
    })
    .await;
}

#[tokio::test]
async fn test_unaffordable_purchase_reports_error_to_buyer() {
    let addr = start_server().await;
    let (mut p1, _id1, _p2, _id2) = start_match(&addr).await;

    // cat_tower costs 10000, starting money is 50.
    send(&mut p1, "player:buy_upgrade", json!({ "upgradeId": "cat_tower" })).await;
    let error = expect_event(&mut p1, |e| matches!(e, ServerEvent::Error { .. })).await;
    assert!(matches!(
        error,
        ServerEvent::Error { message } if message.contains("money")
    ));
}

#[tokio::test]
async fn test_intent_before_joining_any_room_is_an_error() {
    let addr = start_server().await;
    let (mut ws, _player_id) = connect_and_greet(&addr).await;

    send(&mut ws, "player:click", json!({})).await;
    let error = expect_event(&mut ws, |e| matches!(e, ServerEvent::Error { .. })).await;
    assert!(matches!(
        error,
        ServerEvent::Error { message } if message.contains("room")
    ));
}

#[tokio::test]
async fn test_blank_player_name_is_rejected() {
    let addr = start_server().await;
    let (mut ws, _player_id) = connect_and_greet(&addr).await;

    send(&mut ws, "player:join", json!({ "playerName": "   " })).await;
    expect_event(&mut ws, |e| {
        matches!(e, ServerEvent::Error { message } if message.contains("name"))
    })
    .await;
}

#[tokio::test]
async fn test_malformed_envelope_keeps_connection_usable() {
    let addr = start_server().await;
    let (mut ws, _player_id) = connect_and_greet(&addr).await;

    ws.send(Message::text("this is not an envelope")).await.unwrap();
    expect_event(&mut ws, |e| matches!(e, ServerEvent::Error { .. })).await;

    // The connection survived the protocol failure.
    send(&mut ws, "player:join", json!({ "playerName": "Misu" })).await;
    expect_event(&mut ws, |e| matches!(e, ServerEvent::RoomState { .. })).await;
}

#[tokio::test]
async fn test_disconnect_mid_match_crowns_survivor() {
    let addr = start_server().await;
    let (mut p1, id1, p2, id2) = start_match(&addr).await;

    drop(p2);

    // Both notifications must arrive; their relative order is not part of
    // the contract.
    let mut saw_end = false;
    let mut saw_disconnect = false;
    while !(saw_end && saw_disconnect) {
        match expect_event(&mut p1, |_| true).await {
            ServerEvent::GameEnd { winner_id, .. } => {
                assert_eq!(winner_id, id1);
                saw_end = true;
            }
            ServerEvent::PlayerDisconnected { player_id, .. } => {
                assert_eq!(player_id, id2);
                saw_disconnect = true;
            }
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_third_player_gets_a_fresh_room() {
    let addr = start_server().await;
    let (_p1, _id1, _p2, _id2) = start_match(&addr).await;

    // The first room is full and running; a third join opens a new room.
    let (mut p3, _id3) = connect_and_greet(&addr).await;
    send(&mut p3, "player:join", json!({ "playerName": "Tom" })).await;
    let state = expect_event(&mut p3, |e| matches!(e, ServerEvent::RoomState { .. })).await;
    if let ServerEvent::RoomState { game_state } = state {
        assert!(!game_state.game_started);
        assert_eq!(game_state.players.len(), 1);
    }
}

#[tokio::test]
async fn test_passive_energy_accrues_over_ticks() {
    let addr = start_server().await;
    let (mut p1, id1, _p2, _id2) = start_match(&addr).await;

    // Base regeneration is 1 energy per second from 100; any update above
    // the starting value proves the tick loop is feeding broadcasts.
    expect_event(&mut p1, |e| {
        matches!(e, ServerEvent::PlayerUpdate { player_id, player }
            if *player_id == id1 && player.energy > 100.0)
    })
    .await;
}
