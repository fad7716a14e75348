//! Integration tests for the room actor: commands and the tick loop
//! interleaving through one serialized task.

use std::time::Duration;

use catclash_protocol::{PlayerId, RoomId, ServerEvent};
use catclash_room::{GameConfig, PlayerAction, RoomError, spawn_room};
use tokio::sync::mpsc;

const P1: PlayerId = PlayerId(1);
const P2: PlayerId = PlayerId(2);

type OutboundRx = mpsc::UnboundedReceiver<(PlayerId, ServerEvent)>;

/// Deterministic test config: no first-tick jitter.
fn test_config() -> GameConfig {
    GameConfig {
        tick_jitter: Duration::ZERO,
        ..GameConfig::default()
    }
}

/// Receives outbound events until `pred` matches one addressed to `pid`.
/// Panics after a generous timeout so a missing event fails loudly.
async fn expect_event(
    rx: &mut OutboundRx,
    pid: PlayerId,
    pred: impl Fn(&ServerEvent) -> bool,
) -> ServerEvent {
    loop {
        let (to, event) = tokio::time::timeout(Duration::from_secs(30), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("outbound channel closed");
        if to == pid && pred(&event) {
            return event;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_join_ready_start_flow() {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let handle = spawn_room(RoomId(1), test_config(), out_tx);

    handle.join(P1, "Misu").await.unwrap();
    handle.join(P2, "Garfield").await.unwrap();
    handle.act(P1, PlayerAction::Ready).await.unwrap();
    handle.act(P2, PlayerAction::Ready).await.unwrap();

    // Both participants receive the start signal.
    expect_event(&mut out_rx, P1, |e| matches!(e, ServerEvent::GameStart {})).await;
    expect_event(&mut out_rx, P2, |e| matches!(e, ServerEvent::GameStart {})).await;
}

#[tokio::test(start_paused = true)]
async fn test_join_full_room_is_rejected() {
    let (out_tx, _out_rx) = mpsc::unbounded_channel();
    let handle = spawn_room(RoomId(1), test_config(), out_tx);

    handle.join(P1, "Misu").await.unwrap();
    handle.join(P2, "Garfield").await.unwrap();

    let result = handle.join(PlayerId(3), "Tom").await;
    assert!(matches!(result, Err(RoomError::RoomFull(_))));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_action_reports_error_without_side_effects() {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let handle = spawn_room(RoomId(1), test_config(), out_tx);

    handle.join(P1, "Misu").await.unwrap();
    handle.join(P2, "Garfield").await.unwrap();
    handle.act(P1, PlayerAction::Ready).await.unwrap();
    handle.act(P2, PlayerAction::Ready).await.unwrap();
    expect_event(&mut out_rx, P1, |e| matches!(e, ServerEvent::GameStart {})).await;

    let result = handle
        .act(
            P1,
            PlayerAction::BuyUpgrade {
                upgrade_id: "dog_bone".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(RoomError::UnknownUpgrade(_))));
}

#[tokio::test(start_paused = true)]
async fn test_ticks_flow_after_start() {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let handle = spawn_room(RoomId(1), test_config(), out_tx);

    handle.join(P1, "Misu").await.unwrap();
    handle.join(P2, "Garfield").await.unwrap();
    handle.act(P1, PlayerAction::Ready).await.unwrap();
    handle.act(P2, PlayerAction::Ready).await.unwrap();

    // The paused clock auto-advances to the next armed timer, so tick
    // events arrive without real waiting.
    expect_event(&mut out_rx, P1, |e| matches!(e, ServerEvent::GameTick { .. })).await;
    let update = expect_event(&mut out_rx, P1, |e| {
        matches!(e, ServerEvent::PlayerUpdate { player_id, .. } if *player_id == P1)
    })
    .await;
    if let ServerEvent::PlayerUpdate { player, .. } = update {
        // One second of base regeneration: +1 energy, +0 money.
        assert!(player.energy >= 101.0);
    }
}

#[tokio::test(start_paused = true)]
async fn test_leave_mid_match_ends_game_for_survivor() {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let handle = spawn_room(RoomId(1), test_config(), out_tx);

    handle.join(P1, "Misu").await.unwrap();
    handle.join(P2, "Garfield").await.unwrap();
    handle.act(P1, PlayerAction::Ready).await.unwrap();
    handle.act(P2, PlayerAction::Ready).await.unwrap();
    expect_event(&mut out_rx, P2, |e| matches!(e, ServerEvent::GameStart {})).await;

    let remaining = handle.leave(P1).await.unwrap();
    assert_eq!(remaining, 1);

    let end = expect_event(&mut out_rx, P2, |e| matches!(e, ServerEvent::GameEnd { .. })).await;
    assert!(matches!(
        end,
        ServerEvent::GameEnd { winner_id, .. } if winner_id == P2
    ));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_makes_room_unavailable() {
    let (out_tx, _out_rx) = mpsc::unbounded_channel();
    let handle = spawn_room(RoomId(1), test_config(), out_tx);

    handle.join(P1, "Misu").await.unwrap();
    handle.shutdown().await.unwrap();

    // Give the actor task a moment to wind down.
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let result = handle.act(P1, PlayerAction::Click).await;
    assert!(matches!(result, Err(RoomError::Unavailable(_))));
}
