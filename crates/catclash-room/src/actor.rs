//! Room actor: an isolated Tokio task that owns one match.
//!
//! Each room runs in its own task and communicates with the outside world
//! through an mpsc channel, so the periodic tick and inbound actions for
//! the same room never execute concurrently — they interleave at the
//! `select!` boundary and nowhere else. Different rooms are fully
//! independent tasks.

use std::time::Duration;

use catclash_protocol::{PlayerId, Recipient, RoomId, ServerEvent};
use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};

use crate::room::EventSink;
use crate::{GameConfig, PlayerAction, Room, RoomError};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Commands sent to a room actor through its channel. The `oneshot`
/// senders are reply channels: the caller awaits the room's verdict.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Act {
        player_id: PlayerId,
        action: PlayerAction,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    /// Reply carries the remaining seat count so the caller can destroy
    /// an emptied room.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone — it's just an
/// `mpsc::Sender` wrapper.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Seats a participant in the room.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: impl Into<String>,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                name: name.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Routes one gameplay intent to the room.
    pub async fn act(
        &self,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Act {
                player_id,
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Removes a participant; returns how many remain.
    pub async fn leave(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Tells the room actor to stop.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The room actor: owns the [`Room`] and its tick timer.
pub(crate) struct RoomActor {
    room: Room,
    receiver: mpsc::Receiver<RoomCommand>,
    /// Events the room emitted through its sink, awaiting fan-out.
    staged: mpsc::UnboundedReceiver<crate::Outbound>,
    /// Resolved `(recipient, event)` pairs, consumed by the dispatcher.
    outbound: mpsc::UnboundedSender<(PlayerId, ServerEvent)>,
    /// Present iff the match is Active.
    ticker: Option<time::Interval>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands and ticks until shutdown.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room.id(), "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    match cmd {
                        RoomCommand::Join { player_id, name, reply } => {
                            let _ = reply.send(self.room.join(player_id, name));
                        }
                        RoomCommand::Act { player_id, action, reply } => {
                            let result = self.room.apply(player_id, action);
                            if let Err(error) = &result {
                                tracing::debug!(
                                    room_id = %self.room.id(),
                                    %player_id,
                                    %error,
                                    "action rejected"
                                );
                            }
                            let _ = reply.send(result);
                        }
                        RoomCommand::Leave { player_id, reply } => {
                            let _ = reply.send(self.room.leave(player_id));
                        }
                        RoomCommand::Shutdown => {
                            tracing::info!(room_id = %self.room.id(), "room shutting down");
                            break;
                        }
                    }
                }
                _ = tick_fired(&mut self.ticker) => {
                    self.room.tick();
                }
            }

            self.flush_outbound();
            self.sync_ticker();
        }

        tracing::info!(room_id = %self.room.id(), "room actor stopped");
    }

    /// Resolves staged events against current membership and forwards
    /// them to the dispatcher's fan-out channel.
    fn flush_outbound(&mut self) {
        while let Ok(out) = self.staged.try_recv() {
            match out.to {
                Recipient::All => {
                    for pid in self.room.player_ids() {
                        let _ = self.outbound.send((pid, out.event.clone()));
                    }
                }
                Recipient::Player(pid) => {
                    let _ = self.outbound.send((pid, out.event));
                }
                Recipient::AllExcept(excluded) => {
                    for pid in self
                        .room
                        .player_ids()
                        .into_iter()
                        .filter(|p| *p != excluded)
                    {
                        let _ = self.outbound.send((pid, out.event.clone()));
                    }
                }
            }
        }
    }

    /// Keeps the tick timer in lockstep with the phase: armed exactly on
    /// Waiting→Active, dropped exactly once on Active→Ended. Dropping the
    /// interval is the cancellation; a second call is a no-op.
    fn sync_ticker(&mut self) {
        match (&self.ticker, self.room.phase().is_active()) {
            (None, true) => {
                let period = self.room.config().tick_period;
                let jitter = first_tick_jitter(self.room.config().tick_jitter);
                let mut interval = time::interval_at(time::Instant::now() + period + jitter, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.ticker = Some(interval);
                tracing::debug!(room_id = %self.room.id(), "tick loop armed");
            }
            (Some(_), false) => {
                self.ticker = None;
                tracing::debug!(room_id = %self.room.id(), "tick loop stopped");
            }
            _ => {}
        }
    }
}

/// Resolves when the next tick is due. With no timer armed (match not
/// running) this pends forever, but `select!` still serves commands.
async fn tick_fired(ticker: &mut Option<time::Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Random delay added to a room's first tick so rooms created in the same
/// instant don't all fire together.
fn first_tick_jitter(max: Duration) -> Duration {
    let max_us = max.as_micros() as u64;
    if max_us == 0 {
        Duration::ZERO
    } else {
        Duration::from_micros(rand::rng().random_range(0..max_us))
    }
}

/// Spawns a new room actor task and returns a handle to communicate with
/// it. Emitted events are resolved per recipient and pushed into
/// `outbound` — the broadcast callback wired in by the dispatcher.
pub fn spawn_room(
    room_id: RoomId,
    config: GameConfig,
    outbound: mpsc::UnboundedSender<(PlayerId, ServerEvent)>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);
    let (stage_tx, stage_rx) = mpsc::unbounded_channel();
    let sink: EventSink = Box::new(move |out| {
        let _ = stage_tx.send(out);
    });

    let actor = RoomActor {
        room: Room::new(room_id, config, sink),
        receiver: rx,
        staged: stage_rx,
        outbound,
        ticker: None,
    };
    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
