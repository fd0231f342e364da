use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use kyx_core::input::InputSnapshot;
use kyx_core::tuning::TuningOverrides;
use kyx_platformer::config::PlatformerConfig;
use kyx_platformer::room::Room;
use kyx_platformer::snapshot::FrameSnapshot;
use kyx_platformer::{SimEvent, Simulation};

/// Commands sent from the input/host side to the session tick loop.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Replace the held-input snapshot used for subsequent ticks.
    Input(InputSnapshot),
    Pause,
    Resume,
    Stop,
}

/// Broadcasts sent from the session tick loop to the renderer/host.
#[derive(Debug, Clone)]
pub enum SessionBroadcast {
    /// One simulated tick.
    Frame {
        tick: u64,
        snapshot: FrameSnapshot,
        events: Vec<SimEvent>,
    },
    /// The player died. Sent once; frames keep coming afterwards.
    GameOver { tick: u64 },
    /// The loop has exited.
    Ended,
}

/// Configuration for one platformer session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub platformer: PlatformerConfig,
    /// Flat author-facing tuning values (`playerMaxHealth`, `dashSpeed`, ...).
    pub custom: HashMap<String, serde_json::Value>,
    /// Custom room layouts; the built-in rooms when `None`.
    pub rooms: Option<Vec<Room>>,
}

impl SessionConfig {
    pub fn new(platformer: PlatformerConfig) -> Self {
        Self {
            platformer,
            custom: HashMap::new(),
            rooms: None,
        }
    }

    fn build_simulation(self) -> Simulation {
        let tuning = TuningOverrides::from_map(&self.custom);
        if !tuning.is_empty() {
            tracing::debug!(?tuning, "Applying tuning overrides");
        }
        let config = self.platformer.with_tuning(&tuning);
        match self.rooms {
            Some(rooms) => Simulation::with_rooms(config, rooms),
            None => Simulation::new(config),
        }
    }
}

/// Spawn a session tick loop as a tokio task.
/// Returns the command sender and broadcast receiver.
pub fn spawn_session(
    config: SessionConfig,
) -> (
    mpsc::UnboundedSender<SessionCommand>,
    mpsc::UnboundedReceiver<SessionBroadcast>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        run_session_loop(config, cmd_rx, broadcast_tx).await;
    });

    (cmd_tx, broadcast_rx, handle)
}

/// Fixed-rate simulation loop. All mutation happens inside `Simulation::tick`;
/// the interval is the only suspension point besides command receipt.
async fn run_session_loop(
    config: SessionConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    broadcast_tx: mpsc::UnboundedSender<SessionBroadcast>,
) {
    let tick_rate = config.platformer.world.tick_rate_hz.max(1.0);
    let mut sim = config.build_simulation();

    let tick_interval = Duration::from_secs_f32(1.0 / tick_rate);
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut input = InputSnapshot::default();
    tracing::info!(tick_rate, "Session started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if sim.is_paused() {
                    continue;
                }

                let events = sim.tick(&input);
                let tick = sim.tick_count();
                let game_over = events.contains(&SimEvent::GameOver);

                let frame = SessionBroadcast::Frame {
                    tick,
                    snapshot: sim.snapshot(),
                    events,
                };
                if broadcast_tx.send(frame).is_err() {
                    tracing::debug!(tick, "Broadcast receiver dropped, stopping session");
                    break;
                }

                if game_over {
                    tracing::info!(tick, "Session reached game over");
                    let _ = broadcast_tx.send(SessionBroadcast::GameOver { tick });
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SessionCommand::Input(snapshot)) => {
                        input = snapshot;
                    },
                    Some(SessionCommand::Pause) => {
                        tracing::debug!(tick = sim.tick_count(), "Session paused");
                        sim.pause();
                    },
                    Some(SessionCommand::Resume) => {
                        tracing::debug!(tick = sim.tick_count(), "Session resumed");
                        sim.resume();
                    },
                    Some(SessionCommand::Stop) | None => {
                        break;
                    },
                }
            }
        }
    }

    tracing::info!(ticks = sim.tick_count(), "Session ended");
    let _ = broadcast_tx.send(SessionBroadcast::Ended);
}
