use std::time::Duration;

use kyx_core::test_helpers::tuning_map;
use kyx_core::tuning::KEY_PLAYER_MAX_HEALTH;
use kyx_platformer::SimEvent;
use kyx_platformer::config::PlatformerConfig;
use kyx_platformer::room::Room;
use kyx_runner::{SessionBroadcast, SessionCommand, SessionConfig, spawn_session};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{sleep, timeout};

const WAIT: Duration = Duration::from_secs(5);

fn drain(rx: &mut UnboundedReceiver<SessionBroadcast>) -> usize {
    let mut n = 0;
    while rx.try_recv().is_ok() {
        n += 1;
    }
    n
}

#[tokio::test]
async fn pause_stops_frames_until_resume() {
    let (cmd_tx, mut rx, handle) = spawn_session(SessionConfig::default());
    timeout(WAIT, rx.recv()).await.expect("first frame");

    cmd_tx.send(SessionCommand::Pause).unwrap();
    sleep(Duration::from_millis(100)).await;
    drain(&mut rx);
    sleep(Duration::from_millis(150)).await;
    assert!(
        matches!(rx.try_recv(), Err(TryRecvError::Empty)),
        "No frames while paused"
    );

    cmd_tx.send(SessionCommand::Resume).unwrap();
    let msg = timeout(WAIT, rx.recv()).await.expect("frame after resume");
    assert!(matches!(msg, Some(SessionBroadcast::Frame { .. })));

    cmd_tx.send(SessionCommand::Stop).unwrap();
    let _ = handle.await;
}

#[tokio::test]
async fn game_over_is_broadcast_once() {
    // The enemy of an empty room spawns right under the player.
    let mut config = SessionConfig::new(PlatformerConfig::default());
    config.rooms = Some(vec![Room::default()]);
    config.custom = tuning_map(&[(KEY_PLAYER_MAX_HEALTH, 1.0)]);
    let (cmd_tx, mut rx, handle) = spawn_session(config);

    let mut game_over_tick = None;
    let mut died_in_frame = false;
    let mut frames_after = 0;
    while frames_after < 10 {
        let msg = timeout(WAIT, rx.recv())
            .await
            .expect("session stalled")
            .expect("session ended early");
        match msg {
            SessionBroadcast::Frame { events, .. } => {
                if events.contains(&SimEvent::PlayerDied) {
                    died_in_frame = true;
                }
                if game_over_tick.is_some() {
                    frames_after += 1;
                }
            },
            SessionBroadcast::GameOver { tick } => {
                assert!(game_over_tick.is_none(), "GameOver sent twice");
                game_over_tick = Some(tick);
            },
            SessionBroadcast::Ended => panic!("session ended early"),
        }
    }

    assert!(died_in_frame);
    assert!(game_over_tick.is_some());

    cmd_tx.send(SessionCommand::Stop).unwrap();
    let _ = handle.await;
}

#[tokio::test]
async fn dropping_the_command_sender_ends_the_session() {
    let (cmd_tx, mut rx, handle) = spawn_session(SessionConfig::default());
    drop(cmd_tx);

    let mut last = None;
    while let Ok(Some(msg)) = timeout(WAIT, rx.recv()).await {
        last = Some(msg);
    }
    assert!(matches!(last, Some(SessionBroadcast::Ended)));
    timeout(WAIT, handle).await.expect("loop exits").unwrap();
}
