use anyhow::{Result, bail};
use parley_core::{PeerId, RoomCode};
use parley_session::{
    LocalMedia, MemoryNetwork, Session, SessionConfig, SessionHandle, SessionSetup, SessionSnapshot,
};

use super::recording_observer::RecordingObserver;

/// Timeout for a state change to become visible in a snapshot (ms).
pub const STATE_TIMEOUT_MS: u64 = 5000;

/// A running session plus what the test needs to inspect it.
pub struct TestSession {
    pub peer_id: PeerId,
    pub handle: SessionHandle,
    pub observer: RecordingObserver,
}

/// Spawn the host of `room` on `network`.
pub fn spawn_host(network: &MemoryNetwork, room: &RoomCode, name: &str) -> TestSession {
    let setup = SessionSetup::host(room.clone(), LocalMedia::new(format!("{}-cam", name)))
        .with_name(name);
    spawn(network, Some(room.peer_id()), setup)
}

/// Spawn a joiner of `room` under a fresh id.
pub fn spawn_joiner(network: &MemoryNetwork, room: &RoomCode, name: &str) -> TestSession {
    let setup = SessionSetup::joiner(room.clone(), LocalMedia::new(format!("{}-cam", name)))
        .with_name(name);
    spawn(network, None, setup)
}

/// Spawn a joiner whose microphone starts live.
pub fn spawn_unmuted_joiner(network: &MemoryNetwork, room: &RoomCode, name: &str) -> TestSession {
    let setup = SessionSetup::joiner(room.clone(), LocalMedia::new(format!("{}-cam", name)))
        .with_name(name)
        .with_config(SessionConfig {
            start_muted: false,
            ..SessionConfig::default()
        });
    spawn(network, None, setup)
}

fn spawn(network: &MemoryNetwork, requested: Option<PeerId>, setup: SessionSetup) -> TestSession {
    let (transport, events) = network.join(requested).expect("Failed to join network");
    let peer_id = transport.local_id().clone();
    let observer = RecordingObserver::new();

    let (session, handle) = Session::new(setup, transport, events, Box::new(observer.clone()));
    session.spawn();

    TestSession {
        peer_id,
        handle,
        observer,
    }
}

/// Poll snapshots until `predicate` holds.
pub async fn wait_for_state<F>(handle: &SessionHandle, timeout_ms: u64, predicate: F) -> Result<SessionSnapshot>
where
    F: Fn(&SessionSnapshot) -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    loop {
        let snapshot = handle.snapshot().await?;
        if predicate(&snapshot) {
            return Ok(snapshot);
        }
        if start.elapsed() > timeout {
            bail!("Timeout waiting for session state: {:?}", snapshot);
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

/// Wait until `session` has data and media with every one of `peers`.
pub async fn wait_for_mesh(session: &TestSession, peers: &[PeerId]) -> Result<SessionSnapshot> {
    wait_for_state(&session.handle, STATE_TIMEOUT_MS, |s| s.is_meshed_with(peers)).await
}
