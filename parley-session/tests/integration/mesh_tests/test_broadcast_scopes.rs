use parley_core::PacketKind;
use parley_session::PeerPhase;

use crate::integration::{create_test_network, init_tracing};
use crate::utils::{STATE_TIMEOUT_MS, TestClient, read_handshake, spawn_host, wait_for_state};

#[tokio::test]
async fn test_mute_skips_peers_without_media() {
    init_tracing();

    let (network, room) = create_test_network();
    let host = spawn_host(&network, &room, "Host");

    let data_only = TestClient::new(&network).await.expect("Failed to create client");
    data_only.connect(&host.peer_id).await.expect("Connect failed");
    read_handshake(&data_only, &host.peer_id).await.expect("No handshake");

    let active = TestClient::new(&network).await.expect("Failed to create client");
    active.connect(&host.peer_id).await.expect("Connect failed");
    read_handshake(&active, &host.peer_id).await.expect("No handshake");
    active.call(&host.peer_id).await.expect("Call failed");

    wait_for_state(&host.handle, STATE_TIMEOUT_MS, |s| {
        s.phase(&active.peer_id) == PeerPhase::Active
            && s.phase(&data_only.peer_id) == PeerPhase::DataOpen
    })
    .await
    .expect("Clients never settled");

    host.handle.set_muted(false).await.expect("Set muted failed");
    host.handle.change_name("Renamed").await.expect("Rename failed");

    let packet = active.next_packet(&host.peer_id).await.expect("No packet");
    assert_eq!(packet.kind, PacketKind::SyncMute(false));
    let packet = active.next_packet(&host.peer_id).await.expect("No packet");
    assert_eq!(packet.kind, PacketKind::ChangeName("Renamed".into()));

    // Name changes go to every data connection, mute state does not.
    let packet = data_only.next_packet(&host.peer_id).await.expect("No packet");
    assert_eq!(packet.kind, PacketKind::ChangeName("Renamed".into()));

    let snapshot = host.handle.snapshot().await.expect("Snapshot failed");
    assert!(!snapshot.muted);
    assert_eq!(snapshot.display_name, "Renamed");

    host.handle.leave().await.expect("Host failed to leave");
}
