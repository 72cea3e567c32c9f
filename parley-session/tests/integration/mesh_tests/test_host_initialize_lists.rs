use parley_core::PacketKind;

use crate::integration::{create_test_network, init_tracing};
use crate::utils::{TestClient, read_handshake, spawn_host, spawn_joiner, wait_for_mesh};

#[tokio::test]
async fn test_host_sends_empty_initialize_to_first_joiner() {
    init_tracing();

    let (network, room) = create_test_network();
    let host = spawn_host(&network, &room, "Host");
    let client = TestClient::new(&network).await.expect("Failed to create client");

    client.connect(&host.peer_id).await.expect("Connect failed");

    // Local state always goes out before the participant list.
    let first = client.next_packet(&host.peer_id).await.expect("No packet");
    assert_eq!(first.peer_id, host.peer_id);
    assert_eq!(first.kind, PacketKind::SyncMute(true));

    let second = client.next_packet(&host.peer_id).await.expect("No packet");
    assert_eq!(second.kind, PacketKind::ChangeName("Host".into()));

    let third = client.next_packet(&host.peer_id).await.expect("No packet");
    assert_eq!(third.kind, PacketKind::Initialize(vec![]));

    host.handle.leave().await.expect("Host failed to leave");
}

#[tokio::test]
async fn test_initialize_lists_everyone_but_the_newcomer() {
    init_tracing();

    let (network, room) = create_test_network();
    let host = spawn_host(&network, &room, "Host");

    let p1 = TestClient::new(&network).await.expect("Failed to create client");
    p1.connect(&host.peer_id).await.expect("Connect failed");
    let listed = read_handshake(&p1, &host.peer_id).await.expect("No handshake");
    assert!(listed.is_empty());

    let p2 = TestClient::new(&network).await.expect("Failed to create client");
    p2.connect(&host.peer_id).await.expect("Connect failed");
    let listed = read_handshake(&p2, &host.peer_id).await.expect("No handshake");
    assert_eq!(listed, vec![p1.peer_id.clone()]);

    let p3 = TestClient::new(&network).await.expect("Failed to create client");
    p3.connect(&host.peer_id).await.expect("Connect failed");
    let mut listed = read_handshake(&p3, &host.peer_id).await.expect("No handshake");
    listed.sort();
    let mut expected = vec![p1.peer_id.clone(), p2.peer_id.clone()];
    expected.sort();
    assert_eq!(listed, expected);
    assert!(!listed.contains(&p3.peer_id));
    assert!(!listed.contains(&host.peer_id));

    host.handle.leave().await.expect("Host failed to leave");
}

#[tokio::test]
async fn test_joiners_never_send_initialize() {
    init_tracing();

    let (network, room) = create_test_network();
    let host = spawn_host(&network, &room, "Host");
    let joiner = spawn_joiner(&network, &room, "J1");
    wait_for_mesh(&joiner, &[host.peer_id.clone()])
        .await
        .expect("Joiner never reached the host");

    let client = TestClient::new(&network).await.expect("Failed to create client");
    client.connect(&joiner.peer_id).await.expect("Connect failed");

    let first = client.next_packet(&joiner.peer_id).await.expect("No packet");
    assert_eq!(first.kind, PacketKind::SyncMute(true));
    let second = client.next_packet(&joiner.peer_id).await.expect("No packet");
    assert_eq!(second.kind, PacketKind::ChangeName("J1".into()));

    let extra = client
        .next_packet_within(&joiner.peer_id, 200)
        .await
        .expect("Client failed");
    assert!(extra.is_none(), "Unexpected packet from joiner: {:?}", extra);

    host.handle.leave().await.expect("Host failed to leave");
    joiner.handle.leave().await.expect("Joiner failed to leave");
}
