use parley_session::PeerPhase;

use crate::integration::{create_test_network, init_tracing};
use crate::utils::{spawn_host, spawn_joiner, wait_for_mesh};

#[tokio::test]
async fn test_joiner_bootstraps_through_host() {
    init_tracing();

    let (network, room) = create_test_network();
    let host = spawn_host(&network, &room, "Host");
    let joiner = spawn_joiner(&network, &room, "J1");

    assert_eq!(host.peer_id, room.peer_id());

    let host_state = wait_for_mesh(&host, &[joiner.peer_id.clone()])
        .await
        .expect("Host never saw the joiner");
    let joiner_state = wait_for_mesh(&joiner, &[host.peer_id.clone()])
        .await
        .expect("Joiner never reached the host");

    assert_eq!(host_state.phase(&joiner.peer_id), PeerPhase::Active);
    assert_eq!(joiner_state.local_id.as_ref(), Some(&joiner.peer_id));

    // Sessions start muted and announce their state as soon as data opens.
    let view = host_state.view(&joiner.peer_id).expect("No view of joiner");
    assert!(view.muted);
    assert_eq!(view.display_name, "J1");

    let view = joiner_state.view(&host.peer_id).expect("No view of host");
    assert_eq!(view.display_name, "Host");

    assert!(host_state.queued.is_empty(), "No queue outlives media arrival");
    assert!(joiner_state.queued.is_empty());

    host.handle.leave().await.expect("Host failed to leave");
    joiner.handle.leave().await.expect("Joiner failed to leave");
}
