use crate::registry::PeerView;
use crate::transport::RemoteMedia;
use async_trait::async_trait;
use parley_core::PeerId;

/// Rendering side of a session: told what to show, never asked anything.
#[async_trait]
pub trait SessionObserver: Send + Sync + 'static {
    /// Media for `peer_id` arrived; any state received earlier is already folded in.
    async fn on_peer_active(
        &self,
        peer_id: PeerId,
        media: RemoteMedia,
        muted: bool,
        display_name: String,
    );

    /// An active peer changed its mute flag or name.
    async fn on_peer_updated(&self, peer_id: PeerId, view: PeerView);

    async fn on_peer_closed(&self, peer_id: PeerId);

    async fn on_chat_message(&self, peer_id: PeerId, display_name: String, text: String);
}
