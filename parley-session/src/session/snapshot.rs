use crate::registry::{PeerPhase, PeerView};
use parley_core::{PeerId, Role, RoomCode};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub peer_id: PeerId,
    pub display_name: String,
    pub text: String,
}

/// Point-in-time copy of a session's state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub local_id: Option<PeerId>,
    pub role: Role,
    pub room: RoomCode,
    pub muted: bool,
    pub display_name: String,
    pub connecting: Vec<PeerId>,
    pub data_peers: Vec<PeerId>,
    pub media_peers: Vec<PeerId>,
    pub queued: Vec<(PeerId, usize)>,
    pub views: BTreeMap<PeerId, PeerView>,
    pub chat: Vec<ChatEntry>,
}

impl SessionSnapshot {
    pub fn view(&self, peer_id: &PeerId) -> Option<&PeerView> {
        self.views.get(peer_id)
    }

    pub fn queued_for(&self, peer_id: &PeerId) -> Option<usize> {
        self.queued
            .iter()
            .find(|(id, _)| id == peer_id)
            .map(|(_, len)| *len)
    }

    pub fn phase(&self, peer_id: &PeerId) -> PeerPhase {
        if self.media_peers.contains(peer_id) {
            PeerPhase::Active
        } else if self.data_peers.contains(peer_id) {
            PeerPhase::DataOpen
        } else if self.connecting.contains(peer_id) {
            PeerPhase::Connecting
        } else {
            PeerPhase::Closed
        }
    }

    /// Every remote peer is reachable over data and media.
    pub fn is_meshed_with(&self, peers: &[PeerId]) -> bool {
        peers
            .iter()
            .filter(|id| Some(*id) != self.local_id.as_ref())
            .all(|id| self.data_peers.contains(id) && self.media_peers.contains(id))
    }
}
