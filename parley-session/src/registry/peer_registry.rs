use crate::registry::state_update::{PeerView, StateUpdate};
use crate::transport::{DataChannel, RemoteMedia};
use parley_core::PeerId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Open data connection to a remote participant.
pub struct ConnectedDataClient {
    pub peer_id: PeerId,
    pub channel: Arc<dyn DataChannel>,
    pub display_name: String,
}

impl ConnectedDataClient {
    pub fn new(peer_id: PeerId, channel: Arc<dyn DataChannel>) -> Self {
        let display_name = peer_id.to_string();
        Self {
            peer_id,
            channel,
            display_name,
        }
    }
}

/// Rendered representation of a remote participant, backed by its media stream.
#[derive(Debug, Clone)]
pub struct MediaEntry {
    pub peer_id: PeerId,
    pub media: RemoteMedia,
    pub view: PeerView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerPhase {
    /// Data connection requested but not open.
    Connecting,
    /// Data connection open, no media yet.
    DataOpen,
    /// Media observed.
    Active,
    /// Nothing is known about the peer.
    Closed,
}

/// Authoritative table of remote participants.
#[derive(Default)]
pub struct PeerRegistry {
    connecting: HashSet<PeerId>,
    /// Calls placed or answered whose stream has not arrived yet.
    calling: HashSet<PeerId>,
    data: HashMap<PeerId, ConnectedDataClient>,
    media: HashMap<PeerId, MediaEntry>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outbound or inbound connection attempt.
    /// Returns `false` if the peer is already connecting or connected.
    pub fn mark_connecting(&mut self, peer_id: PeerId) -> bool {
        if self.data.contains_key(&peer_id) {
            return false;
        }
        self.connecting.insert(peer_id)
    }

    pub fn mark_calling(&mut self, peer_id: PeerId) {
        self.calling.insert(peer_id);
    }

    /// Anything at all is recorded for the peer. Streams from unknown peers are stale.
    pub fn is_known(&self, peer_id: &PeerId) -> bool {
        self.connecting.contains(peer_id)
            || self.calling.contains(peer_id)
            || self.data.contains_key(peer_id)
            || self.media.contains_key(peer_id)
    }

    pub fn insert_data(&mut self, client: ConnectedDataClient) -> Option<ConnectedDataClient> {
        self.connecting.remove(&client.peer_id);
        self.data.insert(client.peer_id.clone(), client)
    }

    pub fn data(&self, peer_id: &PeerId) -> Option<&ConnectedDataClient> {
        self.data.get(peer_id)
    }

    pub fn has_data(&self, peer_id: &PeerId) -> bool {
        self.data.contains_key(peer_id)
    }

    pub fn data_clients(&self) -> impl Iterator<Item = &ConnectedDataClient> {
        self.data.values()
    }

    /// Record media for a peer. Duplicate notifications leave the first entry in place.
    pub fn insert_media(&mut self, entry: MediaEntry) -> bool {
        if self.media.contains_key(&entry.peer_id) {
            return false;
        }
        self.calling.remove(&entry.peer_id);
        self.media.insert(entry.peer_id.clone(), entry);
        true
    }

    pub fn media(&self, peer_id: &PeerId) -> Option<&MediaEntry> {
        self.media.get(peer_id)
    }

    pub fn has_media(&self, peer_id: &PeerId) -> bool {
        self.media.contains_key(peer_id)
    }

    /// Apply a remote state change to whatever represents the peer.
    ///
    /// Names also update the data client so chat is attributed correctly.
    /// Returns the new view when the peer has one.
    pub fn apply(&mut self, peer_id: &PeerId, update: &StateUpdate) -> Option<PeerView> {
        if let StateUpdate::SetName(name) = update {
            if let Some(client) = self.data.get_mut(peer_id) {
                client.display_name = name.clone();
            }
        }

        let entry = self.media.get_mut(peer_id)?;
        update.apply(&mut entry.view);
        Some(entry.view.clone())
    }

    /// Delete every trace of a peer. Returns whether anything was removed.
    pub fn forget(&mut self, peer_id: &PeerId) -> bool {
        let was_connecting = self.connecting.remove(peer_id);
        let was_calling = self.calling.remove(peer_id);
        let had_data = self.data.remove(peer_id).is_some();
        let had_media = self.media.remove(peer_id).is_some();
        was_connecting || was_calling || had_data || had_media
    }

    pub fn clear(&mut self) {
        self.connecting.clear();
        self.calling.clear();
        self.data.clear();
        self.media.clear();
    }

    pub fn phase(&self, peer_id: &PeerId) -> PeerPhase {
        if self.media.contains_key(peer_id) {
            PeerPhase::Active
        } else if self.data.contains_key(peer_id) {
            PeerPhase::DataOpen
        } else if self.connecting.contains(peer_id) {
            PeerPhase::Connecting
        } else {
            PeerPhase::Closed
        }
    }

    pub fn connecting_peers(&self) -> Vec<PeerId> {
        sorted(self.connecting.iter())
    }

    pub fn data_peers(&self) -> Vec<PeerId> {
        sorted(self.data.keys())
    }

    pub fn media_peers(&self) -> Vec<PeerId> {
        sorted(self.media.keys())
    }

    pub fn views(&self) -> impl Iterator<Item = (&PeerId, &PeerView)> {
        self.media.iter().map(|(peer_id, entry)| (peer_id, &entry.view))
    }
}

fn sorted<'a>(ids: impl Iterator<Item = &'a PeerId>) -> Vec<PeerId> {
    let mut ids: Vec<PeerId> = ids.cloned().collect();
    ids.sort();
    ids
}
