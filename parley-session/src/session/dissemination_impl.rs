use crate::registry::ConnectedDataClient;
use crate::session::session::Session;
use crate::transport::DataChannel;
use parley_core::{PacketKind, PeerId, Role};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl Session {
    pub(super) async fn on_identity(&mut self, peer_id: PeerId) {
        info!("Registered with transport as {}", peer_id);
        self.local.peer_id = Some(peer_id.clone());

        match self.role {
            Role::Host => {
                if peer_id != self.room.peer_id() {
                    warn!(
                        "Hosting room {} but registered as {}; joiners will not find us",
                        self.room, peer_id
                    );
                }
            }
            Role::Joiner => {
                // Bootstrap: the host is the only participant we know about.
                let host = self.room.peer_id();
                info!("Joining room {} through its host", self.room);
                self.connect_to(host).await;
            }
        }
    }

    /// Open data and media connections to `remote` unless we already have them.
    pub(super) async fn connect_to(&mut self, remote: PeerId) {
        if self.local_id() == Some(&remote) {
            debug!("Skipping connection to ourselves");
            return;
        }
        if !self.registry.mark_connecting(remote.clone()) {
            debug!("Already connected or connecting to {}", remote);
            return;
        }

        if let Err(e) = self.transport.open_data(&remote).await {
            error!("Failed to open data connection to {}: {:?}", remote, e);
            self.registry.forget(&remote);
            return;
        }

        match self.transport.call(&remote, &self.local.media).await {
            Ok(()) => self.registry.mark_calling(remote),
            Err(e) => error!("Failed to call {}: {:?}", remote, e),
        }
    }

    pub(super) async fn on_data_open(&mut self, peer_id: PeerId, channel: Arc<dyn DataChannel>) {
        info!("Data channel open with {}", peer_id);

        self.send_local_state(channel.as_ref()).await;

        if self.role.is_host() {
            // Taken before the newcomer is registered. Sent even when empty.
            let participants: Vec<PeerId> = self
                .registry
                .data_peers()
                .into_iter()
                .filter(|id| id != &peer_id)
                .collect();
            debug!(
                "Disseminating {} participant(s) to {}",
                participants.len(),
                peer_id
            );
            self.send_to(channel.as_ref(), PacketKind::Initialize(participants))
                .await;
        }

        let replaced = self
            .registry
            .insert_data(ConnectedDataClient::new(peer_id.clone(), channel));
        if replaced.is_some() {
            warn!("Data channel with {} reopened; replacing the old one", peer_id);
        }

        if !self.registry.has_media(&peer_id) {
            self.queue.open(peer_id);
        }
    }

    pub(super) async fn handle_initialize(&mut self, sender: PeerId, participants: Vec<PeerId>) {
        if self.role.is_host() {
            warn!("Host received a participant list from {}; ignoring", sender);
            return;
        }

        info!(
            "{} sent {} participant(s) to connect to",
            sender,
            participants.len()
        );
        for remote in participants {
            self.connect_to(remote).await;
        }
    }
}
