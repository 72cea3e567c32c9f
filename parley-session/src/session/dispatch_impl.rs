use crate::registry::StateUpdate;
use crate::session::session::Session;
use crate::session::snapshot::ChatEntry;
use bytes::Bytes;
use parley_core::{CodecError, PacketKind, PeerId, decode, sanitize_remote};
use tracing::{debug, warn};

impl Session {
    /// Route one frame received from `from` over its data connection.
    pub(super) async fn dispatch(&mut self, from: PeerId, frame: Bytes) {
        if !self.registry.has_data(&from) {
            debug!("Dropping frame from {}: no open data connection", from);
            return;
        }

        let packet = match decode(&frame) {
            Ok(packet) => packet,
            Err(CodecError::UnknownType(kind)) => {
                warn!("Received unexpected packet of type {:?} from {}", kind, from);
                return;
            }
            Err(e) => {
                warn!("Discarding malformed packet from {}: {}", from, e);
                return;
            }
        };

        if packet.peer_id != from {
            debug!(
                "Packet on {}'s connection claims sender {}; keying by connection",
                from, packet.peer_id
            );
        }

        match packet.kind {
            PacketKind::Initialize(participants) => {
                self.handle_initialize(from, participants).await
            }
            PacketKind::SyncMute(muted) => {
                self.run_or_queue(from, StateUpdate::SetMute(muted)).await
            }
            PacketKind::ChangeName(name) => {
                let name = sanitize_remote(&name, &from);
                self.run_or_queue(from, StateUpdate::SetName(name)).await
            }
            PacketKind::ChatMessage(text) => self.record_chat(from, text).await,
        }
    }

    /// Apply now if the peer is rendered, otherwise hold until its media arrives.
    async fn run_or_queue(&mut self, peer_id: PeerId, update: StateUpdate) {
        let Some(update) = self.queue.push(&peer_id, update) else {
            debug!(
                "Queued update for {} ({} pending)",
                peer_id,
                self.queue.len_of(&peer_id)
            );
            return;
        };

        if let Some(view) = self.registry.apply(&peer_id, &update) {
            self.observer.on_peer_updated(peer_id, view).await;
        }
    }

    /// Chat is never deferred: it needs no rendered peer.
    pub(super) async fn record_chat(&mut self, peer_id: PeerId, text: String) {
        let display_name = self.display_name_of(&peer_id);

        self.chat.push(ChatEntry {
            peer_id: peer_id.clone(),
            display_name: display_name.clone(),
            text: text.clone(),
        });
        self.observer
            .on_chat_message(peer_id, display_name, text)
            .await;
    }
}
