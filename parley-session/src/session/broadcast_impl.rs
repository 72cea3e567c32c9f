use crate::error::SessionError;
use crate::session::session::Session;
use crate::transport::DataChannel;
use bytes::Bytes;
use parley_core::{Packet, PacketKind, encode, sanitize_local};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Which participants a broadcast reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BroadcastScope {
    /// Every open data connection.
    All,
    /// Only peers whose media we have; mute indicators mean nothing elsewhere.
    MediaActive,
}

impl Session {
    /// Stamp `kind` with our id and send it to every peer in `scope`.
    /// Returns how many peers it was delivered to.
    pub(super) async fn broadcast(&self, scope: BroadcastScope, kind: PacketKind) -> usize {
        let frame = match self.stamp(kind) {
            Ok(Some(frame)) => frame,
            Ok(None) => return 0,
            Err(e) => {
                error!("Broadcast aborted: {}", e);
                return 0;
            }
        };

        // Collect first so no registry borrow is held across sends.
        let targets: Vec<Arc<dyn DataChannel>> = self
            .registry
            .data_clients()
            .filter(|client| match scope {
                BroadcastScope::All => true,
                BroadcastScope::MediaActive => self.registry.has_media(&client.peer_id),
            })
            .map(|client| client.channel.clone())
            .collect();

        let mut delivered = 0;
        for channel in targets {
            match channel.send(frame.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => error!("Broadcast to {} failed: {:?}", channel.peer_id(), e),
            }
        }

        debug!("Broadcast ({:?}) reached {} peer(s)", scope, delivered);
        delivered
    }

    /// Send a packet over a single data connection.
    pub(super) async fn send_to(&self, channel: &dyn DataChannel, kind: PacketKind) {
        if let Err(e) = self.try_send_to(channel, kind).await {
            error!("Failed to send to {}: {}", channel.peer_id(), e);
        }
    }

    async fn try_send_to(
        &self,
        channel: &dyn DataChannel,
        kind: PacketKind,
    ) -> Result<(), SessionError> {
        if let Some(frame) = self.stamp(kind)? {
            channel.send(frame).await?;
        }
        Ok(())
    }

    /// Bring a freshly opened connection up to date with our mute flag and name.
    pub(super) async fn send_local_state(&self, channel: &dyn DataChannel) {
        self.send_to(channel, PacketKind::SyncMute(self.local.muted))
            .await;
        self.send_to(
            channel,
            PacketKind::ChangeName(self.local.display_name.clone()),
        )
        .await;
    }

    pub(super) async fn set_local_muted(&mut self, muted: bool) {
        self.local.muted = muted;
        self.broadcast(BroadcastScope::MediaActive, PacketKind::SyncMute(muted))
            .await;
    }

    pub(super) async fn set_local_name(&mut self, name: &str) {
        let name = sanitize_local(name);
        self.local.display_name = name.clone();
        self.broadcast(BroadcastScope::All, PacketKind::ChangeName(name))
            .await;
    }

    pub(super) async fn send_chat(&mut self, text: String) {
        if text.trim().is_empty() {
            return;
        }
        let Some(local) = self.local_id().cloned() else {
            warn!("Chat message dropped: not connected yet");
            return;
        };

        self.broadcast(BroadcastScope::All, PacketKind::ChatMessage(text.clone()))
            .await;
        self.record_chat(local, text).await;
    }

    /// Encode `kind` as sent by us. `None` until the transport has assigned our id.
    fn stamp(&self, kind: PacketKind) -> Result<Option<Bytes>, SessionError> {
        let Some(local) = self.local_id() else {
            debug!("No identity assigned yet; {} not sent", kind.type_name());
            return Ok(None);
        };
        Ok(Some(encode(&Packet::new(local.clone(), kind))?))
    }
}
