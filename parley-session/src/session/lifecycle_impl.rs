use crate::registry::{MediaEntry, PeerView};
use crate::session::session::{CloseSource, Session};
use crate::transport::{MediaCall, RemoteMedia};
use parley_core::PeerId;
use std::sync::Arc;
use tracing::{debug, error, info};

impl Session {
    pub(super) async fn on_incoming_call(&mut self, peer_id: PeerId, call: Arc<dyn MediaCall>) {
        info!("Answering call from {}", peer_id);
        if let Err(e) = call.answer(&self.local.media).await {
            error!("Failed to answer call from {}: {:?}", peer_id, e);
            return;
        }
        self.registry.mark_calling(peer_id);
    }

    /// First stream for a peer makes it active: queued state is applied in
    /// arrival order, then the queue is dropped. Later streams are ignored, as
    /// are streams for peers that were already torn down.
    pub(super) async fn on_stream(&mut self, peer_id: PeerId, media: RemoteMedia) {
        if !self.registry.is_known(&peer_id) {
            debug!("Stream from unknown peer {}; ignoring", peer_id);
            return;
        }
        if self.registry.has_media(&peer_id) {
            debug!("Duplicate stream for {}; ignoring", peer_id);
            return;
        }

        let display_name = self
            .registry
            .data(&peer_id)
            .map(|client| client.display_name.clone())
            .unwrap_or_else(|| peer_id.to_string());

        self.registry.insert_media(MediaEntry {
            peer_id: peer_id.clone(),
            media: media.clone(),
            view: PeerView::new(display_name),
        });

        let pending = self.queue.take(&peer_id).unwrap_or_default();
        let drained = pending.len();
        for update in pending {
            self.registry.apply(&peer_id, &update);
        }

        let Some(view) = self.registry.media(&peer_id).map(|entry| entry.view.clone()) else {
            return;
        };
        info!(
            "{} is active ({} queued update(s) applied)",
            peer_id, drained
        );

        self.observer
            .on_peer_active(peer_id, media, view.muted, view.display_name)
            .await;
    }

    /// Either connection closing ends the peer. Stale closes are no-ops.
    pub(super) async fn on_closed(&mut self, peer_id: PeerId, source: CloseSource) {
        let channel = self
            .registry
            .data(&peer_id)
            .map(|client| client.channel.clone());
        let was_rendered = self.registry.has_media(&peer_id);

        let was_known = self.registry.forget(&peer_id);
        let dropped = self.queue.discard(&peer_id).unwrap_or(0);

        if !was_known {
            debug!("{:?} close for unknown peer {}; nothing to do", source, peer_id);
            return;
        }

        info!(
            "Peer {} left ({:?} closed, {} queued update(s) dropped)",
            peer_id, source, dropped
        );

        match source {
            CloseSource::Data => {
                if let Err(e) = self.transport.hang_up(&peer_id).await {
                    debug!("Hang up of {} failed: {:?}", peer_id, e);
                }
            }
            CloseSource::Media => {
                if let Some(channel) = channel {
                    if let Err(e) = channel.close().await {
                        debug!("Closing data channel to {} failed: {:?}", peer_id, e);
                    }
                }
            }
        }

        if was_rendered {
            self.observer.on_peer_closed(peer_id).await;
        }
    }

    /// Release our identity. Remotes learn about it through their own close events.
    pub(super) async fn leave(&mut self) {
        info!(
            "Leaving room {} ({} peer(s) connected)",
            self.room,
            self.registry.data_peers().len()
        );

        self.transport.destroy().await;

        let rendered = self.registry.media_peers();
        self.registry.clear();
        self.queue.clear();

        for peer_id in rendered {
            self.observer.on_peer_closed(peer_id).await;
        }
    }
}
