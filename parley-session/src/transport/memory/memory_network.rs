use crate::transport::media::{LocalMedia, RemoteMedia};
use crate::transport::memory::memory_channel::{MemoryCall, MemoryDataChannel};
use crate::transport::transport::Transport;
use crate::transport::transport_event::TransportEvent;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parley_core::PeerId;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct MemoryNetworkConfig {
    /// Emit every `Stream` event twice, like transports that report a call's stream once per track.
    pub duplicate_streams: bool,
}

struct NetworkInner {
    endpoints: DashMap<PeerId, mpsc::UnboundedSender<TransportEvent>>,
    contacts: DashMap<PeerId, HashSet<PeerId>>,
    config: MemoryNetworkConfig,
}

#[derive(Clone)]
pub struct MemoryNetwork {
    inner: Arc<NetworkInner>,
}

impl MemoryNetwork {
    pub fn new(config: MemoryNetworkConfig) -> Self {
        Self {
            inner: Arc::new(NetworkInner {
                endpoints: DashMap::new(),
                contacts: DashMap::new(),
                config,
            }),
        }
    }

    /// Register a new endpoint, under `requested` if given or a fresh id otherwise.
    ///
    /// The identity is announced through `IdentityAssigned` on the returned receiver.
    pub fn join(
        &self,
        requested: Option<PeerId>,
    ) -> Result<(Arc<MemoryTransport>, mpsc::UnboundedReceiver<TransportEvent>)> {
        let peer_id = requested.unwrap_or_default();
        let (tx, rx) = mpsc::unbounded_channel();

        match self.inner.endpoints.entry(peer_id.clone()) {
            Entry::Occupied(_) => bail!("peer id {} is already taken", peer_id),
            Entry::Vacant(slot) => {
                slot.insert(tx.clone());
            }
        }

        info!("Endpoint {} joined the network", peer_id);
        let _ = tx.send(TransportEvent::IdentityAssigned(peer_id.clone()));

        let transport = Arc::new(MemoryTransport {
            local: peer_id,
            network: self.clone(),
        });
        Ok((transport, rx))
    }

    pub fn peers(&self) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self
            .inner
            .endpoints
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        peers.sort();
        peers
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.inner.endpoints.contains_key(peer_id)
    }

    pub(crate) fn config(&self) -> &MemoryNetworkConfig {
        &self.inner.config
    }

    pub(crate) fn deliver(&self, to: &PeerId, event: TransportEvent) -> Result<()> {
        let Some(tx) = self.inner.endpoints.get(to) else {
            bail!("no endpoint registered as {}", to);
        };
        tx.send(event)
            .map_err(|_| anyhow!("endpoint {} stopped receiving", to))
    }

    fn link(&self, a: &PeerId, b: &PeerId) {
        self.inner
            .contacts
            .entry(a.clone())
            .or_default()
            .insert(b.clone());
        self.inner
            .contacts
            .entry(b.clone())
            .or_default()
            .insert(a.clone());
    }

    fn unregister(&self, peer_id: &PeerId) -> HashSet<PeerId> {
        self.inner.endpoints.remove(peer_id);
        let contacts = self
            .inner
            .contacts
            .remove(peer_id)
            .map(|(_, set)| set)
            .unwrap_or_default();

        for contact in &contacts {
            if let Some(mut set) = self.inner.contacts.get_mut(contact) {
                set.remove(peer_id);
            }
        }
        contacts
    }
}

impl Default for MemoryNetwork {
    fn default() -> Self {
        Self::new(MemoryNetworkConfig::default())
    }
}

/// One endpoint's view of a [`MemoryNetwork`].
pub struct MemoryTransport {
    local: PeerId,
    network: MemoryNetwork,
}

impl MemoryTransport {
    pub fn local_id(&self) -> &PeerId {
        &self.local
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn open_data(&self, remote: &PeerId) -> Result<()> {
        if !self.network.contains(remote) {
            bail!("cannot open data connection: {} is not reachable", remote);
        }
        debug!("Opening data connection {} -> {}", self.local, remote);

        let (local_half, remote_half) =
            MemoryDataChannel::pair(self.local.clone(), remote.clone(), self.network.clone());
        self.network.link(&self.local, remote);

        // Our own open is queued first so that the remote's first frames land behind it.
        self.network
            .deliver(&self.local, TransportEvent::DataOpen(remote.clone(), local_half))?;
        self.network
            .deliver(remote, TransportEvent::DataIncoming(self.local.clone()))?;
        self.network
            .deliver(remote, TransportEvent::DataOpen(self.local.clone(), remote_half))?;
        Ok(())
    }

    async fn call(&self, remote: &PeerId, media: &LocalMedia) -> Result<()> {
        debug!("Calling {} from {}", remote, self.local);
        let call = MemoryCall::new(
            self.local.clone(),
            remote.clone(),
            RemoteMedia::from(media),
            self.network.clone(),
        );
        self.network.link(&self.local, remote);
        self.network
            .deliver(remote, TransportEvent::IncomingCall(self.local.clone(), call))
    }

    async fn hang_up(&self, remote: &PeerId) -> Result<()> {
        self.network
            .deliver(&self.local, TransportEvent::MediaClosed(remote.clone()))?;
        // The remote may already be gone.
        let _ = self
            .network
            .deliver(remote, TransportEvent::MediaClosed(self.local.clone()));
        Ok(())
    }

    async fn destroy(&self) {
        let contacts = self.network.unregister(&self.local);
        info!(
            "Endpoint {} left the network ({} contacts notified)",
            self.local,
            contacts.len()
        );

        for contact in contacts {
            let _ = self
                .network
                .deliver(&contact, TransportEvent::DataClosed(self.local.clone()));
            let _ = self
                .network
                .deliver(&contact, TransportEvent::MediaClosed(self.local.clone()));
        }
    }
}
