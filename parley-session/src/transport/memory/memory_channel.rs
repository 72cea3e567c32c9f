use crate::transport::media::{LocalMedia, RemoteMedia};
use crate::transport::memory::memory_network::MemoryNetwork;
use crate::transport::transport::{DataChannel, MediaCall};
use crate::transport::transport_event::TransportEvent;
use anyhow::{Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use parley_core::PeerId;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One end of an in-memory data connection. Both ends share the `closed` flag.
pub struct MemoryDataChannel {
    owner: PeerId,
    remote: PeerId,
    closed: Arc<AtomicBool>,
    network: MemoryNetwork,
}

impl MemoryDataChannel {
    pub(crate) fn pair(
        a: PeerId,
        b: PeerId,
        network: MemoryNetwork,
    ) -> (Arc<MemoryDataChannel>, Arc<MemoryDataChannel>) {
        let closed = Arc::new(AtomicBool::new(false));
        let a_half = Arc::new(MemoryDataChannel {
            owner: a.clone(),
            remote: b.clone(),
            closed: closed.clone(),
            network: network.clone(),
        });
        let b_half = Arc::new(MemoryDataChannel {
            owner: b,
            remote: a,
            closed,
            network,
        });
        (a_half, b_half)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataChannel for MemoryDataChannel {
    fn peer_id(&self) -> &PeerId {
        &self.remote
    }

    async fn send(&self, frame: Bytes) -> Result<()> {
        if self.is_closed() {
            bail!("data connection {} -> {} is closed", self.owner, self.remote);
        }
        self.network
            .deliver(&self.remote, TransportEvent::Data(self.owner.clone(), frame))
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let _ = self
            .network
            .deliver(&self.owner, TransportEvent::DataClosed(self.remote.clone()));
        let _ = self
            .network
            .deliver(&self.remote, TransportEvent::DataClosed(self.owner.clone()));
        Ok(())
    }
}

/// Call offered by `caller`, seen from the callee's side.
pub struct MemoryCall {
    caller: PeerId,
    callee: PeerId,
    caller_media: RemoteMedia,
    network: MemoryNetwork,
}

impl MemoryCall {
    pub(crate) fn new(
        caller: PeerId,
        callee: PeerId,
        caller_media: RemoteMedia,
        network: MemoryNetwork,
    ) -> Arc<Self> {
        Arc::new(Self {
            caller,
            callee,
            caller_media,
            network,
        })
    }
}

#[async_trait]
impl MediaCall for MemoryCall {
    fn peer_id(&self) -> &PeerId {
        &self.caller
    }

    async fn answer(&self, media: &LocalMedia) -> Result<()> {
        let repeats = if self.network.config().duplicate_streams {
            2
        } else {
            1
        };

        for _ in 0..repeats {
            self.network.deliver(
                &self.caller,
                TransportEvent::Stream(self.callee.clone(), RemoteMedia::from(media)),
            )?;
            self.network.deliver(
                &self.callee,
                TransportEvent::Stream(self.caller.clone(), self.caller_media.clone()),
            )?;
        }
        Ok(())
    }
}
