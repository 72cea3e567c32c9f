use anyhow::{Context, Result, bail};
use bytes::Bytes;
use parley_core::{Packet, PacketKind, PeerId, decode, encode};
use parley_session::{
    DataChannel, LocalMedia, MemoryNetwork, MemoryTransport, Transport, TransportEvent,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Timeout for a single packet to arrive at a client (ms).
pub const PACKET_TIMEOUT_MS: u64 = 2000;

/// A bare network endpoint driven by hand instead of by a session.
///
/// Lets a test speak the wire protocol directly and see exactly which
/// packets a session sends.
pub struct TestClient {
    pub peer_id: PeerId,
    transport: Arc<MemoryTransport>,
    events: Mutex<mpsc::UnboundedReceiver<TransportEvent>>,
    channels: Mutex<HashMap<PeerId, Arc<dyn DataChannel>>>,
    backlog: Mutex<VecDeque<(PeerId, Bytes)>>,
    media: LocalMedia,
}

impl TestClient {
    pub async fn new(network: &MemoryNetwork) -> Result<Self> {
        let (transport, mut events) = network.join(None)?;
        let peer_id = transport.local_id().clone();

        match events.recv().await {
            Some(TransportEvent::IdentityAssigned(_)) => {}
            _ => bail!("client was not assigned an identity"),
        }

        Ok(Self {
            media: LocalMedia::new(format!("client-{}", peer_id)),
            peer_id,
            transport,
            events: Mutex::new(events),
            channels: Mutex::new(HashMap::new()),
            backlog: Mutex::new(VecDeque::new()),
        })
    }

    /// Open a data connection and wait until our end is usable.
    pub async fn connect(&self, remote: &PeerId) -> Result<()> {
        self.transport.open_data(remote).await?;
        self.wait_until(PACKET_TIMEOUT_MS, |channels| channels.contains_key(remote))
            .await
    }

    /// Place a media call. Answering and streams are handled while receiving.
    pub async fn call(&self, remote: &PeerId) -> Result<()> {
        self.transport.call(remote, &self.media).await
    }

    pub async fn send(&self, remote: &PeerId, kind: PacketKind) -> Result<()> {
        let frame = encode(&Packet::new(self.peer_id.clone(), kind))?;
        self.send_raw(remote, frame.to_vec()).await
    }

    pub async fn send_raw(&self, remote: &PeerId, bytes: Vec<u8>) -> Result<()> {
        let channel = self
            .channels
            .lock()
            .await
            .get(remote)
            .cloned()
            .context("no open data channel to remote")?;
        channel.send(bytes.into()).await
    }

    pub async fn close_data(&self, remote: &PeerId) -> Result<()> {
        let channel = self
            .channels
            .lock()
            .await
            .remove(remote)
            .context("no open data channel to remote")?;
        channel.close().await
    }

    /// Next packet received from `remote`.
    pub async fn next_packet(&self, remote: &PeerId) -> Result<Packet> {
        self.next_packet_within(remote, PACKET_TIMEOUT_MS)
            .await?
            .context("Timeout waiting for packet")
    }

    /// Next packet received from `remote`, or `None` if nothing arrives in time.
    pub async fn next_packet_within(
        &self,
        remote: &PeerId,
        timeout_ms: u64,
    ) -> Result<Option<Packet>> {
        {
            let mut backlog = self.backlog.lock().await;
            if let Some(pos) = backlog.iter().position(|(from, _)| from == remote) {
                if let Some((_, frame)) = backlog.remove(pos) {
                    return Ok(Some(decode(&frame)?));
                }
            }
        }

        let mut events = self.events.lock().await;
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            let remaining = timeout.saturating_sub(start.elapsed());
            let Ok(event) = tokio::time::timeout(remaining, events.recv()).await else {
                return Ok(None);
            };
            let Some(event) = event else {
                bail!("client event channel closed");
            };

            if let TransportEvent::Data(from, frame) = &event {
                if from == remote {
                    return Ok(Some(decode(frame)?));
                }
            }
            self.absorb(event).await?;
        }
    }

    /// Process events until `done` holds for our channel table.
    async fn wait_until<F>(&self, timeout_ms: u64, done: F) -> Result<()>
    where
        F: Fn(&HashMap<PeerId, Arc<dyn DataChannel>>) -> bool,
    {
        let mut events = self.events.lock().await;
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if done(&*self.channels.lock().await) {
                return Ok(());
            }
            let remaining = timeout.saturating_sub(start.elapsed());
            match tokio::time::timeout(remaining, events.recv()).await {
                Ok(Some(event)) => self.absorb(event).await?,
                Ok(None) => bail!("client event channel closed"),
                Err(_) => bail!("Timeout waiting for client condition"),
            }
        }
    }

    /// Book-keeping for events nobody is waiting on. Frames are kept for later reads.
    async fn absorb(&self, event: TransportEvent) -> Result<()> {
        match event {
            TransportEvent::Data(from, frame) => {
                self.backlog.lock().await.push_back((from, frame));
            }
            TransportEvent::DataOpen(remote, channel) => {
                self.channels.lock().await.insert(remote, channel);
            }
            TransportEvent::DataClosed(remote) => {
                self.channels.lock().await.remove(&remote);
            }
            TransportEvent::IncomingCall(_, call) => {
                call.answer(&self.media).await?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Read the packets a session sends on a fresh connection, up to and including
/// the host's participant list. Returns the list.
pub async fn read_handshake(client: &TestClient, host: &PeerId) -> Result<Vec<PeerId>> {
    loop {
        let packet = client.next_packet(host).await?;
        if let PacketKind::Initialize(participants) = packet.kind {
            return Ok(participants);
        }
    }
}
