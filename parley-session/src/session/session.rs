use crate::config::SessionConfig;
use crate::registry::{PeerRegistry, StateQueue};
use crate::session::observer::SessionObserver;
use crate::session::session_command::SessionCommand;
use crate::session::session_handle::SessionHandle;
use crate::session::snapshot::{ChatEntry, SessionSnapshot};
use crate::transport::{LocalMedia, Transport, TransportEvent};
use parley_core::{PeerId, Role, RoomCode, sanitize_local};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Who we are in the room and what we show to others.
pub struct SessionSetup {
    pub role: Role,
    pub room: RoomCode,
    pub display_name: String,
    pub media: LocalMedia,
    pub config: SessionConfig,
}

impl SessionSetup {
    pub fn host(room: RoomCode, media: LocalMedia) -> Self {
        Self::new(Role::Host, room, media)
    }

    pub fn joiner(room: RoomCode, media: LocalMedia) -> Self {
        Self::new(Role::Joiner, room, media)
    }

    fn new(role: Role, room: RoomCode, media: LocalMedia) -> Self {
        Self {
            role,
            room,
            display_name: sanitize_local(""),
            media,
            config: SessionConfig::default(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.display_name = sanitize_local(name);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }
}

pub(super) struct LocalState {
    pub(super) peer_id: Option<PeerId>,
    pub(super) muted: bool,
    pub(super) display_name: String,
    pub(super) media: LocalMedia,
}

/// Mesh coordinator for one room membership.
///
/// Owns the peer registry, the deferred-state queues and chat history. Every
/// mutation happens inside [`Session::run`], one event at a time.
pub struct Session {
    pub(super) role: Role,
    pub(super) room: RoomCode,
    pub(super) local: LocalState,
    pub(super) registry: PeerRegistry,
    pub(super) queue: StateQueue,
    pub(super) chat: Vec<ChatEntry>,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) observer: Box<dyn SessionObserver>,
    command_rx: mpsc::Receiver<SessionCommand>,
    transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
}

impl Session {
    pub fn new(
        setup: SessionSetup,
        transport: Arc<dyn Transport>,
        transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
        observer: Box<dyn SessionObserver>,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(setup.config.command_capacity);

        let session = Self {
            role: setup.role,
            room: setup.room,
            local: LocalState {
                peer_id: None,
                muted: setup.config.start_muted,
                display_name: setup.display_name,
                media: setup.media,
            },
            registry: PeerRegistry::new(),
            queue: StateQueue::new(),
            chat: Vec::new(),
            transport,
            observer,
            command_rx,
            transport_rx,
        };

        (session, SessionHandle::new(command_tx))
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Event loop. Runs until the session is left or every handle is dropped.
    pub async fn run(mut self) {
        info!(
            "Session event loop started ({:?} of room {})",
            self.role, self.room
        );

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => {
                            if self.handle_command(c).await.is_break() {
                                break;
                            }
                        }
                        None => {
                            info!("All session handles dropped. Leaving room.");
                            self.leave().await;
                            break;
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    match evt {
                        Some(e) => self.handle_transport_event(e).await,
                        None => {
                            warn!("Transport event channel closed unexpectedly");
                            break;
                        }
                    }
                }
            }
        }

        info!("Session event loop finished");
    }

    async fn handle_command(&mut self, cmd: SessionCommand) -> ControlFlow<()> {
        match cmd {
            SessionCommand::SetMuted(muted) => self.set_local_muted(muted).await,
            SessionCommand::ChangeName(name) => self.set_local_name(&name).await,
            SessionCommand::SendChat(text) => self.send_chat(text).await,
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            SessionCommand::Leave(done) => {
                self.leave().await;
                let _ = done.send(());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::IdentityAssigned(peer_id) => self.on_identity(peer_id).await,

            TransportEvent::DataIncoming(peer_id) => {
                debug!("Incoming data connection from {}", peer_id);
                self.registry.mark_connecting(peer_id);
            }

            TransportEvent::DataOpen(peer_id, channel) => {
                self.on_data_open(peer_id, channel).await
            }

            TransportEvent::Data(peer_id, frame) => self.dispatch(peer_id, frame).await,

            TransportEvent::DataClosed(peer_id) => {
                self.on_closed(peer_id, CloseSource::Data).await
            }

            TransportEvent::IncomingCall(peer_id, call) => {
                self.on_incoming_call(peer_id, call).await
            }

            TransportEvent::Stream(peer_id, media) => self.on_stream(peer_id, media).await,

            TransportEvent::MediaClosed(peer_id) => {
                self.on_closed(peer_id, CloseSource::Media).await
            }
        }
    }

    pub(super) fn local_id(&self) -> Option<&PeerId> {
        self.local.peer_id.as_ref()
    }

    /// Name to show next to `peer_id`'s chat lines.
    pub(super) fn display_name_of(&self, peer_id: &PeerId) -> String {
        if self.local_id() == Some(peer_id) {
            return self.local.display_name.clone();
        }
        self.registry
            .data(peer_id)
            .map(|client| client.display_name.clone())
            .unwrap_or_else(|| peer_id.to_string())
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            local_id: self.local.peer_id.clone(),
            role: self.role,
            room: self.room.clone(),
            muted: self.local.muted,
            display_name: self.local.display_name.clone(),
            connecting: self.registry.connecting_peers(),
            data_peers: self.registry.data_peers(),
            media_peers: self.registry.media_peers(),
            queued: self.queue.queued(),
            views: self
                .registry
                .views()
                .map(|(peer_id, view)| (peer_id.clone(), view.clone()))
                .collect(),
            chat: self.chat.clone(),
        }
    }
}

/// Which of a peer's two connections reported closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CloseSource {
    Data,
    Media,
}
