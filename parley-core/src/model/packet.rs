use crate::model::peer::PeerId;

/// Application data exchanged over a data connection, stamped with its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub peer_id: PeerId,
    pub kind: PacketKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketKind {
    /// Participants a newcomer must connect to. Sent by the host only.
    Initialize(Vec<PeerId>),
    SyncMute(bool),
    ChangeName(String),
    ChatMessage(String),
}

impl Packet {
    pub fn new(peer_id: PeerId, kind: PacketKind) -> Self {
        Self { peer_id, kind }
    }
}

impl PacketKind {
    /// Name used in the `type` field on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            PacketKind::Initialize(_) => PacketKind::INITIALIZE,
            PacketKind::SyncMute(_) => PacketKind::SYNC_MUTE,
            PacketKind::ChangeName(_) => PacketKind::CHANGE_NAME,
            PacketKind::ChatMessage(_) => PacketKind::CHAT_MESSAGE,
        }
    }

    pub const INITIALIZE: &'static str = "initialize";
    pub const SYNC_MUTE: &'static str = "syncMute";
    pub const CHANGE_NAME: &'static str = "changeName";
    pub const CHAT_MESSAGE: &'static str = "chatMessage";
}
