//! JSON framing for [`Packet`]s: one object per data-channel message.
//!
//! ```json
//! { "peerId": "123456789", "type": "syncMute", "payload": true }
//! ```

use crate::error::CodecError;
use crate::model::{Packet, PacketKind, PeerId};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Frame {
    peer_id: PeerId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

pub fn encode(packet: &Packet) -> Result<Bytes, CodecError> {
    let payload = match &packet.kind {
        PacketKind::Initialize(peers) => serde_json::to_value(peers)?,
        PacketKind::SyncMute(muted) => Value::Bool(*muted),
        PacketKind::ChangeName(name) => Value::String(name.clone()),
        PacketKind::ChatMessage(text) => Value::String(text.clone()),
    };

    let frame = Frame {
        peer_id: packet.peer_id.clone(),
        kind: packet.kind.type_name().to_owned(),
        payload,
    };

    Ok(Bytes::from(serde_json::to_vec(&frame)?))
}

pub fn decode(bytes: &[u8]) -> Result<Packet, CodecError> {
    let frame: Frame = serde_json::from_slice(bytes)?;

    let kind = match frame.kind.as_str() {
        PacketKind::INITIALIZE => {
            PacketKind::Initialize(payload(PacketKind::INITIALIZE, frame.payload)?)
        }
        PacketKind::SYNC_MUTE => {
            PacketKind::SyncMute(payload(PacketKind::SYNC_MUTE, frame.payload)?)
        }
        PacketKind::CHANGE_NAME => {
            PacketKind::ChangeName(payload(PacketKind::CHANGE_NAME, frame.payload)?)
        }
        PacketKind::CHAT_MESSAGE => {
            PacketKind::ChatMessage(payload(PacketKind::CHAT_MESSAGE, frame.payload)?)
        }
        other => return Err(CodecError::UnknownType(other.to_owned())),
    };

    Ok(Packet::new(frame.peer_id, kind))
}

fn payload<T: DeserializeOwned>(kind: &'static str, value: Value) -> Result<T, CodecError> {
    serde_json::from_value(value).map_err(|source| CodecError::MalformedPacket { kind, source })
}
