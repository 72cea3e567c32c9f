use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid room code {0:?}: expected 9 digits")]
    InvalidRoomCode(String),
}

/// Failures decoding a frame received over a data connection.
///
/// None of these are fatal to the connection: the receiver logs and drops the frame.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("frame is not a packet: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown packet type {0:?}")]
    UnknownType(String),

    #[error("malformed {kind} payload: {source}")]
    MalformedPacket {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
