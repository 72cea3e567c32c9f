use parley_core::CodecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session has shut down")]
    Closed,

    #[error("codec: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}
