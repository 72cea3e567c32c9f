use crate::transport::media::LocalMedia;
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use parley_core::PeerId;

/// Pairwise connection capability the session is built on.
///
/// Outcomes are reported asynchronously as [`TransportEvent`](crate::TransportEvent)s
/// on the channel handed to the session, never through return values.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Request an ordered data connection to `remote`.
    async fn open_data(&self, remote: &PeerId) -> Result<()>;

    /// Start a media call to `remote`, offering our local stream.
    async fn call(&self, remote: &PeerId, media: &LocalMedia) -> Result<()>;

    /// Close the media call with `remote`, if any.
    async fn hang_up(&self, remote: &PeerId) -> Result<()>;

    /// Release the local identity. Remotes observe close events for every connection.
    async fn destroy(&self);
}

/// Open end of a data connection.
#[async_trait]
pub trait DataChannel: Send + Sync {
    /// The remote end of this connection.
    fn peer_id(&self) -> &PeerId;

    async fn send(&self, frame: Bytes) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Media call offered by a remote participant.
#[async_trait]
pub trait MediaCall: Send + Sync {
    fn peer_id(&self) -> &PeerId;

    async fn answer(&self, media: &LocalMedia) -> Result<()>;
}
