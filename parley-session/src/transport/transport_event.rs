use crate::transport::media::RemoteMedia;
use crate::transport::transport::{DataChannel, MediaCall};
use bytes::Bytes;
use parley_core::PeerId;
use std::sync::Arc;

/// Events a transport delivers to the session that owns it.
pub enum TransportEvent {
    /// The transport registered us under this id.
    IdentityAssigned(PeerId),

    /// A remote started opening a data connection to us.
    DataIncoming(PeerId),

    /// Data connection is open in both directions and ready for writes.
    DataOpen(PeerId, Arc<dyn DataChannel>),

    /// One frame from an open data connection, in send order.
    Data(PeerId, Bytes),

    DataClosed(PeerId),

    /// A remote is calling us and waits for an answer.
    IncomingCall(PeerId, Arc<dyn MediaCall>),

    /// Remote media arrived. May fire more than once for a single call.
    Stream(PeerId, RemoteMedia),

    MediaClosed(PeerId),
}
