pub use parley_core::{PeerId, RoomCode};

pub mod model {
    pub use parley_core::model::*;
}

pub mod codec {
    pub use parley_core::codec::*;
    pub use parley_core::error::CodecError;
}

#[cfg(feature = "session")]
pub mod session {
    pub use parley_session::*;
}
