mod display_name;
mod packet;
mod peer;
mod role;
mod room;

pub use display_name::{
    MAX_DISPLAY_NAME_CHARS, random_display_name, sanitize_local, sanitize_remote,
};
pub use packet::{Packet, PacketKind};
pub use peer::PeerId;
pub use role::Role;
pub use room::RoomCode;
