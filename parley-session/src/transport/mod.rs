mod media;
mod memory;
mod transport;
mod transport_event;

pub use media::*;
pub use memory::*;
pub use transport::*;
pub use transport_event::*;
