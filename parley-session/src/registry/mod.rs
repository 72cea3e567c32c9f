mod peer_registry;
mod state_queue;
mod state_update;

pub use peer_registry::*;
pub use state_queue::*;
pub use state_update::*;
