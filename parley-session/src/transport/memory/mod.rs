//! In-process transport connecting sessions through a shared hub.
//!
//! Used by the integration tests and the CLI simulator. Every endpoint gets its
//! own unbounded event channel, so sends never block a session on another.

mod memory_channel;
mod memory_network;

pub use memory_channel::*;
pub use memory_network::*;
