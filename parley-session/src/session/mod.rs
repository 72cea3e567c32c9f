mod broadcast_impl;
mod dispatch_impl;
mod dissemination_impl;
mod lifecycle_impl;
mod observer;
mod session;
mod session_command;
mod session_handle;
mod snapshot;

pub use observer::*;
pub use session::*;
pub use session_command::*;
pub use session_handle::*;
pub use snapshot::*;
