mod config;
mod error;
mod registry;
mod session;
mod transport;

pub use config::*;
pub use error::*;
pub use registry::*;
pub use session::*;
pub use transport::*;
