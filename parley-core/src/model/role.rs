use serde::{Deserialize, Serialize};

/// Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Created the room and registered under its code.
    Host,
    Joiner,
}

impl Role {
    pub fn is_host(self) -> bool {
        matches!(self, Role::Host)
    }
}
