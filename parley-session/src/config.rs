/// Settings for a single room membership.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Capacity of the local command channel feeding the session actor.
    pub command_capacity: usize,
    /// Microphone state when the session starts.
    pub start_muted: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command_capacity: 100,
            start_muted: true,
        }
    }
}
