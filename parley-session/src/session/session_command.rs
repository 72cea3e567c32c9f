use crate::session::snapshot::SessionSnapshot;
use tokio::sync::oneshot;

/// Local input fed into the session actor.
#[derive(Debug)]
pub enum SessionCommand {
    /// Toggle our microphone and tell peers that render us.
    SetMuted(bool),

    ChangeName(String),

    SendChat(String),

    Snapshot(oneshot::Sender<SessionSnapshot>),

    /// Release our identity and stop the actor. The sender is signalled once done.
    Leave(oneshot::Sender<()>),
}
