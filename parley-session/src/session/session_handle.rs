use crate::error::SessionError;
use crate::session::session_command::SessionCommand;
use crate::session::snapshot::SessionSnapshot;
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to a running [`Session`](crate::Session).
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { tx }
    }

    pub async fn set_muted(&self, muted: bool) -> Result<(), SessionError> {
        self.send(SessionCommand::SetMuted(muted)).await
    }

    pub async fn change_name(&self, name: impl Into<String>) -> Result<(), SessionError> {
        self.send(SessionCommand::ChangeName(name.into())).await
    }

    pub async fn send_chat(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(SessionCommand::SendChat(text.into())).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Leave the room and wait for the actor to finish tearing down.
    pub async fn leave(&self) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Leave(tx)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn send(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        self.tx.send(cmd).await.map_err(|_| SessionError::Closed)
    }
}
