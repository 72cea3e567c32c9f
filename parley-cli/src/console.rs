use async_trait::async_trait;
use colored::*;
use parley_core::PeerId;
use parley_session::{PeerView, RemoteMedia, SessionObserver};
use tokio::sync::mpsc;

/// Prints what a session renders, prefixed with whose session it is.
#[derive(Default)]
pub struct ConsoleObserver {
    label: Option<String>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    fn print(&self, line: String) {
        match &self.label {
            Some(label) => println!("{} {}", format!("[{}]", label).dimmed(), line),
            None => println!("{}", line),
        }
    }
}

#[async_trait]
impl SessionObserver for ConsoleObserver {
    async fn on_peer_active(
        &self,
        peer_id: PeerId,
        media: RemoteMedia,
        muted: bool,
        display_name: String,
    ) {
        let mic = if muted { " (muted)".yellow() } else { "".normal() };
        self.print(format!(
            "{} {} is here [{} / {}]{}",
            "+".green().bold(),
            display_name.bold(),
            peer_id,
            media.stream_id,
            mic
        ));
    }

    async fn on_peer_updated(&self, peer_id: PeerId, view: PeerView) {
        let mic = if view.muted { "muted".yellow() } else { "live".green() };
        self.print(format!(
            "{} {} ({}) is now {}",
            "~".cyan(),
            view.display_name.bold(),
            peer_id,
            mic
        ));
    }

    async fn on_peer_closed(&self, peer_id: PeerId) {
        self.print(format!("{} {} left", "-".red().bold(), peer_id));
    }

    async fn on_chat_message(&self, _peer_id: PeerId, display_name: String, text: String) {
        self.print(format!("{}: {}", display_name.cyan().bold(), text));
    }
}

/// Stays silent on the console and hands chat lines to its owner.
pub struct ChatRelay {
    tx: mpsc::UnboundedSender<(PeerId, String)>,
}

impl ChatRelay {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(PeerId, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SessionObserver for ChatRelay {
    async fn on_peer_active(
        &self,
        _peer_id: PeerId,
        _media: RemoteMedia,
        _muted: bool,
        _display_name: String,
    ) {
    }

    async fn on_peer_updated(&self, _peer_id: PeerId, _view: PeerView) {}

    async fn on_peer_closed(&self, _peer_id: PeerId) {}

    async fn on_chat_message(&self, peer_id: PeerId, _display_name: String, text: String) {
        let _ = self.tx.send((peer_id, text));
    }
}
