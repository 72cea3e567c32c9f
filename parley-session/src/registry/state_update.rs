/// What a remote participant looks like to us: the state its packets control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerView {
    pub muted: bool,
    pub display_name: String,
}

impl PeerView {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            muted: false,
            display_name: display_name.into(),
        }
    }
}

/// A remote state change, held as data until it can be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateUpdate {
    SetMute(bool),
    SetName(String),
}

impl StateUpdate {
    pub fn apply(&self, view: &mut PeerView) {
        match self {
            StateUpdate::SetMute(muted) => view.muted = *muted,
            StateUpdate::SetName(name) => view.display_name = name.clone(),
        }
    }
}
