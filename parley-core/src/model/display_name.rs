use crate::model::peer::PeerId;
use rand::Rng;

pub const MAX_DISPLAY_NAME_CHARS: usize = 20;

pub fn random_display_name() -> String {
    let n: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("guest-{:04}", n)
}

fn bounded(input: &str) -> String {
    input.trim().chars().take(MAX_DISPLAY_NAME_CHARS).collect()
}

/// Name typed by the local user. An empty name is replaced with a random one.
pub fn sanitize_local(input: &str) -> String {
    let name = bounded(input);
    if name.is_empty() {
        random_display_name()
    } else {
        name
    }
}

/// Name announced by a remote participant. Falls back to its peer id when empty.
pub fn sanitize_remote(input: &str, sender: &PeerId) -> String {
    let name = bounded(input);
    if name.is_empty() {
        sender.to_string()
    } else {
        name
    }
}
