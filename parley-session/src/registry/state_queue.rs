use crate::registry::state_update::StateUpdate;
use parley_core::PeerId;
use std::collections::{HashMap, VecDeque};

/// Per-peer FIFO of updates that arrived before the peer's media did.
///
/// A queue exists for a peer exactly while its data connection is open and no
/// media has been seen for it.
#[derive(Default)]
pub struct StateQueue {
    pending: HashMap<PeerId, VecDeque<StateUpdate>>,
}

impl StateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start deferring updates for `peer_id`. Keeps an existing queue intact.
    pub fn open(&mut self, peer_id: PeerId) {
        self.pending.entry(peer_id).or_default();
    }

    /// Append `update` if `peer_id` has a queue. Otherwise hand it back to be applied now.
    pub fn push(&mut self, peer_id: &PeerId, update: StateUpdate) -> Option<StateUpdate> {
        match self.pending.get_mut(peer_id) {
            Some(queue) => {
                queue.push_back(update);
                None
            }
            None => Some(update),
        }
    }

    /// Remove the queue, returning its updates in arrival order.
    pub fn take(&mut self, peer_id: &PeerId) -> Option<VecDeque<StateUpdate>> {
        self.pending.remove(peer_id)
    }

    /// Drop the queue without applying anything. Returns how many updates were lost.
    pub fn discard(&mut self, peer_id: &PeerId) -> Option<usize> {
        self.pending.remove(peer_id).map(|queue| queue.len())
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.pending.contains_key(peer_id)
    }

    pub fn len_of(&self, peer_id: &PeerId) -> usize {
        self.pending.get(peer_id).map_or(0, VecDeque::len)
    }

    pub fn queued(&self) -> Vec<(PeerId, usize)> {
        let mut queued: Vec<(PeerId, usize)> = self
            .pending
            .iter()
            .map(|(peer_id, queue)| (peer_id.clone(), queue.len()))
            .collect();
        queued.sort();
        queued
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
