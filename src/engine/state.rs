//! Kill-tracking state owned by the engine loop.

use crate::domain::ConnectionSignature;

/// How a drained packet relates to the pending kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The peer's reset we have been waiting for.
    AwaitedReply,
    /// Our own forged reset seen again through the capture.
    OwnTraffic,
    /// Anything else inside the filter: kill it.
    Target,
}

/// Pending-kill state.
///
/// Tracks a single flow. Selecting a new target overwrites the previous
/// expected reply, so confirmation of an earlier kill can be abandoned.
#[derive(Debug, Clone)]
pub struct KillState {
    expected_reply: Option<ConnectionSignature>,
    persist: bool,
}

impl KillState {
    pub fn new(persist: bool) -> Self {
        Self {
            expected_reply: None,
            persist,
        }
    }

    pub fn persist(&self) -> bool {
        self.persist
    }

    pub fn expected_reply(&self) -> Option<ConnectionSignature> {
        self.expected_reply
    }

    pub fn classify(&self, signature: &ConnectionSignature) -> Verdict {
        match self.expected_reply {
            Some(expected) if expected == *signature => Verdict::AwaitedReply,
            // Our forged frame travels the opposite way of the reply
            Some(expected) if expected.reversed() == *signature => Verdict::OwnTraffic,
            _ => Verdict::Target,
        }
    }

    /// Start watching for `reply`, returning the watch it replaces.
    pub fn watch_for(&mut self, reply: ConnectionSignature) -> Option<ConnectionSignature> {
        self.expected_reply.replace(reply)
    }

    /// Record a confirmed kill; the engine goes back to idle.
    pub fn confirm(&mut self) {
        self.expected_reply = None;
    }
}
