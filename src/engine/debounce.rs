//! Burst coalescing for the drain loop.

/// What the engine should do after one poll interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceStep {
    /// Packets are still arriving; poll again before acting.
    Wait,
    /// Drain the mailbox and act on the newest packet.
    Drain {
        /// The growth cap was hit while the stream kept coming
        fast_stream: bool,
    },
    /// Nothing queued.
    Idle,
}

/// Decides when a burst has settled enough to act on.
///
/// A mailbox that grew during the last poll interval means a flow is
/// still streaming, so acting now would use a stale packet. Growth is
/// tolerated for at most `cap` consecutive polls.
#[derive(Debug, Clone)]
pub struct Debouncer {
    retries: u32,
    cap: u32,
}

impl Debouncer {
    pub fn new(cap: u32) -> Self {
        Self { retries: 0, cap }
    }

    /// Compare the length sampled before the interval with the current one.
    pub fn observe(&mut self, sampled: usize, current: usize) -> DebounceStep {
        if current > sampled && self.retries < self.cap {
            self.retries += 1;
            return DebounceStep::Wait;
        }

        if current == 0 {
            return DebounceStep::Idle;
        }

        let fast_stream = self.retries >= self.cap;
        self.retries = 0;
        DebounceStep::Drain { fast_stream }
    }

    /// Growth polls counted since the last drain.
    pub fn retries(&self) -> u32 {
        self.retries
    }
}
