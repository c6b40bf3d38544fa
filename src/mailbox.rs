//! Hand-off queue between the capture thread and the engine.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::CapturedFrame;

/// FIFO of captured frames shared by the capture producer and the engine.
///
/// The queue's mutex doubles as the gate: while the engine holds a
/// [`MailboxGate`], pushes wait until the drain-and-decide cycle is done.
#[derive(Debug, Default)]
pub struct Mailbox {
    queue: Mutex<VecDeque<CapturedFrame>>,
    arrived: Condvar,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<CapturedFrame>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a frame and wake the engine if it is waiting.
    pub fn push(&self, frame: CapturedFrame) {
        self.lock().push_back(frame);
        self.arrived.notify_one();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Block until at least one frame is queued or `timeout` elapses.
    ///
    /// Returns the queue length observed on wake-up (zero on timeout).
    pub fn wait_for_frames(&self, timeout: Duration) -> usize {
        let guard = self.lock();
        let (guard, _) = self
            .arrived
            .wait_timeout_while(guard, timeout, |queue| queue.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        guard.len()
    }

    /// Close the gate for a drain-and-decide cycle.
    pub fn gate(&self) -> MailboxGate<'_> {
        MailboxGate { queue: self.lock() }
    }
}

/// Exclusive access to the queue for the duration of one drain cycle.
pub struct MailboxGate<'a> {
    queue: MutexGuard<'a, VecDeque<CapturedFrame>>,
}

impl MailboxGate<'_> {
    /// Empty the queue, keeping only the most recently pushed frame.
    ///
    /// Returns the frame and how many older frames were discarded.
    pub fn take_latest(&mut self) -> Option<(CapturedFrame, usize)> {
        let latest = self.queue.pop_back()?;
        let discarded = self.queue.len();
        self.queue.clear();
        Some((latest, discarded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    fn frame(tag: u8) -> CapturedFrame {
        CapturedFrame::from_wire(&[tag; 4])
    }

    #[test]
    fn test_take_latest_keeps_newest() {
        let mailbox = Mailbox::new();
        for tag in 1..=5 {
            mailbox.push(frame(tag));
        }

        let (latest, discarded) = mailbox.gate().take_latest().unwrap();

        assert_eq!(latest.data(), &[5u8; 4]);
        assert_eq!(discarded, 4);
        assert!(mailbox.is_empty());
    }

    #[test]
    fn test_take_latest_on_empty() {
        let mailbox = Mailbox::new();
        assert!(mailbox.gate().take_latest().is_none());
    }

    #[test]
    fn test_wait_times_out_when_empty() {
        let mailbox = Mailbox::new();
        let start = Instant::now();

        assert_eq!(mailbox.wait_for_frames(Duration::from_millis(20)), 0);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_wait_wakes_on_push() {
        let mailbox = Arc::new(Mailbox::new());
        let producer = {
            let mailbox = mailbox.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                mailbox.push(frame(1));
            })
        };

        let len = mailbox.wait_for_frames(Duration::from_secs(5));
        producer.join().unwrap();

        assert_eq!(len, 1);
    }

    #[test]
    fn test_push_waits_for_open_gate() {
        let mailbox = Arc::new(Mailbox::new());
        let gate = mailbox.gate();

        let producer = {
            let mailbox = mailbox.clone();
            thread::spawn(move || mailbox.push(frame(7)))
        };
        thread::sleep(Duration::from_millis(30));
        drop(gate);
        producer.join().unwrap();

        assert_eq!(mailbox.len(), 1);
    }
}
