//! Termination engine.
//!
//! Drains the mailbox, coalesces bursts, and decides for the newest packet
//! whether it confirms a pending kill, is our own reset coming back, or is
//! a connection to kill.

mod debounce;
mod state;

pub use debounce::{DebounceStep, Debouncer};
pub use state::{KillState, Verdict};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use crate::config::EngineSettings;
use crate::domain::{ConnectionSignature, TcpSegment};
use crate::error::EngineError;
use crate::forge::ForgedResetFrame;
use crate::inject::FrameInjector;
use crate::mailbox::Mailbox;
use crate::reporter::{ConsoleReporter, KillReporter};

/// Result of one decision step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The awaited reset arrived.
    Confirmed(ConnectionSignature),
    /// Our own reset, seen again; nothing done.
    Ignored(ConnectionSignature),
    /// A reset was sent for `target` and `expected_reply` is now watched.
    Killed {
        target: ConnectionSignature,
        expected_reply: ConnectionSignature,
    },
}

/// Why the engine loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineExit {
    /// A kill was confirmed outside persistent mode. The caller is expected
    /// to end the process.
    ConnectionKilled(ConnectionSignature),
    /// The running flag was cleared.
    Interrupted,
}

/// The drain-and-decide loop.
pub struct TerminationEngine<I: FrameInjector> {
    mailbox: Arc<Mailbox>,
    injector: I,
    reporter: Box<dyn KillReporter>,
    state: KillState,
    debouncer: Debouncer,
    settings: EngineSettings,
    running: Arc<AtomicBool>,
}

impl<I: FrameInjector> TerminationEngine<I> {
    pub fn new(mailbox: Arc<Mailbox>, injector: I, settings: EngineSettings, persist: bool) -> Self {
        Self {
            mailbox,
            injector,
            reporter: Box::new(ConsoleReporter::new()),
            state: KillState::new(persist),
            debouncer: Debouncer::new(settings.growth_cap),
            settings,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn KillReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Share a running flag; clearing it stops [`run`](Self::run).
    pub fn with_running(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = running;
        self
    }

    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn state(&self) -> &KillState {
        &self.state
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    /// Loop until a terminal kill or until the running flag is cleared.
    pub fn run(&mut self) -> Result<EngineExit, EngineError> {
        info!(
            "Termination engine started (poll {:?}, growth cap {}, persist {})",
            self.settings.poll_interval,
            self.settings.growth_cap,
            self.state.persist()
        );

        while self.running.load(Ordering::SeqCst) {
            if let Some(Decision::Confirmed(reply)) = self.poll_once()? {
                if !self.state.persist() {
                    return Ok(EngineExit::ConnectionKilled(reply));
                }
            }
        }

        self.reporter.on_stop();
        Ok(EngineExit::Interrupted)
    }

    /// One wait, debounce and (possibly) drain cycle.
    ///
    /// Returns the decision taken, or `None` when the cycle ended without
    /// draining.
    pub fn poll_once(&mut self) -> Result<Option<Decision>, EngineError> {
        let sampled = self.mailbox.wait_for_frames(self.settings.idle_wait);
        if sampled == 0 {
            return Ok(None);
        }

        thread::sleep(self.settings.poll_interval);

        match self.debouncer.observe(sampled, self.mailbox.len()) {
            DebounceStep::Wait | DebounceStep::Idle => Ok(None),
            DebounceStep::Drain { fast_stream } => {
                if fast_stream {
                    warn!(
                        "Stream still growing after {} polls, acting on latest packet",
                        self.settings.growth_cap
                    );
                }
                self.drain()
            }
        }
    }

    /// Hold the gate, keep the newest frame and decide on it.
    fn drain(&mut self) -> Result<Option<Decision>, EngineError> {
        let mailbox = Arc::clone(&self.mailbox);
        let mut gate = mailbox.gate();

        let Some((frame, discarded)) = gate.take_latest() else {
            return Ok(None);
        };
        if discarded > 0 {
            debug!("Discarded {} older packets from the burst", discarded);
        }

        let segment = frame.segment()?;
        let decision = self.decide(&segment)?;

        drop(gate);
        Ok(Some(decision))
    }

    /// Classify `segment` against the pending kill and act on it.
    pub fn decide(&mut self, segment: &TcpSegment) -> Result<Decision, EngineError> {
        let signature = segment.signature();

        match self.state.classify(&signature) {
            Verdict::AwaitedReply => {
                self.reporter.on_confirmed(&signature);
                self.state.confirm();
                Ok(Decision::Confirmed(signature))
            }
            Verdict::OwnTraffic => {
                debug!("Ignoring our own reset: {}", signature);
                Ok(Decision::Ignored(signature))
            }
            Verdict::Target => {
                self.reporter.on_kill(&signature);

                let forged = ForgedResetFrame::craft(segment).map_err(|source| EngineError::Craft {
                    target: signature,
                    source,
                })?;
                self.injector
                    .transmit(&forged)
                    .map_err(|source| EngineError::Inject {
                        target: signature,
                        source,
                    })?;

                let expected_reply = forged.expected_reply();
                if let Some(previous) = self.state.watch_for(expected_reply) {
                    if previous != expected_reply {
                        debug!("No longer waiting for {}", previous);
                    }
                }
                debug!("Waiting for {}", expected_reply);

                Ok(Decision::Killed {
                    target: signature,
                    expected_reply,
                })
            }
        }
    }
}
