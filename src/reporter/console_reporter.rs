//! Console-based event reporter.

use std::io::{self, Write};

use crate::capture::CaptureFilter;
use crate::domain::{tcp_flags, ConnectionSignature};
use crate::reporter::KillReporter;

/// Reports termination events on stdout.
pub struct ConsoleReporter {
    /// Whether to show flags alongside endpoints
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Enable or disable verbose output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn format_start(&self, interface: &str, filter: &CaptureFilter, persist: bool) -> String {
        if persist {
            format!("Persistently killing connections on: {} - {}", interface, filter)
        } else {
            format!("Killing the next connection on: {} - {}", interface, filter)
        }
    }

    fn format_kill(&self, target: &ConnectionSignature) -> String {
        let mut output = format!(
            "Killing: {}:{} ---> {}:{}",
            target.source, target.source_port, target.destination, target.destination_port
        );
        if self.verbose {
            output.push_str(&format!(" [{}]", tcp_flags::describe(target.flags)));
        }
        output
    }

    fn format_confirmed(&self, reply: &ConnectionSignature) -> String {
        let mut output = "Great Success. Connection Dead: Acknowledgment reset seen".to_string();
        if self.verbose {
            output.push_str(&format!(" ({})", reply));
        }
        output
    }

    fn emit(&self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl KillReporter for ConsoleReporter {
    fn on_start(&self, interface: &str, filter: &CaptureFilter, persist: bool) {
        self.emit(&self.format_start(interface, filter, persist));
        self.emit("Press Ctrl+C to stop.\n");
    }

    fn on_kill(&self, target: &ConnectionSignature) {
        self.emit(&self.format_kill(target));
    }

    fn on_confirmed(&self, reply: &ConnectionSignature) {
        self.emit(&self.format_confirmed(reply));
    }

    fn on_stop(&self) {
        self.emit("\nStopping connection killer.");
    }
}
