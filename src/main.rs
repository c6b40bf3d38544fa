//! Thor - TCP connection killer
//!
//! Command-line driver: parses operator input, sets up logging, wires the
//! capture thread to the termination engine and owns the process exit.

use std::net::Ipv4Addr;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use thor::capture::{resolve_interface, spawn_producer};
use thor::reporter::{ConsoleReporter, KillReporter};
use thor::{
    Config, ConnectionSignature, EngineExit, EngineSettings, Mailbox, PacketCapture, PnetCapture,
    TerminationEngine,
};

/// Exit status after a confirmed kill outside persistent mode.
const EXIT_CONNECTION_KILLED: i32 = 1;
/// Exit status for fatal errors.
const EXIT_FATAL: i32 = 2;

#[derive(Parser)]
#[command(name = "thor")]
#[command(about = "Thor: Killing conns since 2016")]
struct Cli {
    /// The interface to use
    #[arg(short = 'i', value_name = "ETH0")]
    iface: Option<String>,

    /// The target server
    #[arg(short = 't', value_name = "192.168.1.1")]
    target_ip: Option<Ipv4Addr>,

    /// The target port
    #[arg(short = 's', value_name = "22")]
    target_port: Option<u16>,

    /// Verbosity level (-v info, -vv debug)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbosity: u8,

    /// Persistently kill connections
    #[arg(short = 'p')]
    persist: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match EngineSettings::from_env().and_then(|engine| {
        Config::new(
            cli.iface,
            cli.target_ip,
            cli.target_port,
            cli.persist,
            cli.verbosity,
            engine,
        )
    }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(EXIT_FATAL as u8);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.tracing_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let outcome = Outcome::from_run(run(config));
    match &outcome {
        Outcome::Killed(reply) => {
            info!("Confirmed by {}", reply);
            println!("{}", outcome.message());
            // The capture thread is left blocked in its receive call and is
            // torn down with the process.
            std::process::exit(outcome.status());
        }
        Outcome::Failed(e) => {
            error!("{}", e);
            eprintln!("{}", outcome.message());
        }
        Outcome::Stopped => {}
    }

    ExitCode::from(outcome.status() as u8)
}

/// How the process ends after the engine returns.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Killed(ConnectionSignature),
    Stopped,
    Failed(String),
}

impl Outcome {
    fn from_run(result: Result<EngineExit>) -> Self {
        match result {
            Ok(EngineExit::ConnectionKilled(reply)) => Outcome::Killed(reply),
            Ok(EngineExit::Interrupted) => Outcome::Stopped,
            Err(e) => Outcome::Failed(format!("{:#}", e)),
        }
    }

    fn status(&self) -> i32 {
        match self {
            Outcome::Killed(_) => EXIT_CONNECTION_KILLED,
            Outcome::Stopped => 0,
            Outcome::Failed(_) => EXIT_FATAL,
        }
    }

    /// Final line for the operator, if any.
    fn message(&self) -> String {
        match self {
            Outcome::Killed(_) => "Bye".to_string(),
            Outcome::Stopped => String::new(),
            Outcome::Failed(e) => format!("error: {}", e),
        }
    }
}

fn run(config: Config) -> Result<EngineExit> {
    let interface =
        resolve_interface(config.interface.as_deref()).context("Failed to select interface")?;
    info!("Interface set: {}", interface.name);
    info!("Filter set: {}", config.filter);

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("Failed to install Ctrl+C handler")?;
    }

    let (mut capture, injector) = PnetCapture::open(&interface, config.filter)
        .with_context(|| format!("Failed to open {} with filter '{}'", interface.name, config.filter))?;
    capture.set_running(running.clone());

    let reporter = ConsoleReporter::new().with_verbose(config.verbosity >= 2);
    reporter.on_start(&interface.name, &config.filter, config.persist);

    let mailbox = Arc::new(Mailbox::new());
    let producer =
        spawn_producer(capture, mailbox.clone()).context("Failed to start capture thread")?;

    let mut engine = TerminationEngine::new(mailbox, injector, config.engine, config.persist)
        .with_reporter(Box::new(reporter))
        .with_running(running.clone());

    let exit = engine.run().context("Termination engine failed")?;

    if exit == EngineExit::Interrupted {
        running.store(false, Ordering::SeqCst);
        if producer.join().is_err() {
            error!("Capture thread panicked");
        }
    }

    Ok(exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::net::Ipv4Addr;
    use thor::domain::tcp_flags;

    #[test]
    fn test_confirmed_kill_says_bye_with_status_one() {
        let reply = ConnectionSignature::new(
            Ipv4Addr::new(10, 0, 0, 9),
            51000,
            Ipv4Addr::new(10, 0, 0, 5),
            22,
            tcp_flags::RST,
        );

        let outcome = Outcome::from_run(Ok(EngineExit::ConnectionKilled(reply)));

        assert_eq!(outcome, Outcome::Killed(reply));
        assert_eq!(outcome.status(), 1);
        assert_eq!(outcome.message(), "Bye");
    }

    #[test]
    fn test_fatal_error_reports_with_status_two() {
        let err = anyhow!("Operation not permitted").context("Failed to open eth0");

        let outcome = Outcome::from_run(Err(err));

        assert_eq!(outcome.status(), 2);
        assert_eq!(
            outcome.message(),
            "error: Failed to open eth0: Operation not permitted"
        );
    }

    #[test]
    fn test_interrupt_exits_cleanly() {
        let outcome = Outcome::from_run(Ok(EngineExit::Interrupted));

        assert_eq!(outcome, Outcome::Stopped);
        assert_eq!(outcome.status(), 0);
        assert!(outcome.message().is_empty());
    }
}
