//! # App Module
//!
//! The measurement run behind the `hx711-uart` binary: open the line, send one
//! request, read the reply, close the line.
//!
//! Only a failed open or a failed close is fatal. A failed request or read is
//! logged and the run still succeeds, unless [`AppConfig::strict`] is set.

use log::{error, info};

use crate::config::AppConfig;
use crate::error::Result;
use crate::hx711::{RESPONSE_SIZE, read_measurement, request_measurement};
use crate::serial::{LineHandle, LineSettings, SerialLine};

/// Result of one measurement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Line opened and closed; carries the reply if the exchange worked.
    Success(Option<[u8; RESPONSE_SIZE]>),
    /// The line could not be opened or closed, or the exchange failed in
    /// strict mode.
    Failure,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success(_))
    }
}

/// Opens the line with `open` and runs one exchange on it.
pub fn run_with<L, F>(open: F, config: &AppConfig) -> RunOutcome
where
    L: SerialLine,
    F: FnOnce(&LineSettings) -> Result<LineHandle<L>>,
{
    match open(&config.line) {
        Ok(line) => run(line, config),
        Err(e) => {
            error!("UART initialization error: {e}");
            RunOutcome::Failure
        }
    }
}

/// Runs one request/reply exchange on an open line and closes it.
pub fn run<L: SerialLine>(mut line: LineHandle<L>, config: &AppConfig) -> RunOutcome {
    let mut exchange_ok = true;

    if let Err(e) = request_measurement(&mut line, config.gain) {
        error!("Measurement request failed: {e}");
        exchange_ok = false;
    }

    let reply = match read_measurement(&mut line) {
        Ok(reply) => {
            info!("Received bytes: {}", hex::encode(reply));
            Some(reply)
        }
        Err(e) => {
            error!("UART receive error: {e}");
            exchange_ok = false;
            None
        }
    };

    if let Err(e) = line.close() {
        error!("UART closing error: {e}");
        return RunOutcome::Failure;
    }

    if config.strict && !exchange_ok {
        error!("Measurement exchange failed (strict mode)");
        return RunOutcome::Failure;
    }

    RunOutcome::Success(reply)
}
