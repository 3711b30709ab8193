//! Unbuffered, non-echoed byte input from stdin.

use std::io::{self, IsTerminal, Read};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Standard input that switches the terminal into raw mode on first use.
///
/// Raw mode is only touched when stdin is a terminal, and only once the
/// program actually reads. Dropping the reader restores the previous mode.
pub struct RawStdin {
    stdin: io::Stdin,
    raw: Option<RawModeGuard>,
}

impl Default for RawStdin {
    fn default() -> Self {
        Self::new()
    }
}

impl RawStdin {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            raw: None,
        }
    }

    pub fn is_raw(&self) -> bool {
        self.raw.is_some()
    }

    fn ensure_raw(&mut self) -> io::Result<()> {
        if self.raw.is_none() && self.stdin.is_terminal() {
            self.raw = Some(RawModeGuard::acquire()?);
        }
        Ok(())
    }
}

impl Read for RawStdin {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_raw()?;
        self.stdin.lock().read(buf)
    }
}

/// Raw mode held for as long as the guard lives.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        tracing::debug!("terminal raw mode enabled");
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match disable_raw_mode() {
            Ok(()) => tracing::debug!("terminal mode restored"),
            Err(e) => tracing::warn!("failed to restore terminal mode: {e}"),
        }
    }
}

/// Restore the terminal from outside the reader, e.g. when the thread that
/// owns it is left blocked on a read during shutdown.
pub fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!("failed to restore terminal mode: {e}");
    }
}
