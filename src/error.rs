use std::fmt;

/// Errors that can occur while loading or running a Brainfuck program.
#[derive(Debug, thiserror::Error)]
pub enum BfError {
    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    MalformedLoop { ip: usize, kind: BracketKind },

    /// Reading a byte for `,` failed (closed stream, raw mode failure, EOF).
    #[error("I/O error reading input at instruction {ip}: {source}")]
    InputRead {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    /// Writing program output failed.
    #[error("I/O error writing output at instruction {ip}: {source}")]
    OutputWrite {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: u64 },

    /// Execution aborted due to cooperative cancellation (timeout, Ctrl+C)
    #[error("Execution aborted: cancelled")]
    Canceled,
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}

impl BfError {
    /// Source position the error points at, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            BfError::MalformedLoop { ip, .. }
            | BfError::InputRead { ip, .. }
            | BfError::OutputWrite { ip, .. } => Some(*ip),
            BfError::StepLimitExceeded { .. } | BfError::Canceled => None,
        }
    }

    /// Load-time errors are reported before any instruction runs.
    pub fn is_load_error(&self) -> bool {
        matches!(self, BfError::MalformedLoop { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_kind_displays_quoted_symbol() {
        assert_eq!(BracketKind::Open.to_string(), "'['");
        assert_eq!(BracketKind::Close.to_string(), "']'");
    }

    #[test]
    fn position_only_for_located_errors() {
        let err = BfError::MalformedLoop { ip: 4, kind: BracketKind::Close };
        assert_eq!(err.position(), Some(4));
        assert!(err.is_load_error());
        assert_eq!(BfError::Canceled.position(), None);
        assert!(!BfError::StepLimitExceeded { limit: 3 }.is_load_error());
    }
}
