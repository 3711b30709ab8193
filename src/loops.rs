//! Matching of `[` / `]` pairs ahead of execution.

use crate::error::{BfError, BracketKind};

/// Bidirectional map between matching loop brackets.
///
/// `jumps[i]` holds the partner index for a `[` or `]` at index `i`;
/// every other position is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopMap {
    jumps: Vec<Option<usize>>,
    pairs: usize,
}

impl LoopMap {
    /// Partner bracket of the bracket at `pos`.
    pub fn get(&self, pos: usize) -> Option<usize> {
        self.jumps.get(pos).copied().flatten()
    }

    /// Number of bracket positions covered (twice the number of loops).
    pub fn len(&self) -> usize {
        self.pairs * 2
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    /// `(open, close)` pairs in order of their opening bracket.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.jumps
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.filter(|&j| j > i).map(|j| (i, j)))
    }
}

/// Scan `code` once and pair every `[` with its `]`.
///
/// Fails on the first `]` with nothing open, or on the innermost `[` still
/// open when the scan ends.
pub fn resolve(code: &[char]) -> Result<LoopMap, BfError> {
    let mut jumps: Vec<Option<usize>> = vec![None; code.len()];
    let mut stack: Vec<usize> = Vec::new();
    let mut pairs = 0;

    for (i, &c) in code.iter().enumerate() {
        if c == '[' {
            stack.push(i);
        } else if c == ']' {
            let Some(open_index) = stack.pop() else {
                return Err(BfError::MalformedLoop {
                    ip: i,
                    kind: BracketKind::Close,
                });
            };
            jumps[open_index] = Some(i);
            jumps[i] = Some(open_index);
            pairs += 1;
        }
    }

    if let Some(unmatched_open) = stack.last().copied() {
        return Err(BfError::MalformedLoop {
            ip: unmatched_open,
            kind: BracketKind::Open,
        });
    }

    tracing::debug!(loops = pairs, len = code.len(), "resolved loop map");
    Ok(LoopMap { jumps, pairs })
}
