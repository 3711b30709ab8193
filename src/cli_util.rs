use std::io::{self, IsTerminal, Write};

use nu_ansi_term::{Color, Style};

use crate::BfError;

/// Pretty-print a [`BfError`] with caret positioning.
/// If `program` is `Some("bfrun")`, prefix messages with "bfrun: ...".
pub fn print_error(program: Option<&str>, code: &str, err: &BfError) {
    let msg = prefixed(program, &describe(err));
    match err.position() {
        Some(ip) => print_error_with_context(&msg, code, ip),
        None => {
            eprintln!("{}", label(&msg));
            let _ = io::stderr().flush();
        }
    }
}

/// One-line description used as the error headline.
pub fn describe(err: &BfError) -> String {
    match err {
        BfError::MalformedLoop { kind, .. } => format!("Parse error: unmatched bracket {kind}"),
        BfError::InputRead { source, .. } => format!("I/O error: failed to read input: {source}"),
        BfError::OutputWrite { source, .. } => format!("I/O error: failed to write output: {source}"),
        BfError::StepLimitExceeded { .. } | BfError::Canceled => err.to_string(),
    }
}

fn prefixed(program: Option<&str>, msg: &str) -> String {
    match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg.to_string(),
    }
}

// Styled header for TTY stderr; keep pipelines clean otherwise
fn label(msg: &str) -> String {
    if io::stderr().is_terminal() {
        Style::new().fg(Color::Red).bold().paint(msg).to_string()
    } else {
        msg.to_string()
    }
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{} at instruction {pos}", label(prefix));
    for line in context_lines(code, pos) {
        eprintln!("  {line}");
    }
    let _ = io::stderr().flush();
}

/// The source window around `pos` and the caret line beneath it.
fn context_lines(code: &str, pos: usize) -> [String; 2] {
    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    // Line breaks inside the window would push the caret out of place.
    let slice: String = code
        .chars()
        .skip(start_char)
        .take(end_char.saturating_sub(start_char))
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    // Caret under the exact position
    let caret_offset_chars = pos.saturating_sub(start_char);
    let underline = format!("{}^", " ".repeat(caret_offset_chars));

    [slice, underline]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BracketKind;

    #[test]
    fn caret_sits_under_position() {
        let [src, caret] = context_lines("++[--", 2);
        assert_eq!(src, "++[--");
        assert_eq!(caret, "  ^");
    }

    #[test]
    fn window_is_clipped_on_long_sources() {
        let code = format!("{}]{}", "+".repeat(100), "-".repeat(100));
        let [src, caret] = context_lines(&code, 100);
        assert_eq!(src.chars().count(), 65);
        assert_eq!(src.chars().nth(32), Some(']'));
        assert_eq!(caret.len(), 33);
    }

    #[test]
    fn multibyte_and_newlines_do_not_break_alignment() {
        let [src, caret] = context_lines("é\n[", 2);
        assert_eq!(src, "é [");
        assert_eq!(caret, "  ^");
    }

    #[test]
    fn describe_names_the_bracket() {
        let err = BfError::MalformedLoop { ip: 0, kind: BracketKind::Close };
        assert_eq!(describe(&err), "Parse error: unmatched bracket ']'");
    }
}
