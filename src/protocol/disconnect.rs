//! Disconnect reasons.
//!
//! A reason is a short human-readable string kept on the connection for the
//! UI. Its length is bounded by a fixed capacity that includes one slot for the
//! terminator older peers expect, so at most `capacity - 1` bytes of text are
//! kept. Truncation never splits a UTF-8 character.

use std::fmt;

/// Argument passed to a [`MessageFormatter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatArg<'a> {
    Int(i64),
    Text(&'a str),
}

impl fmt::Display for FormatArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Int(value) => write!(f, "{value}"),
            FormatArg::Text(text) => f.write_str(text),
        }
    }
}

/// Renders a localized message id with arguments
pub trait MessageFormatter {
    fn format(&self, message_id: u16, args: &[FormatArg<'_>]) -> String;
}

impl<F> MessageFormatter for F
where
    F: Fn(u16, &[FormatArg<'_>]) -> String,
{
    fn format(&self, message_id: u16, args: &[FormatArg<'_>]) -> String {
        self(message_id, args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectReason {
    text: String,
}

impl DisconnectReason {
    /// Copy `text`, truncated to fit `capacity`
    pub fn new(text: &str, capacity: usize) -> Self {
        let max_len = capacity.saturating_sub(1);
        let mut end = text.len().min(max_len);
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        Self {
            text: text[..end].to_owned(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_reason_kept() {
        let reason = DisconnectReason::new("Kicked", 256);
        assert_eq!(reason.as_str(), "Kicked");
    }

    #[test]
    fn test_long_reason_truncated() {
        let long = "x".repeat(300);
        let reason = DisconnectReason::new(&long, 256);
        assert_eq!(reason.as_str().len(), 255);
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // 'é' is two bytes; capacity 4 leaves room for 3 bytes of text
        let reason = DisconnectReason::new("aéé", 4);
        assert_eq!(reason.as_str(), "aé");

        let reason = DisconnectReason::new("éé", 4);
        assert_eq!(reason.as_str(), "é");
    }

    fn render(id: u16, args: &[FormatArg<'_>]) -> String {
        let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
        format!("#{id}: {}", rendered.join(", "))
    }

    #[test]
    fn test_function_formatter() {
        let text = render.format(7, &[FormatArg::Text("timeout"), FormatArg::Int(30)]);
        assert_eq!(text, "#7: timeout, 30");
    }
}
