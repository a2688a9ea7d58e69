//! USSD response rendering
//!
//! Every reply to the gateway carries a leading marker: `CON ` keeps the
//! session open and prompts for further input, `END ` closes it. This is
//! the wire contract with the telecom gateway and holds on every path,
//! error paths included.

use tracing::warn;

/// Marker prefix for a response that keeps the session open
pub const CONTINUE_MARKER: &str = "CON ";

/// Marker prefix for a response that terminates the session
pub const END_MARKER: &str = "END ";

/// Longest response body most USSD gateways will deliver without
/// truncating on their side.
pub const MAX_RESPONSE_LEN: usize = 182;

/// A single USSD reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UssdResponse {
    /// Session stays open; the gateway prompts for the next input
    Continue(String),
    /// Session is closed; no further input will arrive for it
    End(String),
}

impl UssdResponse {
    pub fn con(text: impl Into<String>) -> Self {
        UssdResponse::Continue(text.into())
    }

    pub fn end(text: impl Into<String>) -> Self {
        UssdResponse::End(text.into())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UssdResponse::End(_))
    }

    pub fn text(&self) -> &str {
        match self {
            UssdResponse::Continue(text) | UssdResponse::End(text) => text,
        }
    }

    /// Render the tagged wire form, truncated to the transport ceiling
    pub fn render(&self) -> String {
        let (marker, text) = match self {
            UssdResponse::Continue(text) => (CONTINUE_MARKER, text),
            UssdResponse::End(text) => (END_MARKER, text),
        };

        let mut rendered = format!("{marker}{text}");
        if rendered.chars().count() > MAX_RESPONSE_LEN {
            warn!(
                length = rendered.chars().count(),
                "USSD response exceeds transport ceiling, truncating"
            );
            rendered = rendered.chars().take(MAX_RESPONSE_LEN).collect();
        }
        rendered
    }
}

impl std::fmt::Display for UssdResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
