//! Chat message extraction from raw log lines.
//!
//! Factorio writes chat as `   0.000 [CHAT] PlayerName: message` (the
//! leading tick timestamp is absent in some contexts). Lines whose message
//! text starts with one of the configured self-authored markers are excluded,
//! so a tool driving the server never reports its own announcements back to
//! itself as incoming player chat.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static CHAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s*[\d.]+\s+)?\[CHAT\]\s+([^:]+):\s*(.+)$").expect("valid chat regex")
});

/// A single chat line attributed to a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub player: String,
    pub text: String,
}

/// Set of message prefixes that mark a chat line as this tool's own output.
///
/// Stored as `{prefix, reason}` pairs so the surrounding CLI can register
/// additional own-output prefixes without touching the extraction logic.
#[derive(Debug, Clone)]
pub struct SelfMarkers {
    markers: Vec<(String, String)>,
}

impl Default for SelfMarkers {
    fn default() -> Self {
        Self {
            markers: vec![
                ("[AI]".to_string(), "command echo".to_string()),
                ("[AI Chat]".to_string(), "chat reply".to_string()),
            ],
        }
    }
}

impl SelfMarkers {
    /// An empty marker set: nothing is treated as self-authored.
    pub fn none() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    /// Registers an additional self-authored prefix.
    pub fn add(&mut self, prefix: impl Into<String>, reason: impl Into<String>) -> &mut Self {
        self.markers.push((prefix.into(), reason.into()));
        self
    }

    /// Whether the message text originated from this tool's own output.
    pub fn is_self_authored(&self, text: &str) -> bool {
        self.markers
            .iter()
            .any(|(prefix, _)| text.starts_with(prefix))
    }
}

/// Extracts chat messages from log lines, in input order.
///
/// Lines that do not match the chat pattern are silently skipped; that is the
/// normal case for the vast majority of log output, not an error. Player name
/// and message text are trimmed.
pub fn extract_chat_messages<'a, I>(lines: I, markers: &SelfMarkers) -> Vec<ChatMessage>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let captures = CHAT_PATTERN.captures(line)?;
            let player = captures[1].trim();
            let text = captures[2].trim();
            if markers.is_self_authored(text) {
                return None;
            }
            Some(ChatMessage {
                player: player.to_string(),
                text: text.to_string(),
            })
        })
        .collect()
}
