//! Conversation history kept by each agent.
//!
//! The history is an ordered list of turns owned by one agent. It starts
//! empty, grows by exactly one user turn and one assistant turn per chat
//! call, and only shrinks when cleared. Windows of recent turns are handed
//! to the completion service as context.

use crate::types::{ConversationTurn, Role};

/// Default number of recent turns sent to the completion service.
pub const DEFAULT_HISTORY_WINDOW: usize = 8;

/// Smallest window accepted from configuration.
pub const MIN_HISTORY_WINDOW: usize = 6;

/// Largest window accepted from configuration.
pub const MAX_HISTORY_WINDOW: usize = 10;

/// Clamp a configured window into the supported range.
pub fn clamp_window(window: usize) -> usize {
    window.clamp(MIN_HISTORY_WINDOW, MAX_HISTORY_WINDOW)
}

/// Returns the most recent `window_size` turns of `history`.
pub fn truncate_history(history: &[ConversationTurn], window_size: usize) -> &[ConversationTurn] {
    if history.len() <= window_size {
        history
    } else {
        &history[history.len() - window_size..]
    }
}

/// Estimates token count for a turn (rough approximation).
///
/// Uses a simple heuristic of ~4 characters per token for English text.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Ordered conversation history of one agent
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the user utterance and the reply produced for it.
    pub fn record_exchange(&mut self, utterance: &str, response: &str) {
        self.turns.push(ConversationTurn::user(utterance));
        self.turns.push(ConversationTurn::assistant(response));
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The last `window_size` turns.
    pub fn window(&self, window_size: usize) -> &[ConversationTurn] {
        truncate_history(&self.turns, window_size)
    }

    /// Content of the most recent assistant turn, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::Assistant)
            .map(|t| t.content.as_str())
    }

    /// Rough token count of the whole history.
    pub fn estimated_tokens(&self) -> usize {
        self.turns.iter().map(|t| estimate_tokens(&t.content)).sum()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(n: usize) -> ConversationHistory {
        let mut history = ConversationHistory::new();
        for i in 0..n {
            history.record_exchange(&format!("question {}", i), &format!("answer {}", i));
        }
        history
    }

    #[test]
    fn test_truncate_history() {
        let history = history_of(5);
        let window = history.window(3);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, "answer 3");
        assert_eq!(window[2].content, "answer 4");
    }

    #[test]
    fn test_window_larger_than_history() {
        let history = history_of(1);
        assert_eq!(history.window(8).len(), 2);
    }

    #[test]
    fn test_clamp_window() {
        assert_eq!(clamp_window(2), MIN_HISTORY_WINDOW);
        assert_eq!(clamp_window(8), 8);
        assert_eq!(clamp_window(50), MAX_HISTORY_WINDOW);
    }

    #[test]
    fn test_record_and_clear() {
        let mut history = history_of(2);
        assert_eq!(history.len(), 4);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.last_reply(), Some("answer 1"));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.last_reply(), None);
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("test"), 1);
        assert_eq!(estimate_tokens("this is a longer test string"), 7);
    }
}
