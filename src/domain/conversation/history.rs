//! Role-tagged conversation turns and the bounded history window.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
}

/// One text turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Default number of prior turns sent along with a new query.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// Default number of turns retained before the oldest are dropped.
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// Conversation so far, in order.
///
/// At most `capacity` turns are stored, oldest dropped first.
/// [`ConversationHistory::input_for`] applies the smaller window when
/// building agent input.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
    #[serde(skip)]
    capacity: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history holding at most `capacity` turns (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turns: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        let excess = self.turns.len().saturating_sub(self.capacity);
        if excess > 0 {
            self.turns.drain(..excess);
        }
    }

    /// Records a completed exchange. Empty responses are not recorded.
    pub fn record_exchange(&mut self, query: &str, response: &str) {
        if response.is_empty() {
            return;
        }
        self.push(Turn::user(query));
        self.push(Turn::assistant(response));
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

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The last `window` non-empty turns.
    pub fn recent(&self, window: usize) -> Vec<Turn> {
        let non_empty: Vec<&Turn> = self
            .turns
            .iter()
            .filter(|t| !t.content.is_empty())
            .collect();
        let skip = non_empty.len().saturating_sub(window);
        non_empty.into_iter().skip(skip).cloned().collect()
    }

    /// Agent input for a new query: the recent window then the query itself.
    pub fn input_for(&self, query: &str, window: usize) -> Vec<Turn> {
        let mut input = self.recent(window);
        input.push(Turn::user(query));
        input
    }
}
