use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::guardrails::Role;

/// Turns kept per session before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { speaker: Speaker::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { speaker: Speaker::Assistant, content: content.into() }
    }
}

/// Bounded conversation history keyed by role and session id. A guest and a
/// manager using the same session id never see each other's turns.
pub struct SessionLog {
    limit: usize,
    sessions: Mutex<HashMap<(Role, String), VecDeque<Turn>>>,
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl SessionLog {
    pub fn new(limit: usize) -> Self {
        Self { limit: limit.max(1), sessions: Mutex::new(HashMap::new()) }
    }

    /// Oldest first.
    pub fn history(&self, role: Role, session_id: &str) -> Vec<Turn> {
        let sessions = self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions
            .get(&(role, session_id.to_string()))
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn append<I>(&self, role: Role, session_id: &str, turns: I)
    where
        I: IntoIterator<Item = Turn>,
    {
        let mut sessions = self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let history = sessions.entry((role, session_id.to_string())).or_default();
        for turn in turns {
            history.push_back(turn);
        }
        while history.len() > self.limit {
            history.pop_front();
        }
    }

    /// Forgets the session. Returns whether anything was stored.
    pub fn reset(&self, role: Role, session_id: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.remove(&(role, session_id.to_string())).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionLog, Speaker, Turn, DEFAULT_HISTORY_LIMIT};
    use crate::guardrails::Role;

    #[test]
    fn history_keeps_order_and_drops_oldest() {
        let log = SessionLog::new(4);
        for index in 0..3 {
            log.append(
                Role::Guest,
                "s1",
                [Turn::user(format!("q{index}")), Turn::assistant(format!("a{index}"))],
            );
        }

        let history = log.history(Role::Guest, "s1");
        let contents: Vec<&str> = history.iter().map(|turn| turn.content.as_str()).collect();
        assert_eq!(contents, vec!["q1", "a1", "q2", "a2"]);
        assert_eq!(history[0].speaker, Speaker::User);
    }

    #[test]
    fn sessions_are_isolated_by_role_and_id() {
        let log = SessionLog::default();
        log.append(Role::Guest, "shared", [Turn::user("book a room")]);
        log.append(Role::Manager, "shared", [Turn::user("revenue?")]);
        log.append(Role::Guest, "other", [Turn::user("hello")]);

        assert_eq!(log.history(Role::Guest, "shared"), vec![Turn::user("book a room")]);
        assert_eq!(log.history(Role::Manager, "shared"), vec![Turn::user("revenue?")]);
        assert_eq!(log.session_count(), 3);
    }

    #[test]
    fn reset_clears_only_that_session() {
        let log = SessionLog::default();
        log.append(Role::Guest, "s1", [Turn::user("hi")]);
        log.append(Role::Guest, "s2", [Turn::user("hi")]);

        assert!(log.reset(Role::Guest, "s1"));
        assert!(!log.reset(Role::Guest, "s1"));
        assert!(log.history(Role::Guest, "s1").is_empty());
        assert_eq!(log.history(Role::Guest, "s2").len(), 1);
    }

    #[test]
    fn default_limit_is_fifty_turns() {
        let log = SessionLog::default();
        log.append(Role::Manager, "s", (0..60).map(|index| Turn::user(index.to_string())));

        let history = log.history(Role::Manager, "s");
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history[0].content, "10");
    }
}
