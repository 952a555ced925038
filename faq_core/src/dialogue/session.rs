//! Per-user session state owned by the host.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Chat-platform user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of one user's conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    /// Whether exam cards are consulted alongside the FAQ.
    pub exam_mode: bool,
}

/// Sessions keyed by user. Users never share state.
#[derive(Debug, Clone, Default)]
pub struct Sessions {
    sessions: HashMap<UserId, Session>,
}

impl Sessions {
    /// Create an empty session map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a user's session, creating a default one on first contact.
    pub fn get_mut(&mut self, user: UserId) -> &mut Session {
        self.sessions.entry(user).or_default()
    }

    /// Get a user's session if one exists.
    pub fn get(&self, user: UserId) -> Option<&Session> {
        self.sessions.get(&user)
    }

    /// Get the number of known users.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check whether no user has been seen.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_per_user() {
        let mut sessions = Sessions::new();
        sessions.get_mut(UserId(1)).exam_mode = true;

        assert!(sessions.get(UserId(1)).unwrap().exam_mode);
        assert!(!sessions.get_mut(UserId(2)).exam_mode);
        assert_eq!(sessions.len(), 2);
        assert!(sessions.get(UserId(3)).is_none());
    }
}
