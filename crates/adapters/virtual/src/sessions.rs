//! Token bookkeeping for the virtual server's login endpoints.

use std::collections::HashMap;

use barrelhub_domain::id::UserId;

/// Issued tokens and the user each one authenticates.
#[derive(Default)]
pub struct Sessions {
    issued: HashMap<String, UserId>,
    counter: u64,
}

impl Sessions {
    /// Issue a fresh token for `user`.
    pub fn issue(&mut self, user: &UserId) -> String {
        self.counter += 1;
        let token = format!("jwt.{user}.{}", self.counter);
        self.issued.insert(token.clone(), user.clone());
        token
    }

    /// Trade a known token for a fresh one. The old token stays valid.
    pub fn refresh(&mut self, token: &str) -> Option<String> {
        let user = self.issued.get(token)?.clone();
        Some(self.issue(&user))
    }

    pub fn user_of(&self, token: &str) -> Option<&UserId> {
        self.issued.get(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_issue_distinct_tokens() {
        let mut sessions = Sessions::default();
        let user = UserId::new("u1");
        let a = sessions.issue(&user);
        let b = sessions.issue(&user);
        assert_ne!(a, b);
        assert_eq!(sessions.user_of(&a), Some(&user));
    }

    #[test]
    fn should_refuse_unknown_token() {
        let mut sessions = Sessions::default();
        assert!(sessions.refresh("forged").is_none());
    }
}
