//! Actions — in-process broadcast messages coordinating cross-store behaviour.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An authentication token issued by the server.
///
/// The token is opaque to the client. `Debug` redacts it so it never ends
/// up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// An immutable action broadcast on the action bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum Action {
    /// A new credential is active. Identity-scoped stores reload.
    TokenSaved { token: AuthToken },
    /// The active identity is being swapped for another user's.
    LoginAsActivated { token: AuthToken },
    /// Impersonation ends; the main account's token comes back.
    BackToMainAccount,
    /// The session is closed.
    LoggedOut,
}

impl Action {
    /// Short, stable name for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TokenSaved { .. } => "token-saved",
            Self::LoginAsActivated { .. } => "login-as-activated",
            Self::BackToMainAccount => "back-to-main-account",
            Self::LoggedOut => "logged-out",
        }
    }
}
