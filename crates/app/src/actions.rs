//! Action creators — the only place authentication actions are published.

use std::sync::Arc;

use barrelhub_domain::action::{Action, AuthToken};

use crate::ports::ActionPublisher;
use crate::stores::AuthStore;

/// Publishes authentication actions in the order stores expect them.
pub struct AuthActions<P> {
    publisher: P,
    session: Arc<AuthStore>,
}

impl<P: Clone> Clone for AuthActions<P> {
    fn clone(&self) -> Self {
        Self {
            publisher: self.publisher.clone(),
            session: Arc::clone(&self.session),
        }
    }
}

impl<P: ActionPublisher> AuthActions<P> {
    pub fn new(publisher: P, session: Arc<AuthStore>) -> Self {
        Self { publisher, session }
    }

    /// Make `token` the active credential. Identity-scoped stores reload.
    pub fn save_token(&self, token: AuthToken) {
        self.publisher.publish(Action::TokenSaved { token });
    }

    /// Switch to another user's identity.
    pub fn login_as(&self, token: AuthToken) {
        self.publisher.publish(Action::LoginAsActivated {
            token: token.clone(),
        });
        self.save_token(token);
    }

    /// Leave impersonation and restore the real account.
    ///
    /// Returns `false` (and publishes nothing) when not impersonating.
    pub fn back_to_main_account(&self) -> bool {
        let Some(main) = self.session.main_token() else {
            tracing::warn!("back to main account requested while not impersonating");
            return false;
        };
        self.publisher.publish(Action::BackToMainAccount);
        self.save_token(main);
        true
    }

    pub fn logout(&self) {
        self.publisher.publish(Action::LoggedOut);
    }
}
