//! Auth store — who the client is currently acting as.
//!
//! The store only follows actions; it never talks to the server. Tokens
//! come in through [`AuthActions`](crate::actions::AuthActions).

use std::sync::{Arc, Mutex};

use barrelhub_domain::action::{Action, AuthToken};
use barrelhub_domain::time::{TimeDelta, Timestamp, elapsed_since, now};

use crate::action_bus::ActionBus;
use crate::observer::{Observers, Subscription};
use crate::sync::lock;

/// Authentication state as seen by views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    /// Token of the identity currently in use.
    pub token: Option<AuthToken>,
    /// Token of the real account while impersonating someone else.
    pub main_token: Option<AuthToken>,
    pub login_as: bool,
    pub authenticated_at: Option<Timestamp>,
}

impl AuthSession {
    /// How long the current token has been in use.
    #[must_use]
    pub fn age(&self) -> Option<TimeDelta> {
        self.authenticated_at.map(elapsed_since)
    }
}

#[derive(Default)]
pub struct AuthStore {
    session: Mutex<AuthSession>,
    observers: Observers<AuthSession>,
    binding: Mutex<Option<Subscription>>,
}

impl AuthStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow actions published on `bus` for as long as the store lives.
    pub fn bind(self: &Arc<Self>, bus: &ActionBus) {
        let weak = Arc::downgrade(self);
        let subscription = bus.subscribe(move |action| {
            if let Some(store) = weak.upgrade() {
                store.handle(action);
            }
        });
        *lock(&self.binding) = Some(subscription);
    }

    /// Update the session for one action.
    pub fn handle(&self, action: &Action) {
        let session = {
            let mut session = lock(&self.session);
            match action {
                Action::TokenSaved { token } => {
                    session.token = Some(token.clone());
                    session.authenticated_at = Some(now());
                }
                Action::LoginAsActivated { .. } => {
                    // Nested impersonation still returns to the real account.
                    if !session.login_as {
                        session.main_token = session.token.take();
                    }
                    session.login_as = true;
                }
                Action::BackToMainAccount => {
                    session.login_as = false;
                    session.main_token = None;
                }
                Action::LoggedOut => *session = AuthSession::default(),
            }
            session.clone()
        };
        tracing::debug!(
            action = action.kind(),
            login_as = session.login_as,
            "auth session updated"
        );
        self.observers.notify(&session);
    }

    #[must_use]
    pub fn session(&self) -> AuthSession {
        lock(&self.session).clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        lock(&self.session).token.clone()
    }

    #[must_use]
    pub fn main_token(&self) -> Option<AuthToken> {
        lock(&self.session).main_token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        lock(&self.session).token.is_some()
    }

    #[must_use]
    pub fn is_impersonating(&self) -> bool {
        lock(&self.session).login_as
    }

    pub fn on_change(
        &self,
        handler: impl Fn(&AuthSession) + Send + Sync + 'static,
    ) -> Subscription {
        self.observers.subscribe(handler)
    }
}
