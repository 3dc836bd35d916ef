//! Auth service — login calls that end in a new active token.

use barrelhub_domain::action::AuthToken;
use barrelhub_domain::error::BarrelHubError;
use barrelhub_domain::id::UserId;
use serde::Deserialize;
use serde_json::json;

use crate::actions::AuthActions;
use crate::ports::{ActionPublisher, Request, Transport};
use crate::services::entity_service::decode;

#[derive(Deserialize)]
struct TokenBody {
    jwt: AuthToken,
}

#[derive(Deserialize)]
struct RedirectBody {
    url: String,
}

/// Authentication calls. Successful logins are turned into actions so every
/// store follows the identity change.
pub struct AuthService<T, P> {
    transport: T,
    actions: AuthActions<P>,
}

impl<T: Transport, P: ActionPublisher> AuthService<T, P> {
    pub fn new(transport: T, actions: AuthActions<P>) -> Self {
        Self { transport, actions }
    }

    /// Authenticate by source IP address (`POST /login/ip`).
    ///
    /// # Errors
    ///
    /// Returns a transport error when the address is not recognised, or a
    /// decode error when the answer carries no token.
    pub async fn check_ip_address(&self) -> Result<AuthToken, BarrelHubError> {
        let token = self.fetch_token(Request::post("/login/ip", None)).await?;
        self.actions.save_token(token.clone());
        Ok(token)
    }

    /// First OAuth step: the link to redirect the user to (`GET /login/oauth`).
    ///
    /// # Errors
    ///
    /// Returns a transport or decode error.
    pub async fn oauth_redirect_url(&self) -> Result<String, BarrelHubError> {
        let path = "/login/oauth";
        let body = self.transport.request(Request::get(path)).await?;
        let RedirectBody { url } = decode(path, body)?;
        Ok(url)
    }

    /// Second OAuth step: trade the authorization code for a token
    /// (`POST /login/oauth/submit`).
    ///
    /// # Errors
    ///
    /// Returns a transport or decode error.
    pub async fn send_authorization_code(&self, code: &str) -> Result<AuthToken, BarrelHubError> {
        let request = Request::post(
            "/login/oauth/submit",
            Some(json!({ "authorizationCode": code })),
        );
        let token = self.fetch_token(request).await?;
        self.actions.save_token(token.clone());
        Ok(token)
    }

    /// Re-authenticate with a stored token (`POST /login/jwt`). The server
    /// answers with a fresh token that becomes active.
    ///
    /// Returns `Ok(false)` without any request when `token` is empty.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the token is refused.
    pub async fn authenticate_connection(&self, token: &AuthToken) -> Result<bool, BarrelHubError> {
        if token.is_empty() {
            return Ok(false);
        }
        let request = Request::post("/login/jwt", Some(json!({ "jwt": token })));
        let fresh = self.fetch_token(request).await?;
        self.actions.save_token(fresh);
        Ok(true)
    }

    /// Impersonate `user` (`POST /login/as/{id}`).
    ///
    /// # Errors
    ///
    /// Returns a transport error when impersonation is refused.
    pub async fn login_as(&self, user: &UserId) -> Result<(), BarrelHubError> {
        let token = self
            .fetch_token(Request::post(format!("/login/as/{user}"), None))
            .await?;
        tracing::info!(%user, "logged in as another user");
        self.actions.login_as(token);
        Ok(())
    }

    /// Leave impersonation. See [`AuthActions::back_to_main_account`].
    pub fn back_to_main_account(&self) -> bool {
        self.actions.back_to_main_account()
    }

    pub fn logout(&self) {
        self.actions.logout();
    }

    async fn fetch_token(&self, request: Request) -> Result<AuthToken, BarrelHubError> {
        let path = request.path.clone();
        let body = self.transport.request(request).await?;
        let TokenBody { jwt } = decode(&path, body)?;
        Ok(jwt)
    }
}
