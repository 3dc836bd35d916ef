//! # barrelhub-adapter-virtual
//!
//! In-memory stand-in for the barrelhub server, used by the demo daemon and
//! by end-to-end tests.
//!
//! ## Routes
//!
//! | Method | Path | Behaviour |
//! |--------|------|-----------|
//! | `GET` | `/{resource}` | Full collection |
//! | `POST` | `/{resource}` | Create with a fresh uuid, broadcast `created` |
//! | `PUT` | `/{resource}/{id}` | Merge attributes, broadcast `updated` |
//! | `DELETE` | `/{resource}/{id}` | Remove, broadcast `destroyed` |
//! | `POST` | `/login/ip` | Token for the seeded administrator |
//! | `GET` | `/login/oauth` | Redirect link |
//! | `POST` | `/login/oauth/submit` | Token for a non-empty authorization code |
//! | `POST` | `/login/jwt` | Fresh token for a known one |
//! | `POST` | `/login/as/{id}` | Token for an existing user |
//!
//! Every mutation is pushed as a [`FeedMessage`] to all
//! [`subscribe_feed`](VirtualServer::subscribe_feed) receivers;
//! [`feed::pump`] forwards them into a client.
//!
//! ## Dependency rule
//!
//! Depends on `barrelhub-app` (port traits) and `barrelhub-domain` only.

mod collection;
pub mod feed;
pub mod seed;
mod sessions;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use barrelhub_app::ports::{Method, Request, Transport};
use barrelhub_domain::alert_button::AlertButton;
use barrelhub_domain::barrel::Barrel;
use barrelhub_domain::envelope::{FeedMessage, RawEnvelope};
use barrelhub_domain::error::TransportError;
use barrelhub_domain::id::UserId;
use barrelhub_domain::record::Record;
use barrelhub_domain::team::Team;
use barrelhub_domain::user::User;
use serde_json::{Map, Value, json};
use tokio::sync::broadcast;

use collection::Collection;
use seed::Seed;
use sessions::Sessions;

const OAUTH_REDIRECT: &str = "https://auth.barrelhub.invalid/oauth/authorize?client_id=barrelhub";

/// Simulated server. Cheap to share behind an `Arc`.
pub struct VirtualServer {
    state: Mutex<ServerState>,
    feed: broadcast::Sender<FeedMessage>,
}

struct ServerState {
    collections: Vec<Collection>,
    sessions: Sessions,
    ip_user: Option<UserId>,
    failures: HashMap<String, usize>,
}

impl VirtualServer {
    /// Build a server holding `seed`, buffering up to `feed_capacity`
    /// messages per feed receiver.
    ///
    /// IP login authenticates the first seeded administrator.
    #[must_use]
    pub fn new(seed: Seed, feed_capacity: usize) -> Self {
        let ip_user = seed
            .users
            .iter()
            .find(|user| user.admin)
            .map(|user| user.id.clone());
        let collections = vec![
            Collection::from_records::<Team>(&seed.teams),
            Collection::from_records::<User>(&seed.users),
            Collection::from_records::<AlertButton>(&seed.alert_buttons),
            Collection::from_records::<Barrel>(&seed.barrels),
        ];
        let (feed, _) = broadcast::channel(feed_capacity.max(1));
        tracing::info!(
            teams = seed.teams.len(),
            users = seed.users.len(),
            alert_buttons = seed.alert_buttons.len(),
            barrels = seed.barrels.len(),
            "virtual server seeded"
        );
        Self {
            state: Mutex::new(ServerState {
                collections,
                sessions: Sessions::default(),
                ip_user,
                failures: HashMap::new(),
            }),
            feed,
        }
    }

    /// New receiver for every envelope published from now on.
    #[must_use]
    pub fn subscribe_feed(&self) -> broadcast::Receiver<FeedMessage> {
        self.feed.subscribe()
    }

    /// Make the next `count` requests to `path` fail with a 503.
    pub fn fail_next(&self, path: impl Into<String>, count: usize) {
        *self.lock().failures.entry(path.into()).or_default() += count;
    }

    /// The user a previously issued token authenticates.
    #[must_use]
    pub fn token_owner(&self, token: &str) -> Option<UserId> {
        self.lock().sessions.user_of(token).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, request: &Request) -> Result<Value, TransportError> {
        let mut state = self.lock();
        if let Some(remaining) = state.failures.get_mut(&request.path)
            && *remaining > 0
        {
            *remaining -= 1;
            tracing::debug!(path = %request.path, "injected failure");
            return Err(TransportError::status(
                &request.path,
                503,
                "service unavailable",
            ));
        }

        if let Some(rest) = request.path.strip_prefix("/login/") {
            return state.login(request, rest);
        }

        let (message, body) = state.collection_call(request)?;
        drop(state);

        if let Some(message) = message {
            tracing::debug!(
                topic = %message.topic,
                verb = %message.envelope.verb,
                id = %message.envelope.id,
                "publishing envelope"
            );
            // Err only means no receiver is subscribed.
            let _ = self.feed.send(message);
        }
        Ok(body)
    }
}

impl ServerState {
    fn login(&mut self, request: &Request, route: &str) -> Result<Value, TransportError> {
        let path = request.path.as_str();
        match (request.method, route) {
            (Method::Post, "ip") => {
                let user = self
                    .ip_user
                    .clone()
                    .ok_or_else(|| TransportError::status(path, 401, "address not recognised"))?;
                Ok(self.token_body(&user))
            }
            (Method::Get, "oauth") => Ok(json!({ "url": OAUTH_REDIRECT })),
            (Method::Post, "oauth/submit") => {
                let code = body_str(request, "authorizationCode");
                let user = match (code, self.ip_user.clone()) {
                    (Some(code), Some(user)) if !code.is_empty() => user,
                    _ => return Err(TransportError::status(path, 401, "invalid authorization code")),
                };
                Ok(self.token_body(&user))
            }
            (Method::Post, "jwt") => {
                let token = body_str(request, "jwt").unwrap_or_default();
                let fresh = self
                    .sessions
                    .refresh(token)
                    .ok_or_else(|| TransportError::status(path, 401, "unknown token"))?;
                Ok(json!({ "jwt": fresh }))
            }
            (Method::Post, route) => {
                let user = route
                    .strip_prefix("as/")
                    .filter(|id| !id.is_empty())
                    .map(UserId::new)
                    .ok_or_else(|| not_found(path))?;
                let known = self
                    .collection(User::RESOURCE)
                    .is_some_and(|users| users.contains(user.as_str()));
                if !known {
                    return Err(TransportError::status(path, 404, "no such user"));
                }
                Ok(self.token_body(&user))
            }
            _ => Err(not_found(path)),
        }
    }

    fn token_body(&mut self, user: &UserId) -> Value {
        let token = self.sessions.issue(user);
        tracing::debug!(user = %user, "token issued");
        json!({ "jwt": token })
    }

    fn collection_call(
        &mut self,
        request: &Request,
    ) -> Result<(Option<FeedMessage>, Value), TransportError> {
        let path = request.path.as_str();
        let (collection, id) = self
            .collections
            .iter_mut()
            .find_map(|collection| {
                let rest = path.strip_prefix(collection.resource())?;
                match rest.strip_prefix('/') {
                    Some(id) if !id.is_empty() => Some((collection, Some(id))),
                    None if rest.is_empty() => Some((collection, None)),
                    _ => None,
                }
            })
            .ok_or_else(|| not_found(path))?;
        let topic = collection.topic();
        let publish = |envelope: RawEnvelope| Some(FeedMessage::new(topic, envelope));

        match (request.method, id) {
            (Method::Get, None) => Ok((None, collection.list())),
            (Method::Post, None) => {
                let fields = body_object(request)?;
                let id = uuid::Uuid::new_v4().to_string();
                let (record, envelope) = collection.create(&id, fields);
                Ok((publish(envelope), record))
            }
            (Method::Put, Some(id)) => {
                let patch = body_object(request)?;
                let (record, envelope) = collection
                    .update(id, &patch)
                    .ok_or_else(|| not_found(path))?;
                Ok((publish(envelope), record))
            }
            (Method::Delete, Some(id)) => {
                let envelope = collection.delete(id).ok_or_else(|| not_found(path))?;
                Ok((publish(envelope), Value::Null))
            }
            _ => Err(TransportError::status(path, 405, "method not allowed")),
        }
    }

    fn collection(&self, resource: &str) -> Option<&Collection> {
        self.collections
            .iter()
            .find(|collection| collection.resource() == resource)
    }
}

impl Transport for VirtualServer {
    fn request(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        tracing::trace!(method = %request.method, path = %request.path, "virtual request");
        let result = self.handle(&request);
        async move { result }
    }
}

fn body_str<'a>(request: &'a Request, key: &str) -> Option<&'a str> {
    request.body.as_ref()?.get(key)?.as_str()
}

fn body_object(request: &Request) -> Result<Map<String, Value>, TransportError> {
    match &request.body {
        Some(Value::Object(fields)) => Ok(fields.clone()),
        _ => Err(TransportError::status(
            &request.path,
            400,
            "expected a JSON object body",
        )),
    }
}

fn not_found(path: &str) -> TransportError {
    TransportError::status(path, 404, "not found")
}
