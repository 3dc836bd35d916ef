//! Store — an in-memory replica of one server collection.
//!
//! A store bootstraps its collection through its [`EntityService`], then
//! keeps it coherent by applying feed envelopes, and reloads it wholesale
//! whenever the authenticated identity changes.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --token-saved--> Loading --response--> Ready
//!                                   ^                     |
//!                                   +-----token-saved-----+
//! ```
//!
//! A failed load still ends in `Ready`, with the collection left as it was.
//! From the outside that is indistinguishable from an empty collection; the
//! failure only shows up through the [`ErrorReporter`].
//!
//! ## Response ordering
//!
//! Every load takes a ticket. Loads are not sequenced, so a slow response
//! can arrive after a newer one. [`ResponseOrdering`] decides what happens
//! then.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use barrelhub_domain::action::Action;
use barrelhub_domain::envelope::{Envelope, RawEnvelope, apply_patch};
use barrelhub_domain::error::{BarrelHubError, FeedError, RuntimeError};
use barrelhub_domain::record::Record;
use serde::Deserialize;
use tokio::sync::watch;

use crate::action_bus::ActionBus;
use crate::event_feed::EventFeed;
use crate::observer::{Observers, Subscription};
use crate::ports::{ErrorReporter, Transport};
use crate::services::EntityService;
use crate::sync::lock;

/// Read-only view of a collection at one point in time.
pub type Snapshot<R> = Arc<Vec<R>>;

/// Where a store is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// No load was ever requested.
    #[default]
    Uninitialized,
    /// A load request is in flight.
    Loading,
    /// The collection reflects the last applied load plus envelopes since.
    Ready,
}

/// How a load response that is no longer the newest is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Only the response to the most recent load is applied; older ones are
    /// discarded when they arrive.
    #[default]
    LatestRequest,
    /// Every response is applied as it arrives, so the last one to arrive
    /// wins even if it answers an older request.
    LastResponse,
}

/// A response ordering name is neither `latest-request` nor `last-response`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown response ordering '{0}'")]
pub struct ParseOrderingError(pub String);

impl std::str::FromStr for ResponseOrdering {
    type Err = ParseOrderingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest-request" => Ok(Self::LatestRequest),
            "last-response" => Ok(Self::LastResponse),
            other => Err(ParseOrderingError(other.to_string())),
        }
    }
}

/// Identifies one load. `epoch` only moves on reset, `generation` on every
/// load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoadTicket {
    epoch: u64,
    generation: u64,
}

struct State<R> {
    phase: LoadPhase,
    items: Snapshot<R>,
    epoch: u64,
    generation: u64,
}

/// Reactive cache of every `R` visible to the current identity.
pub struct Store<R: Record, T> {
    service: EntityService<R, T>,
    reporter: Arc<dyn ErrorReporter>,
    ordering: ResponseOrdering,
    state: Mutex<State<R>>,
    observers: Observers<Snapshot<R>>,
    phase: watch::Sender<LoadPhase>,
    bindings: Mutex<Vec<Subscription>>,
}

impl<R: Record, T: Transport + 'static> Store<R, T> {
    /// Create an empty, uninitialized store.
    pub fn new(
        service: EntityService<R, T>,
        reporter: Arc<dyn ErrorReporter>,
        ordering: ResponseOrdering,
    ) -> Self {
        let (phase, _) = watch::channel(LoadPhase::Uninitialized);
        Self {
            service,
            reporter,
            ordering,
            state: Mutex::new(State {
                phase: LoadPhase::Uninitialized,
                items: Arc::new(Vec::new()),
                epoch: 0,
                generation: 0,
            }),
            observers: Observers::new(),
            phase,
            bindings: Mutex::new(Vec::new()),
        }
    }

    /// Wire the store to the action bus (reload on identity change) and to
    /// its feed topic (incremental updates).
    ///
    /// Both links hold the store weakly and last as long as the store.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::DuplicateTopic`] when another handler already
    /// owns `R::TOPIC` on `feed`.
    pub fn bind(self: &Arc<Self>, bus: &ActionBus, feed: &EventFeed) -> Result<(), FeedError> {
        let weak = Arc::downgrade(self);
        feed.register(R::TOPIC, move |envelope| {
            if let Some(store) = weak.upgrade() {
                store.apply_event(envelope);
            }
        })?;

        let weak = Arc::downgrade(self);
        let subscription = bus.subscribe(move |action| {
            let Some(store) = weak.upgrade() else {
                return;
            };
            match action {
                Action::TokenSaved { .. } => store.resynchronize(),
                Action::LoggedOut => store.reset(),
                Action::LoginAsActivated { .. } | Action::BackToMainAccount => {}
            }
        });
        lock(&self.bindings).push(subscription);
        Ok(())
    }

    /// Load the collection from the server.
    ///
    /// On success the collection is replaced wholesale and one change
    /// notification fires. On failure the error is reported and the
    /// collection is left as it was. Calling again while a load is in flight
    /// supersedes it (see [`ResponseOrdering`]).
    pub async fn initialize(&self) {
        let ticket = self.begin_load(false);
        self.complete_load(ticket).await;
    }

    /// Drop the current collection and reload it in the background.
    ///
    /// Used on identity change: data fetched for the previous identity must
    /// not outlive it. Needs a tokio runtime; without one the failure is
    /// reported and the store stays `Loading`.
    pub fn resynchronize(self: &Arc<Self>) {
        let ticket = self.begin_load(true);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = Arc::clone(self);
                handle.spawn(async move { store.complete_load(ticket).await });
            }
            Err(_) => {
                let err: BarrelHubError = RuntimeError {
                    task: "collection reload",
                }
                .into();
                self.reporter.report(R::TOPIC, &err);
            }
        }
    }

    /// Forget everything and go back to `Uninitialized`. In-flight loads
    /// are invalidated whatever the [`ResponseOrdering`].
    pub fn reset(&self) {
        let cleared = {
            let mut state = lock(&self.state);
            state.epoch += 1;
            state.generation += 1;
            state.phase = LoadPhase::Uninitialized;
            Self::take_items(&mut state)
        };
        self.phase.send_replace(LoadPhase::Uninitialized);
        tracing::debug!(topic = R::TOPIC, "store reset");
        if let Some(empty) = cleared {
            self.observers.notify(&empty);
        }
    }

    /// Decode and apply one wire envelope. Malformed envelopes are reported
    /// and ignored.
    pub fn apply_event(&self, raw: RawEnvelope) {
        match Envelope::<R>::decode(raw) {
            Ok(envelope) => self.apply(envelope),
            Err(err) => self.reporter.report(R::TOPIC, &err.into()),
        }
    }

    /// Apply one typed change.
    ///
    /// - `Created` appends the record unless its id is already present.
    /// - `Destroyed` removes the record with that id, if any.
    /// - `Updated` merges the patch into the record in place, if present.
    ///
    /// One change notification fires per actual mutation; no-ops are silent.
    pub fn apply(&self, envelope: Envelope<R>) {
        let verb = envelope.verb();
        let mut state = lock(&self.state);
        let position = state
            .items
            .iter()
            .position(|item| item.id() == envelope.id());

        let changed = match (envelope, position) {
            (Envelope::Created(record), None) => {
                Arc::make_mut(&mut state.items).push(record);
                true
            }
            (Envelope::Destroyed(_), Some(index)) => {
                Arc::make_mut(&mut state.items).remove(index);
                true
            }
            (Envelope::Updated { patch, .. }, Some(index)) => {
                let patched = apply_patch(&state.items[index], &patch);
                match patched {
                    Ok(record) => {
                        Arc::make_mut(&mut state.items)[index] = record;
                        true
                    }
                    Err(err) => {
                        drop(state);
                        self.reporter.report(R::TOPIC, &err.into());
                        return;
                    }
                }
            }
            (Envelope::Created(_), Some(_))
            | (Envelope::Destroyed(_) | Envelope::Updated { .. }, None) => false,
        };

        let snapshot = Arc::clone(&state.items);
        drop(state);
        if changed {
            tracing::debug!(topic = R::TOPIC, %verb, len = snapshot.len(), "envelope applied");
            self.observers.notify(&snapshot);
        } else {
            tracing::trace!(topic = R::TOPIC, %verb, "envelope was a no-op");
        }
    }

    /// Current collection. Cheap to call; the returned view never changes.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<R> {
        Arc::clone(&lock(&self.state).items)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.state).items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        lock(&self.state).phase
    }

    /// Look a record up by id. A miss is `None`, not an error.
    #[must_use]
    pub fn find(&self, id: &R::Id) -> Option<R> {
        lock(&self.state)
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    #[must_use]
    pub fn contains(&self, id: &R::Id) -> bool {
        lock(&self.state).items.iter().any(|item| item.id() == id)
    }

    /// Collect the records matching `predicate`, in collection order.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        lock(&self.state)
            .items
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Register a change handler. It receives the new snapshot after every
    /// mutation.
    pub fn on_change(
        &self,
        handler: impl Fn(&Snapshot<R>) + Send + Sync + 'static,
    ) -> Subscription {
        self.observers.subscribe(handler)
    }

    /// Resolve once the store reaches `Ready`.
    pub async fn wait_until_ready(&self) {
        let mut phase = self.phase.subscribe();
        let _ = phase.wait_for(|phase| *phase == LoadPhase::Ready).await;
    }

    fn begin_load(&self, discard: bool) -> LoadTicket {
        let (ticket, cleared) = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.phase = LoadPhase::Loading;
            let cleared = if discard {
                Self::take_items(&mut state)
            } else {
                None
            };
            let ticket = LoadTicket {
                epoch: state.epoch,
                generation: state.generation,
            };
            (ticket, cleared)
        };
        self.phase.send_replace(LoadPhase::Loading);
        tracing::debug!(
            topic = R::TOPIC,
            generation = ticket.generation,
            "loading collection"
        );
        if let Some(empty) = cleared {
            self.observers.notify(&empty);
        }
        ticket
    }

    async fn complete_load(&self, ticket: LoadTicket) {
        let result = self.service.list().await;

        let (current, applied) = {
            let mut state = lock(&self.state);
            if ticket.epoch != state.epoch {
                tracing::debug!(
                    topic = R::TOPIC,
                    ticket = ticket.generation,
                    "discarding load response issued before reset"
                );
                return;
            }
            let current = ticket.generation == state.generation;
            if !current && self.ordering == ResponseOrdering::LatestRequest {
                tracing::debug!(
                    topic = R::TOPIC,
                    ticket = ticket.generation,
                    generation = state.generation,
                    "discarding stale load response"
                );
                return;
            }
            // A superseded response never ends the newer load.
            if current {
                state.phase = LoadPhase::Ready;
            }
            let applied = match result {
                Ok(items) => {
                    state.items = Arc::new(dedup_by_id(items));
                    Ok(Arc::clone(&state.items))
                }
                Err(err) => Err(err),
            };
            (current, applied)
        };

        if current {
            self.phase.send_replace(LoadPhase::Ready);
        }
        match applied {
            Ok(snapshot) => {
                tracing::info!(topic = R::TOPIC, count = snapshot.len(), "collection loaded");
                self.observers.notify(&snapshot);
            }
            Err(err) => self.reporter.report(R::TOPIC, &err),
        }
    }

    fn take_items(state: &mut State<R>) -> Option<Snapshot<R>> {
        if state.items.is_empty() {
            return None;
        }
        state.items = Arc::new(Vec::new());
        Some(Arc::clone(&state.items))
    }
}

/// Keep the first occurrence of each id.
fn dedup_by_id<R: Record>(items: Vec<R>) -> Vec<R> {
    let total = items.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<R> = items
        .into_iter()
        .filter(|item| seen.insert(item.id().clone()))
        .collect();
    if unique.len() != total {
        tracing::warn!(
            topic = R::TOPIC,
            dropped = total - unique.len(),
            "server returned duplicate ids"
        );
    }
    unique
}
