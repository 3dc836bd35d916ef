//! Client — owns and wires one instance of every store-layer component.
//!
//! There are no process globals: each [`Client`] has its own action bus,
//! event feed, services and stores, so several clients (or tests) never
//! share state. Views take the stores they need from here.

use std::sync::Arc;

use barrelhub_domain::error::BarrelHubError;

use crate::action_bus::ActionBus;
use crate::actions::AuthActions;
use crate::event_feed::EventFeed;
use crate::ports::{ErrorReporter, Transport, TracingReporter};
use crate::services::{
    AlertButtonService, AuthService, BarrelService, EntityService, TeamService, UserService,
};
use crate::store::{ResponseOrdering, Store};
use crate::stores::{AlertButtonStore, AuthStore, BarrelStore, TeamStore, UserStore};

/// Construction options for a [`Client`].
#[derive(Clone)]
pub struct ClientOptions {
    pub ordering: ResponseOrdering,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            ordering: ResponseOrdering::default(),
            reporter: Arc::new(TracingReporter),
        }
    }
}

/// Composition root of the store layer.
pub struct Client<T> {
    bus: Arc<ActionBus>,
    feed: Arc<EventFeed>,
    auth: Arc<AuthStore>,
    auth_service: AuthService<T, Arc<ActionBus>>,
    team_service: TeamService<T>,
    user_service: UserService<T>,
    alert_button_service: AlertButtonService<T>,
    barrel_service: BarrelService<T>,
    teams: Arc<TeamStore<T>>,
    users: Arc<UserStore<T>>,
    alert_buttons: Arc<AlertButtonStore<T>>,
    barrels: Arc<BarrelStore<T>>,
}

impl<T: Transport + Clone + 'static> Client<T> {
    /// Build and wire every component around `transport`.
    ///
    /// The auth store subscribes to the bus before the entity stores, so it
    /// already holds the new token when they start reloading.
    ///
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Feed`] if two stores claim the same topic.
    pub fn new(transport: T, options: ClientOptions) -> Result<Self, BarrelHubError> {
        let bus = Arc::new(ActionBus::new());
        let feed = Arc::new(EventFeed::new());

        let auth = Arc::new(AuthStore::new());
        auth.bind(&bus);
        let actions = AuthActions::new(Arc::clone(&bus), Arc::clone(&auth));

        let teams = Self::store(&transport, &options, &bus, &feed)?;
        let users = Self::store(&transport, &options, &bus, &feed)?;
        let alert_buttons = Self::store(&transport, &options, &bus, &feed)?;
        let barrels = Self::store(&transport, &options, &bus, &feed)?;

        tracing::debug!(topics = ?feed.topics(), "client wired");

        Ok(Self {
            auth_service: AuthService::new(transport.clone(), actions),
            team_service: EntityService::new(transport.clone()),
            user_service: EntityService::new(transport.clone()),
            alert_button_service: EntityService::new(transport.clone()),
            barrel_service: EntityService::new(transport),
            bus,
            feed,
            auth,
            teams,
            users,
            alert_buttons,
            barrels,
        })
    }

    fn store<R: barrelhub_domain::record::Record>(
        transport: &T,
        options: &ClientOptions,
        bus: &ActionBus,
        feed: &EventFeed,
    ) -> Result<Arc<Store<R, T>>, BarrelHubError> {
        let store = Arc::new(Store::new(
            EntityService::new(transport.clone()),
            Arc::clone(&options.reporter),
            options.ordering,
        ));
        store.bind(bus, feed)?;
        Ok(store)
    }

    /// Reload every entity store in the background, e.g. after the feed
    /// lost envelopes. Does nothing while unauthenticated.
    pub fn resynchronize(&self) {
        if !self.auth.is_authenticated() {
            tracing::debug!("not authenticated, skipping resynchronization");
            return;
        }
        tracing::info!("resynchronizing all stores");
        self.teams.resynchronize();
        self.users.resynchronize();
        self.alert_buttons.resynchronize();
        self.barrels.resynchronize();
    }

    /// Resolve once every entity store is `Ready`.
    pub async fn wait_until_ready(&self) {
        self.teams.wait_until_ready().await;
        self.users.wait_until_ready().await;
        self.alert_buttons.wait_until_ready().await;
        self.barrels.wait_until_ready().await;
    }

    #[must_use]
    pub fn bus(&self) -> &Arc<ActionBus> {
        &self.bus
    }

    /// The feed to pump incoming [`FeedMessage`](barrelhub_domain::envelope::FeedMessage)s into.
    #[must_use]
    pub fn feed(&self) -> &Arc<EventFeed> {
        &self.feed
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    #[must_use]
    pub fn auth_service(&self) -> &AuthService<T, Arc<ActionBus>> {
        &self.auth_service
    }

    #[must_use]
    pub fn team_service(&self) -> &TeamService<T> {
        &self.team_service
    }

    #[must_use]
    pub fn user_service(&self) -> &UserService<T> {
        &self.user_service
    }

    #[must_use]
    pub fn alert_button_service(&self) -> &AlertButtonService<T> {
        &self.alert_button_service
    }

    #[must_use]
    pub fn barrel_service(&self) -> &BarrelService<T> {
        &self.barrel_service
    }

    #[must_use]
    pub fn teams(&self) -> &Arc<TeamStore<T>> {
        &self.teams
    }

    #[must_use]
    pub fn users(&self) -> &Arc<UserStore<T>> {
        &self.users
    }

    #[must_use]
    pub fn alert_buttons(&self) -> &Arc<AlertButtonStore<T>> {
        &self.alert_buttons
    }

    #[must_use]
    pub fn barrels(&self) -> &Arc<BarrelStore<T>> {
        &self.barrels
    }
}
