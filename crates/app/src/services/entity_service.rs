//! Entity service — collection calls for one record type.
//!
//! Writes are fire-and-forget: the server's answer body is not applied to
//! any store. The resulting change comes back through the event feed.

use std::marker::PhantomData;

use barrelhub_domain::alert_button::AlertButton;
use barrelhub_domain::barrel::{Barrel, BarrelState};
use barrelhub_domain::error::{BarrelHubError, DecodeError};
use barrelhub_domain::id::{TeamId, UserId};
use barrelhub_domain::record::Record;
use barrelhub_domain::team::Team;
use barrelhub_domain::user::User;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::ports::{Request, Transport};

pub type TeamService<T> = EntityService<Team, T>;
pub type UserService<T> = EntityService<User, T>;
pub type AlertButtonService<T> = EntityService<AlertButton, T>;
pub type BarrelService<T> = EntityService<Barrel, T>;

/// Request/response façade for the `R` collection.
pub struct EntityService<R, T> {
    transport: T,
    _record: PhantomData<fn() -> R>,
}

impl<R, T: Clone> Clone for EntityService<R, T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record, T: Transport> EntityService<R, T> {
    /// Create a new service backed by the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            _record: PhantomData,
        }
    }

    /// Fetch the whole collection (`GET /{resource}`).
    ///
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Transport`] when the call fails, or
    /// [`BarrelHubError::Decode`] when the body is not a list of `R`.
    pub async fn list(&self) -> Result<Vec<R>, BarrelHubError> {
        let body = self.transport.request(Request::get(R::RESOURCE)).await?;
        decode(R::RESOURCE, body)
    }

    /// Ask the server to create a record (`POST /{resource}`).
    ///
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Transport`] when the call fails.
    pub async fn create(&self, attributes: Value) -> Result<(), BarrelHubError> {
        self.transport
            .request(Request::post(R::RESOURCE, Some(attributes)))
            .await?;
        tracing::debug!(resource = R::RESOURCE, "create accepted");
        Ok(())
    }

    /// Ask the server to change some attributes (`PUT /{resource}/{id}`).
    ///
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Transport`] when the call fails.
    pub async fn update(&self, id: &R::Id, patch: Value) -> Result<(), BarrelHubError> {
        self.transport
            .request(Request::put(item_path::<R>(id), patch))
            .await?;
        tracing::debug!(resource = R::RESOURCE, %id, "update accepted");
        Ok(())
    }

    /// Ask the server to delete a record (`DELETE /{resource}/{id}`).
    ///
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Transport`] when the call fails.
    pub async fn delete(&self, id: &R::Id) -> Result<(), BarrelHubError> {
        self.transport
            .request(Request::delete(item_path::<R>(id)))
            .await?;
        tracing::debug!(resource = R::RESOURCE, %id, "delete accepted");
        Ok(())
    }
}

impl<T: Transport> EntityService<Team, T> {
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Transport`] when the call fails.
    pub async fn rename(&self, id: &TeamId, name: &str) -> Result<(), BarrelHubError> {
        self.update(id, json!({ "name": name })).await
    }
}

impl<T: Transport> EntityService<User, T> {
    /// Grant or revoke administrative rights.
    ///
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Transport`] when the call fails.
    pub async fn set_admin(&self, id: &UserId, admin: bool) -> Result<(), BarrelHubError> {
        self.update(id, json!({ "admin": admin })).await
    }
}

impl<T: Transport> EntityService<Barrel, T> {
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Transport`] when the call fails.
    pub async fn set_state(
        &self,
        id: &<Barrel as Record>::Id,
        state: BarrelState,
    ) -> Result<(), BarrelHubError> {
        self.update(id, json!({ "state": state })).await
    }

    /// Move `barrel` to the next lifecycle stage. An empty barrel stays empty
    /// and no request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Transport`] when the call fails.
    pub async fn advance_state(&self, barrel: &Barrel) -> Result<(), BarrelHubError> {
        let next = barrel.state.next();
        if next == barrel.state {
            return Ok(());
        }
        self.set_state(&barrel.id, next).await
    }

    /// Assign the barrel to `team`, or take it back to storage with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BarrelHubError::Transport`] when the call fails.
    pub async fn assign(
        &self,
        id: &<Barrel as Record>::Id,
        team: Option<&TeamId>,
    ) -> Result<(), BarrelHubError> {
        self.update(id, json!({ "place": team })).await
    }
}

fn item_path<R: Record>(id: &R::Id) -> String {
    format!("{}/{id}", R::RESOURCE)
}

pub(crate) fn decode<U: DeserializeOwned>(context: &str, body: Value) -> Result<U, BarrelHubError> {
    serde_json::from_value(body).map_err(|source| {
        DecodeError {
            context: context.to_string(),
            source,
        }
        .into()
    })
}
