//! Record — the contract every server-owned entity type fulfils.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A server-owned entity with a stable identifier.
///
/// `TOPIC` names the event feed channel the server pushes changes on and
/// `RESOURCE` the REST path the collection lives under.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identifier type.
    type Id: Clone
        + fmt::Debug
        + fmt::Display
        + Eq
        + Hash
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Feed topic name (e.g. `"team"`).
    const TOPIC: &'static str;

    /// Collection path (e.g. `"/team"`).
    const RESOURCE: &'static str;

    /// Borrow the identifier.
    fn id(&self) -> &Self::Id;
}
