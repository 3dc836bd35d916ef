//! Per-entity store specialisations and the authentication session store.
//!
//! Entity stores are the generic [`Store`](crate::store::Store) with
//! record-specific read queries layered on top.

pub mod alert_button_store;
pub mod auth_store;
pub mod barrel_store;
pub mod team_store;
pub mod user_store;

pub use alert_button_store::AlertButtonStore;
pub use auth_store::{AuthSession, AuthStore};
pub use barrel_store::BarrelStore;
pub use team_store::TeamStore;
pub use user_store::UserStore;
