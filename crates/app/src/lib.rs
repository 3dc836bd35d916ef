//! # barrelhub-app
//!
//! Client core — the reactive store layer and the **port definitions**
//! (traits) it talks through.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `Transport` — request/response calls to the server
//!   - `ActionPublisher` — broadcast of in-process actions
//!   - `ErrorReporter` — where non-fatal failures end up
//! - Provide **in-process infrastructure**: the action bus, the event feed
//!   demultiplexer and the typed observer registry both are built on
//! - Provide **entity services** (stateless façades over the transport) and
//!   **stores** (in-memory collections kept coherent with the server by an
//!   initial load plus incremental feed envelopes, reloaded on identity change)
//! - Bundle everything into a [`Client`](client::Client) composition root
//!
//! ## Dependency rule
//! Depends on `barrelhub-domain` only (plus `tokio::sync` / `tokio::runtime`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod action_bus;
pub mod actions;
pub mod client;
pub mod event_feed;
pub mod observer;
pub mod ports;
pub mod services;
pub mod store;
pub mod stores;

mod sync;

#[cfg(test)]
mod testing;
