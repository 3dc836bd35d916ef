//! # barrelhub-domain
//!
//! Pure domain model for the barrelhub administration client.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the server-owned **records** (teams, users, alert buttons, barrels)
//!   and the [`Record`](record::Record) contract stores are generic over
//! - Define **actions** broadcast on the in-process action bus
//! - Define **envelopes**, the incremental changes pushed on the event feed
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod record;
pub mod time;

pub mod action;
pub mod alert_button;
pub mod barrel;
pub mod envelope;
pub mod team;
pub mod user;
