//! Barrel — a physical keg tracked through its lifecycle and team assignment.

use serde::{Deserialize, Serialize};

use crate::id::{BarrelId, BarrelTypeId, TeamId};
use crate::record::Record;

/// Lifecycle stage of a barrel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarrelState {
    #[default]
    New,
    Opened,
    Empty,
}

impl BarrelState {
    /// All states in lifecycle order.
    pub const ALL: [Self; 3] = [Self::New, Self::Opened, Self::Empty];

    /// The stage that follows this one. `Empty` is terminal.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::New => Self::Opened,
            Self::Opened | Self::Empty => Self::Empty,
        }
    }
}

impl std::fmt::Display for BarrelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => f.write_str("new"),
            Self::Opened => f.write_str("opened"),
            Self::Empty => f.write_str("empty"),
        }
    }
}

/// A single barrel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barrel {
    pub id: BarrelId,
    /// Display number, unique per barrel type.
    pub num: u32,
    #[serde(default)]
    pub state: BarrelState,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BarrelTypeId>,
    /// Team the barrel is currently assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<TeamId>,
}

impl Barrel {
    /// Create an unassigned barrel in the `new` state.
    #[must_use]
    pub fn new(id: impl Into<BarrelId>, num: u32) -> Self {
        Self {
            id: id.into(),
            num,
            state: BarrelState::New,
            kind: None,
            place: None,
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: BarrelState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn with_place(mut self, team: impl Into<TeamId>) -> Self {
        self.place = Some(team.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<BarrelTypeId>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

impl Record for Barrel {
    type Id = BarrelId;
    const TOPIC: &'static str = "barrel";
    const RESOURCE: &'static str = "/barrel";

    fn id(&self) -> &BarrelId {
        &self.id
    }
}
