//! Team — a group that barrels and alert buttons are assigned to.

use serde::{Deserialize, Serialize};

use crate::id::TeamId;
use crate::record::Record;

/// A team taking part in the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    #[must_use]
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Record for Team {
    type Id = TeamId;
    const TOPIC: &'static str = "team";
    const RESOURCE: &'static str = "/team";

    fn id(&self) -> &TeamId {
        &self.id
    }
}
