//! Alert button — a physical button a team presses to call for help.

use serde::{Deserialize, Serialize};

use crate::id::{AlertButtonId, TeamId};
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertButton {
    pub id: AlertButtonId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl AlertButton {
    #[must_use]
    pub fn new(id: impl Into<AlertButtonId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            team: None,
            location: None,
        }
    }

    #[must_use]
    pub fn with_team(mut self, team: impl Into<TeamId>) -> Self {
        self.team = Some(team.into());
        self
    }
}

impl Record for AlertButton {
    type Id = AlertButtonId;
    const TOPIC: &'static str = "alertbutton";
    const RESOURCE: &'static str = "/alertbutton";

    fn id(&self) -> &AlertButtonId {
        &self.id
    }
}
