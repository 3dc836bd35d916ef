//! User — an account able to authenticate against the server.

use serde::{Deserialize, Serialize};

use crate::id::{TeamId, UserId};
use crate::record::Record;

/// A user account with its role flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamId>,
    /// Full administrative rights.
    #[serde(default)]
    pub admin: bool,
    /// Allowed to impersonate other accounts.
    #[serde(default)]
    pub can_login_as: bool,
}

impl User {
    /// Create a user with no team and no role flags.
    #[must_use]
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            login: None,
            team: None,
            admin: false,
            can_login_as: false,
        }
    }

    #[must_use]
    pub fn with_team(mut self, team: impl Into<TeamId>) -> Self {
        self.team = Some(team.into());
        self
    }

    #[must_use]
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

impl Record for User {
    type Id = UserId;
    const TOPIC: &'static str = "user";
    const RESOURCE: &'static str = "/user";

    fn id(&self) -> &UserId {
        &self.id
    }
}
