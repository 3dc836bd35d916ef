//! User store.

use barrelhub_domain::id::{TeamId, UserId};
use barrelhub_domain::user::User;

use crate::ports::Transport;
use crate::store::Store;

pub type UserStore<T> = Store<User, T>;

impl<T: Transport + 'static> Store<User, T> {
    #[must_use]
    pub fn user_name(&self, id: &UserId) -> Option<String> {
        self.find(id).map(|user| user.name)
    }

    /// Users holding administrative rights.
    #[must_use]
    pub fn admins(&self) -> Vec<User> {
        self.filter(|user| user.admin)
    }

    /// Users belonging to `team`.
    #[must_use]
    pub fn members_of(&self, team: &TeamId) -> Vec<User> {
        self.filter(|user| user.team.as_ref() == Some(team))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ErrorReporter;
    use crate::services::UserService;
    use crate::store::ResponseOrdering;
    use crate::testing::{RecordingReporter, ScriptedTransport};
    use barrelhub_domain::envelope::{Envelope, RawEnvelope};
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> UserStore<Arc<ScriptedTransport>> {
        let reporter: Arc<dyn ErrorReporter> = RecordingReporter::new();
        let users = Store::new(
            UserService::new(ScriptedTransport::new()),
            reporter,
            ResponseOrdering::default(),
        );
        users.apply(Envelope::Created(
            User::new("u1", "Alice").with_team("t1").with_admin(true),
        ));
        users.apply(Envelope::Created(User::new("u2", "Bob").with_team("t1")));
        users.apply(Envelope::Created(User::new("u3", "Carol").with_team("t2")));
        users
    }

    #[test]
    fn should_list_admins() {
        let users = store();
        let admins: Vec<String> = users.admins().into_iter().map(|u| u.name).collect();
        assert_eq!(admins, vec!["Alice"]);
    }

    #[test]
    fn should_list_team_members_in_collection_order() {
        let users = store();
        let members: Vec<String> = users
            .members_of(&TeamId::new("t1"))
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(members, vec!["Alice", "Bob"]);
    }

    #[test]
    fn should_reflect_role_change_pushed_by_server() {
        let users = store();

        users.apply_event(RawEnvelope::updated("u2", json!({"admin": true})));

        assert_eq!(users.admins().len(), 2);
        assert_eq!(users.user_name(&UserId::new("u2")).as_deref(), Some("Bob"));
    }
}
