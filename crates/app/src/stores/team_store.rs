//! Team store.

use barrelhub_domain::id::TeamId;
use barrelhub_domain::team::Team;

use crate::ports::Transport;
use crate::store::Store;

pub type TeamStore<T> = Store<Team, T>;

impl<T: Transport + 'static> Store<Team, T> {
    /// Name of the team with `id`, or `None` when it is not in the store.
    #[must_use]
    pub fn team_name(&self, id: &TeamId) -> Option<String> {
        self.find(id).map(|team| team.name)
    }

    /// First team whose name matches `name` exactly.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<Team> {
        self.filter(|team| team.name == name).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ErrorReporter;
    use crate::services::TeamService;
    use crate::store::ResponseOrdering;
    use crate::testing::{RecordingReporter, ScriptedTransport};
    use barrelhub_domain::envelope::{Envelope, RawEnvelope};
    use std::sync::Arc;

    fn store() -> TeamStore<Arc<ScriptedTransport>> {
        let reporter: Arc<dyn ErrorReporter> = RecordingReporter::new();
        Store::new(
            TeamService::new(ScriptedTransport::new()),
            reporter,
            ResponseOrdering::default(),
        )
    }

    #[test]
    fn should_return_team_name_when_present() {
        let teams = store();
        teams.apply(Envelope::Created(Team::new("t1", "Red")));
        assert_eq!(teams.team_name(&TeamId::new("t1")).as_deref(), Some("Red"));
    }

    #[test]
    fn should_return_none_after_team_is_destroyed() {
        let teams = store();
        teams.apply(Envelope::Created(Team::new("t1", "Red")));

        teams.apply_event(RawEnvelope::destroyed("t1"));

        assert!(teams.is_empty());
        assert_eq!(teams.team_name(&TeamId::new("t1")), None);
    }

    #[test]
    fn should_find_team_by_name() {
        let teams = store();
        teams.apply(Envelope::Created(Team::new("t1", "Red")));
        teams.apply(Envelope::Created(Team::new("t2", "Blue")));

        assert_eq!(teams.find_by_name("Blue").map(|t| t.id), Some(TeamId::new("t2")));
        assert!(teams.find_by_name("Green").is_none());
    }
}
