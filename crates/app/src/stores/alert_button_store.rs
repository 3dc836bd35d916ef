//! Alert button store.

use barrelhub_domain::alert_button::AlertButton;
use barrelhub_domain::id::TeamId;

use crate::ports::Transport;
use crate::store::Store;

pub type AlertButtonStore<T> = Store<AlertButton, T>;

impl<T: Transport + 'static> Store<AlertButton, T> {
    /// Buttons assigned to `team`.
    #[must_use]
    pub fn buttons_for_team(&self, team: &TeamId) -> Vec<AlertButton> {
        self.filter(|button| button.team.as_ref() == Some(team))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ErrorReporter;
    use crate::services::AlertButtonService;
    use crate::store::ResponseOrdering;
    use crate::testing::{RecordingReporter, ScriptedTransport};
    use barrelhub_domain::envelope::RawEnvelope;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn should_track_buttons_per_team() {
        let reporter: Arc<dyn ErrorReporter> = RecordingReporter::new();
        let buttons: AlertButtonStore<_> = Store::new(
            AlertButtonService::new(ScriptedTransport::new()),
            reporter,
            ResponseOrdering::default(),
        );

        buttons.apply_event(RawEnvelope::created(
            "b1",
            json!({"id": "b1", "label": "Fire", "team": "t1"}),
        ));
        buttons.apply_event(RawEnvelope::created(
            "b2",
            json!({"id": "b2", "label": "Medic", "team": "t2"}),
        ));

        let red = buttons.buttons_for_team(&TeamId::new("t1"));
        assert_eq!(red, vec![AlertButton::new("b1", "Fire").with_team("t1")]);
    }
}
