//! In-process action bus.

use barrelhub_domain::action::Action;

use crate::observer::{Observers, Subscription};
use crate::ports::ActionPublisher;

/// Synchronous publish/subscribe channel for [`Action`]s.
///
/// Publishing succeeds even when there are no subscribers (the action is
/// simply dropped). Actions are neither queued nor replayed: a subscriber
/// only sees actions published *after* it subscribed.
#[derive(Default)]
pub struct ActionBus {
    observers: Observers<Action>,
}

impl ActionBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future action.
    pub fn subscribe(&self, handler: impl Fn(&Action) + Send + Sync + 'static) -> Subscription {
        self.observers.subscribe(handler)
    }

    /// Remove a handler registered with [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&self, subscription: Subscription) {
        subscription.unsubscribe();
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }
}

impl ActionPublisher for ActionBus {
    fn publish(&self, action: Action) {
        tracing::debug!(
            action = action.kind(),
            subscribers = self.observers.len(),
            "publishing action"
        );
        self.observers.notify(&action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrelhub_domain::action::AuthToken;
    use std::sync::{Arc, Mutex};

    fn recorder(bus: &ActionBus) -> (Arc<Mutex<Vec<Action>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sub = {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |action| seen.lock().unwrap().push(action.clone()))
        };
        (seen, sub)
    }

    #[test]
    fn should_deliver_action_to_subscriber() {
        let bus = ActionBus::new();
        let (seen, _sub) = recorder(&bus);

        bus.publish(Action::TokenSaved {
            token: AuthToken::new("jwt"),
        });

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Action::TokenSaved {
                token: AuthToken::new("jwt")
            }]
        );
    }

    #[test]
    fn should_deliver_action_to_multiple_subscribers_in_order() {
        let bus = ActionBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let subs: Vec<Subscription> = (0..3)
            .map(|n| {
                let order = Arc::clone(&order);
                bus.subscribe(move |_| order.lock().unwrap().push(n))
            })
            .collect();

        bus.publish(Action::LoggedOut);

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn should_succeed_when_no_subscribers() {
        let bus = ActionBus::new();
        bus.publish(Action::BackToMainAccount);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn should_not_replay_actions_published_before_subscription() {
        let bus = ActionBus::new();
        bus.publish(Action::LoggedOut);

        let (seen, _sub) = recorder(&bus);
        bus.publish(Action::BackToMainAccount);

        assert_eq!(*seen.lock().unwrap(), vec![Action::BackToMainAccount]);
    }

    #[test]
    fn should_stop_delivering_after_unsubscribe() {
        let bus = ActionBus::new();
        let (seen, sub) = recorder(&bus);

        bus.unsubscribe(sub);
        bus.publish(Action::LoggedOut);

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.subscriber_count(), 0);
    }
}
