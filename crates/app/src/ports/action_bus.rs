//! Action bus port — publishing side of the in-process action channel.

use barrelhub_domain::action::Action;

/// Publishes actions to every interested subscriber.
pub trait ActionPublisher: Send + Sync {
    /// Deliver `action` to all current subscribers before returning.
    fn publish(&self, action: Action);
}

impl<T: ActionPublisher + ?Sized> ActionPublisher for std::sync::Arc<T> {
    fn publish(&self, action: Action) {
        (**self).publish(action);
    }
}
