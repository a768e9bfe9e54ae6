//! Scoped change-notification subscriptions.
//!
//! Rebuild triggers (keymap changes, format-registry changes) are
//! registered through [`Subscription`] guards so a handler can never
//! outlive the component that registered it.

use crate::services::{ChangeListener, ChangeNotifier, ListenerId};
use std::sync::Arc;

/// A registered change listener, unregistered on drop.
pub struct Subscription {
    source: Arc<dyn ChangeNotifier>,
    id: ListenerId,
}

impl Subscription {
    /// Register `listener` on `source` for the lifetime of the guard.
    pub fn subscribe(source: Arc<dyn ChangeNotifier>, listener: ChangeListener) -> Self {
        let id = source.subscribe(listener);
        Self { source, id }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StubNotifier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn drop_unsubscribes() {
        let source = Arc::new(StubNotifier::new());
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let subscription = Subscription::subscribe(
            source.clone(),
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        source.fire();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        drop(subscription);
        source.fire();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(source.listener_count(), 0);
    }
}
