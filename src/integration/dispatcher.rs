use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;

use crate::core::{
    intent::Intent,
    notification::{NotificationId, NotificationPatch},
};

/// Identifies one subscriber inside a dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(SubscriberId, mpsc::UnboundedSender<Intent>)>,
}

impl Registry {
    fn remove(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fire-and-forget publish/subscribe channel for notification intents
///
/// Callers hold a cheap clone and never see the queue itself. Publishing is
/// synchronous and fans out to every live subscriber in registration order;
/// with nobody subscribed the intent is dropped.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    registry: Arc<Mutex<Registry>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber; it receives every intent published from now on
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = lock(&self.registry);
        let id = SubscriberId(registry.next_id);
        registry.next_id += 1;
        registry.subscribers.push((id, tx));
        log::debug!("dispatcher: subscriber {id:?} registered");

        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `intent` to all subscribers; returns how many received it
    pub fn publish(&self, intent: Intent) -> usize {
        let mut registry = lock(&self.registry);
        // Receivers dropped without unsubscribing are pruned here.
        registry.subscribers.retain(|(_, tx)| !tx.is_closed());

        if registry.subscribers.is_empty() {
            log::trace!("dispatcher: {} dropped, no subscriber", intent.kind());
            return 0;
        }

        registry
            .subscribers
            .iter()
            .filter(|(_, tx)| tx.send(intent.clone()).is_ok())
            .count()
    }

    pub fn add(&self, patch: NotificationPatch) -> usize {
        self.publish(Intent::Add(patch))
    }

    pub fn update(&self, patch: NotificationPatch) -> usize {
        self.publish(Intent::Update(patch))
    }

    pub fn remove(&self, id: impl Into<NotificationId>) -> usize {
        self.publish(Intent::Remove(id.into()))
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry)
            .subscribers
            .iter()
            .filter(|(_, tx)| !tx.is_closed())
            .count()
    }
}

/// Receiving end of a dispatcher registration
/// Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::UnboundedReceiver<Intent>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next pending intent without waiting
    pub fn try_recv(&mut self) -> Option<Intent> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next intent; `None` once the dispatcher is gone
    pub async fn recv(&mut self) -> Option<Intent> {
        self.rx.recv().await
    }

    /// All pending intents in publish order
    pub fn drain(&mut self) -> Vec<Intent> {
        let mut intents = Vec::new();
        while let Ok(intent) = self.rx.try_recv() {
            intents.push(intent);
        }
        intents
    }

    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if lock(&registry).remove(self.id) {
                log::debug!("dispatcher: subscriber {:?} unregistered", self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_publish_without_subscriber_is_dropped() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.remove("a"), 0);
        assert_eq!(dispatcher.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_preserves_order() {
        let dispatcher = Dispatcher::new();
        let mut subscription = dispatcher.subscribe();

        dispatcher.add(NotificationPatch::for_id("a"));
        dispatcher.update(NotificationPatch::for_id("a").title("t"));
        dispatcher.remove("a");

        let kinds: Vec<_> = subscription.drain().iter().map(Intent::kind).collect();
        assert_eq!(kinds, vec!["add", "update", "remove"]);
        assert!(subscription.try_recv().is_none());
    }

    #[test]
    fn test_fan_out_to_every_subscriber() {
        let dispatcher = Dispatcher::new();
        let mut first = dispatcher.subscribe();
        let mut second = dispatcher.subscribe();

        assert_eq!(dispatcher.remove("x"), 2);
        assert_eq!(first.try_recv(), Some(Intent::remove("x")));
        assert_eq!(second.try_recv(), Some(Intent::remove("x")));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let dispatcher = Dispatcher::new();
        let subscription = dispatcher.subscribe();
        let clone = dispatcher.clone();
        assert_eq!(clone.subscriber_count(), 1);

        subscription.unsubscribe();
        assert_eq!(clone.subscriber_count(), 0);
        assert_eq!(clone.remove("a"), 0);
    }

    #[tokio::test]
    async fn test_recv_waits_for_publish() {
        let dispatcher = Dispatcher::new();
        let mut subscription = dispatcher.subscribe();

        let publisher = dispatcher.clone();
        tokio::spawn(async move {
            publisher.remove(1);
        });

        assert_eq!(subscription.recv().await, Some(Intent::remove(1)));
    }
}
