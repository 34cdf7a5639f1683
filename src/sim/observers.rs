//! Synchronous observer channels.
//!
//! Listeners are called in subscription order at the point of mutation.
//! Dropping the channel drops every listener, so a despawned controller
//! leaves nothing behind.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Handle returned by `subscribe`. Unique across every channel in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener<E> = Box<dyn FnMut(&E) + Send + Sync>;

pub struct EventChannel<E> {
    listeners: Vec<(Subscription, Listener<E>)>,
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self { listeners: Vec::new() }
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> EventChannel<E> {
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + Send + Sync + 'static) -> Subscription {
        let id = Subscription(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `true` if the subscription belonged to this channel.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    pub fn notify(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn notifies_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut channel = EventChannel::<u32>::default();

        let a = Arc::clone(&log);
        channel.subscribe(move |v| a.lock().unwrap().push(("a", *v)));
        let b = Arc::clone(&log);
        channel.subscribe(move |v| b.lock().unwrap().push(("b", *v)));

        channel.notify(&7);

        assert_eq!(*log.lock().unwrap(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_is_deterministic() {
        let hits = Arc::new(Mutex::new(0));
        let mut channel = EventChannel::<()>::default();

        let h = Arc::clone(&hits);
        let sub = channel.subscribe(move |_| *h.lock().unwrap() += 1);

        channel.notify(&());
        assert!(channel.unsubscribe(sub));
        assert!(!channel.unsubscribe(sub));
        channel.notify(&());

        assert_eq!(*hits.lock().unwrap(), 1);
        assert!(channel.is_empty());
    }

    #[test]
    fn subscriptions_are_unique_across_channels() {
        let mut a = EventChannel::<()>::default();
        let mut b = EventChannel::<u8>::default();
        let sa = a.subscribe(|_| {});
        let sb = b.subscribe(|_| {});
        assert_ne!(sa, sb);
        assert!(!a.unsubscribe(sb));
        assert_eq!(a.len(), 1);
    }
}
