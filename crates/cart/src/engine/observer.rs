//! Change subscriptions.

use rocketshoes_core::Cart;

/// Handle returned by [`CartEngine::subscribe`](super::CartEngine::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&Cart) + Send + Sync>;

/// Registered change callbacks, invoked in subscription order.
#[derive(Default)]
pub(super) struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub(super) fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    pub(super) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub(super) fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub(super) fn publish(&self, cart: &Cart) {
        for (_, callback) in &self.callbacks {
            callback(cart);
        }
    }
}
