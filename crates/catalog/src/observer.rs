//! Stock observers and their subscriptions.

use std::sync::Arc;

use stockroom_core::NodeId;

use crate::activity::ActivityLog;
use crate::item::Item;
use crate::node::Category;

/// Listener informed after every successful quantity or threshold change of an item.
pub trait StockObserver: Send + Sync {
    fn on_stock_changed(&self, item: &Item);
}

/// Handle returned by registration, used to detach the observer later.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl core::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

struct Subscription {
    id: ObserverId,
    /// An item id, or a category id covering its whole subtree.
    scope: NodeId,
    observer: Arc<dyn StockObserver>,
}

/// Ordered subscription list. Notification walks it in registration order.
///
/// Category scopes are resolved when notifying, so items added to a subscribed
/// category later are covered too.
#[derive(Default)]
pub struct ObserverRegistry {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl core::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scope: NodeId, observer: Arc<dyn StockObserver>) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            scope,
            observer,
        });
        id
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Notify every subscription whose scope covers `item`. Returns how many fired.
    pub fn notify(&self, root: &Category, item: &Item) -> usize {
        let mut fired = 0;
        for sub in &self.subscriptions {
            if covers(root, sub.scope, item.id()) {
                sub.observer.on_stock_changed(item);
                fired += 1;
            }
        }
        fired
    }
}

fn covers(root: &Category, scope: NodeId, item_id: NodeId) -> bool {
    if scope == item_id {
        return true;
    }
    root.find_category(scope)
        .is_some_and(|category| category.contains(item_id))
}

/// Warns when an item sits at or below its reorder threshold.
#[derive(Debug, Clone)]
pub struct LowStockAlert {
    activity: ActivityLog,
}

impl LowStockAlert {
    pub fn new(activity: ActivityLog) -> Self {
        Self { activity }
    }
}

impl StockObserver for LowStockAlert {
    fn on_stock_changed(&self, item: &Item) {
        if item.quantity() <= item.reorder_threshold() {
            tracing::warn!(
                item = item.name(),
                quantity = item.quantity(),
                threshold = item.reorder_threshold(),
                "low stock"
            );
            self.activity
                .push(format!("WARN: {} low stock ({}).", item.name(), item.quantity()));
        }
    }
}

/// Records the current stock state of every changed item.
#[derive(Debug, Clone)]
pub struct StateChangeLog {
    activity: ActivityLog,
}

impl StateChangeLog {
    pub fn new(activity: ActivityLog) -> Self {
        Self { activity }
    }
}

impl StockObserver for StateChangeLog {
    fn on_stock_changed(&self, item: &Item) {
        self.activity
            .push(format!("Update: {} is now {}", item.name(), item.state()));
    }
}
