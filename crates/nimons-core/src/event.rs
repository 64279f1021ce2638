//! Thread-safe domain event bus with a capped history.
//!
//! Delivery is synchronous and in registration order. Each listener runs
//! inside `catch_unwind`; a panicking listener is logged and skipped, and the
//! remaining listeners still receive the event. No bus lock is held while a
//! listener runs, so listeners may publish or subscribe re-entrantly.
//!
//! The history is an [`EventHistory`] ring buffer: once full, the oldest
//! event is dropped. It can be read from any thread while others publish.

use crate::id::{ChefId, ItemId, ListenerId, OrderIndex};
use crate::sync::{lock, read, write};
use crate::utensil::DeviceKind;
use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    // -- Orders --
    OrderCreated {
        index: OrderIndex,
        recipe: String,
        time_limit_ms: u64,
    },
    OrderCompleted {
        index: OrderIndex,
        recipe: String,
        reward: u32,
    },
    OrderFailed {
        index: OrderIndex,
        recipe: String,
        penalty: u32,
    },
    OrderExpired {
        index: OrderIndex,
        recipe: String,
    },
    ScoreChanged {
        old: u32,
        new: u32,
    },

    // -- Kitchen --
    DishServed {
        chef: ChefId,
        dish: String,
    },
    ChopCompleted {
        chef: ChefId,
        item: String,
    },
    DeviceCooked {
        station: String,
        device: DeviceKind,
    },
    DeviceBurned {
        station: String,
        device: DeviceKind,
    },
    PlateWashed {
        plate: ItemId,
    },
    PlateReturned {
        plate: ItemId,
    },

    // -- Session --
    GamePaused,
    GameResumed,
    GameOver {
        score: u32,
        passed: bool,
    },
}

/// Discriminant tag for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OrderCreated,
    OrderCompleted,
    OrderFailed,
    OrderExpired,
    ScoreChanged,
    DishServed,
    ChopCompleted,
    DeviceCooked,
    DeviceBurned,
    PlateWashed,
    PlateReturned,
    GamePaused,
    GameResumed,
    GameOver,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::OrderCreated { .. } => EventKind::OrderCreated,
            GameEvent::OrderCompleted { .. } => EventKind::OrderCompleted,
            GameEvent::OrderFailed { .. } => EventKind::OrderFailed,
            GameEvent::OrderExpired { .. } => EventKind::OrderExpired,
            GameEvent::ScoreChanged { .. } => EventKind::ScoreChanged,
            GameEvent::DishServed { .. } => EventKind::DishServed,
            GameEvent::ChopCompleted { .. } => EventKind::ChopCompleted,
            GameEvent::DeviceCooked { .. } => EventKind::DeviceCooked,
            GameEvent::DeviceBurned { .. } => EventKind::DeviceBurned,
            GameEvent::PlateWashed { .. } => EventKind::PlateWashed,
            GameEvent::PlateReturned { .. } => EventKind::PlateReturned,
            GameEvent::GamePaused => EventKind::GamePaused,
            GameEvent::GameResumed => EventKind::GameResumed,
            GameEvent::GameOver { .. } => EventKind::GameOver,
        }
    }
}

// ---------------------------------------------------------------------------
// EventHistory -- capped ring buffer
// ---------------------------------------------------------------------------

/// Fixed-capacity history; the oldest event is dropped when full.
#[derive(Debug)]
pub struct EventHistory {
    events: VecDeque<GameEvent>,
    capacity: usize,
    total_written: u64,
}

impl EventHistory {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            total_written: 0,
        }
    }

    pub fn push(&mut self, event: GameEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total events written since creation (including dropped).
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    pub fn dropped_count(&self) -> u64 {
        self.total_written.saturating_sub(self.capacity as u64)
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

pub type Listener = Arc<dyn Fn(&GameEvent) + Send + Sync>;
pub type EventFilter = Arc<dyn Fn(&GameEvent) -> bool + Send + Sync>;

#[derive(Clone)]
struct ListenerEntry {
    id: ListenerId,
    filter: Option<EventFilter>,
    listener: Listener,
}

impl std::fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct EventBus {
    listeners: RwLock<Vec<ListenerEntry>>,
    history: Mutex<EventHistory>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            history: Mutex::new(EventHistory::new(history_capacity)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Record the event, then deliver it to every matching listener.
    pub fn publish(&self, event: GameEvent) {
        lock(&self.history).push(event.clone());

        let snapshot: Vec<ListenerEntry> = read(&self.listeners).clone();
        for entry in snapshot {
            if let Some(filter) = &entry.filter
                && !filter(&event)
            {
                continue;
            }
            let listener = &entry.listener;
            if catch_unwind(AssertUnwindSafe(|| listener(&event))).is_err() {
                tracing::warn!(
                    listener = entry.id.0,
                    kind = ?event.kind(),
                    "event listener panicked; continuing delivery"
                );
            }
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(listener))
    }

    /// Listen to one event kind only.
    pub fn subscribe_kind<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.register(
            Some(Arc::new(move |event: &GameEvent| event.kind() == kind)),
            Arc::new(listener),
        )
    }

    /// Mirror every event into the log at `info` level.
    pub fn log_all(&self) -> ListenerId {
        self.subscribe(|event| tracing::info!(?event, "game event"))
    }

    /// Returns whether the listener was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = write(&self.listeners);
        let before = listeners.len();
        listeners.retain(|entry| entry.id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        read(&self.listeners).len()
    }

    /// Snapshot of the retained history, oldest first.
    pub fn history(&self) -> Vec<GameEvent> {
        lock(&self.history).iter().cloned().collect()
    }

    pub fn total_published(&self) -> u64 {
        lock(&self.history).total_written()
    }

    pub fn dropped_count(&self) -> u64 {
        lock(&self.history).dropped_count()
    }

    fn register(&self, filter: Option<EventFilter>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        write(&self.listeners).push(ListenerEntry {
            id,
            filter,
            listener,
        });
        id
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn score(old: u32, new: u32) -> GameEvent {
        GameEvent::ScoreChanged { old, new }
    }

    // -----------------------------------------------------------------------
    // Test 1: History wraps and drops oldest
    // -----------------------------------------------------------------------
    #[test]
    fn history_drops_oldest() {
        let mut history = EventHistory::new(3);
        for i in 0..5 {
            history.push(score(i, i + 1));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.total_written(), 5);
        assert_eq!(history.dropped_count(), 2);
        let olds: Vec<u32> = history
            .iter()
            .map(|e| match e {
                GameEvent::ScoreChanged { old, .. } => *old,
                _ => panic!("expected ScoreChanged"),
            })
            .collect();
        assert_eq!(olds, vec![2, 3, 4]);
    }

    // -----------------------------------------------------------------------
    // Test 2: Listeners fire in registration order
    // -----------------------------------------------------------------------
    #[test]
    fn listeners_in_registration_order() {
        let bus = EventBus::new(8);
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            bus.subscribe(move |_| order.lock().unwrap().push(tag));
        }
        bus.publish(GameEvent::GamePaused);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    // -----------------------------------------------------------------------
    // Test 3: A panicking listener does not block the rest
    // -----------------------------------------------------------------------
    #[test]
    fn panicking_listener_is_isolated() {
        let bus = EventBus::new(8);
        let hits = Arc::new(AtomicU64::new(0));
        bus.subscribe(|_| panic!("listener failure"));
        let counter = Arc::clone(&hits);
        bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(GameEvent::GameResumed);
        bus.publish(GameEvent::GameResumed);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(bus.total_published(), 2);
    }

    // -----------------------------------------------------------------------
    // Test 4: Kind filters and unsubscribe
    // -----------------------------------------------------------------------
    #[test]
    fn kind_filter_and_unsubscribe() {
        let bus = EventBus::new(8);
        let hits = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&hits);
        let id = bus.subscribe_kind(EventKind::ScoreChanged, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(GameEvent::GamePaused);
        bus.publish(score(0, 10));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(score(10, 20));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    // -----------------------------------------------------------------------
    // Test 5: Listeners may publish re-entrantly
    // -----------------------------------------------------------------------
    #[test]
    fn reentrant_publish_does_not_deadlock() {
        let bus = Arc::new(EventBus::new(8));
        let inner = Arc::clone(&bus);
        bus.subscribe_kind(EventKind::GamePaused, move |_| {
            inner.publish(GameEvent::GameResumed);
        });
        bus.publish(GameEvent::GamePaused);
        assert_eq!(
            bus.history(),
            vec![GameEvent::GamePaused, GameEvent::GameResumed]
        );
    }

    // -----------------------------------------------------------------------
    // Test 6: Concurrent publishers and readers
    // -----------------------------------------------------------------------
    #[test]
    fn concurrent_publish_and_read() {
        let bus = Arc::new(EventBus::new(16));
        let writers: Vec<_> = (0..4)
            .map(|t| {
                let bus = Arc::clone(&bus);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        bus.publish(score(t, i));
                        assert!(bus.history().len() <= 16);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(bus.total_published(), 400);
        assert_eq!(bus.history().len(), 16);
        assert_eq!(bus.dropped_count(), 384);
    }
}
