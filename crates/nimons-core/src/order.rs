//! The order book shared by the tick thread and the order generator.
//!
//! Every read or write of the active list goes through one mutex. Spawning
//! checks the active count, picks a recipe and inserts under a single guard,
//! so concurrent spawns can never exceed the cap.

use crate::id::OrderIndex;
use crate::item::Dish;
use crate::recipe::{MenuItem, Recipe};
use crate::sync::lock;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Active,
    Completed,
    /// Ran out of time during play. Penalised.
    Failed,
    /// Still active when the game ended. Not penalised.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub index: OrderIndex,
    pub recipe: Recipe,
    pub reward: u32,
    pub penalty: u32,
    pub time_limit_ms: u64,
    remaining_ms: u64,
    status: OrderStatus,
}

impl Order {
    fn from_menu(index: OrderIndex, item: MenuItem) -> Self {
        Self {
            index,
            recipe: item.recipe,
            reward: item.reward,
            penalty: item.penalty,
            time_limit_ms: item.time_limit_ms,
            remaining_ms: item.time_limit_ms,
            status: OrderStatus::Active,
        }
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::Active
    }
}

/// Terminal-state tallies for the end-of-game report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCounts {
    pub completed: usize,
    pub failed: usize,
    pub expired: usize,
}

#[derive(Debug)]
struct OrderBook {
    accepting: bool,
    next_index: u32,
    active: Vec<Order>,
    archive: Vec<Order>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self {
            accepting: true,
            next_index: 0,
            active: Vec::new(),
            archive: Vec::new(),
        }
    }
}

impl OrderBook {
    fn retire(&mut self, position: usize, status: OrderStatus) -> Order {
        let mut order = self.active.remove(position);
        order.status = status;
        self.archive.push(order.clone());
        order
    }
}

/// Thread-safe order book with a hard cap on active orders.
#[derive(Debug)]
pub struct OrderManager {
    book: Mutex<OrderBook>,
    max_active: usize,
}

impl OrderManager {
    pub fn new(max_active: usize) -> Self {
        Self {
            book: Mutex::new(OrderBook::default()),
            max_active,
        }
    }

    pub fn max_active(&self) -> usize {
        self.max_active
    }

    /// Paused or finished sessions stop accepting new orders. Flipped under
    /// the book lock: once this returns, no spawn can slip in.
    pub fn set_accepting(&self, accepting: bool) {
        lock(&self.book).accepting = accepting;
    }

    pub fn is_accepting(&self) -> bool {
        lock(&self.book).accepting
    }

    /// Spawn one order if the book is accepting and below the cap. `pick`
    /// runs inside the critical section.
    pub fn spawn_if_room<F>(&self, pick: F) -> Option<Order>
    where
        F: FnOnce() -> MenuItem,
    {
        self.spawn_announced(pick, |_| {})
    }

    /// Like [`spawn_if_room`](Self::spawn_if_room), but `announce` also runs
    /// before the guard is released, so nothing can complete or fail the
    /// order before it has been announced. `announce` must not call back
    /// into this order book.
    pub fn spawn_announced<F, A>(&self, pick: F, announce: A) -> Option<Order>
    where
        F: FnOnce() -> MenuItem,
        A: FnOnce(&Order),
    {
        let mut book = lock(&self.book);
        if !book.accepting || book.active.len() >= self.max_active {
            return None;
        }
        book.next_index += 1;
        let order = Order::from_menu(OrderIndex(book.next_index), pick());
        book.active.push(order.clone());
        announce(&order);
        Some(order)
    }

    /// Count down every active order. Orders reaching zero fail and are
    /// returned; each fails exactly once.
    pub fn tick(&self, delta_ms: u64) -> Vec<Order> {
        let mut book = lock(&self.book);
        for order in &mut book.active {
            order.remaining_ms = order.remaining_ms.saturating_sub(delta_ms);
        }

        let mut failed = Vec::new();
        while let Some(position) = book.active.iter().position(|o| o.remaining_ms == 0) {
            failed.push(book.retire(position, OrderStatus::Failed));
        }
        failed
    }

    /// Complete the first active order (oldest first) whose recipe matches.
    pub fn fulfill(&self, dish: &Dish) -> Option<Order> {
        let mut book = lock(&self.book);
        let position = book.active.iter().position(|o| o.recipe.matches(dish))?;
        Some(book.retire(position, OrderStatus::Completed))
    }

    /// End of game: every remaining active order becomes expired.
    pub fn close_all(&self) -> Vec<Order> {
        let mut book = lock(&self.book);
        book.accepting = false;
        let mut expired = Vec::with_capacity(book.active.len());
        while !book.active.is_empty() {
            expired.push(book.retire(0, OrderStatus::Expired));
        }
        expired
    }

    /// Snapshot of the active orders, oldest first.
    pub fn active(&self) -> Vec<Order> {
        lock(&self.book).active.clone()
    }

    pub fn active_count(&self) -> usize {
        lock(&self.book).active.len()
    }

    pub fn archived(&self) -> Vec<Order> {
        lock(&self.book).archive.clone()
    }

    pub fn counts(&self) -> OrderCounts {
        let book = lock(&self.book);
        let mut counts = OrderCounts::default();
        for order in &book.archive {
            match order.status {
                OrderStatus::Completed => counts.completed += 1,
                OrderStatus::Failed => counts.failed += 1,
                OrderStatus::Expired => counts.expired += 1,
                OrderStatus::Active => {}
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ItemIds;
    use crate::ingredient::{Ingredient, IngredientKind, Preparable};
    use crate::recipe::Menu;
    use std::sync::Arc;

    fn nigiri() -> MenuItem {
        Menu::standard(1_000).find("Sake Nigiri").unwrap().clone()
    }

    fn sake_nigiri_dish(ids: &mut ItemIds) -> Dish {
        let mut rice = Ingredient::new(IngredientKind::Rice, ids);
        rice.cook();
        rice.cook();
        let mut fish = Ingredient::new(IngredientKind::Fish, ids);
        fish.chop();
        Dish::new("Sake Nigiri", vec![fish, rice], ids)
    }

    #[test]
    fn spawn_respects_cap() {
        let orders = OrderManager::new(2);
        assert!(orders.spawn_if_room(nigiri).is_some());
        assert!(orders.spawn_if_room(nigiri).is_some());
        assert!(orders.spawn_if_room(nigiri).is_none());
        assert_eq!(orders.active_count(), 2);
    }

    #[test]
    fn indices_are_sequential() {
        let orders = OrderManager::new(3);
        let a = orders.spawn_if_room(nigiri).unwrap();
        let b = orders.spawn_if_room(nigiri).unwrap();
        assert_eq!(a.index, OrderIndex(1));
        assert_eq!(b.index, OrderIndex(2));
    }

    #[test]
    fn not_accepting_blocks_spawn() {
        let orders = OrderManager::new(3);
        orders.set_accepting(false);
        assert!(orders.spawn_if_room(nigiri).is_none());
        orders.set_accepting(true);
        assert!(orders.spawn_if_room(nigiri).is_some());
    }

    #[test]
    fn expiry_at_exactly_zero_fails_once() {
        let orders = OrderManager::new(3);
        orders.spawn_if_room(nigiri);

        assert!(orders.tick(999).is_empty());
        let failed = orders.tick(1);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].status(), OrderStatus::Failed);
        assert_eq!(failed[0].remaining_ms(), 0);

        assert!(orders.tick(1_000).is_empty());
        assert_eq!(orders.counts().failed, 1);
        assert_eq!(orders.active_count(), 0);
    }

    #[test]
    fn fulfill_picks_first_matching_order() {
        let mut ids = ItemIds::new();
        let orders = OrderManager::new(3);
        let menu = Menu::standard(10_000);
        orders.spawn_if_room(|| menu.find("Kappa Maki").unwrap().clone());
        let first = orders.spawn_if_room(nigiri).unwrap();
        orders.spawn_if_room(nigiri);

        let done = orders.fulfill(&sake_nigiri_dish(&mut ids)).unwrap();
        assert_eq!(done.index, first.index);
        assert_eq!(done.status(), OrderStatus::Completed);
        assert_eq!(orders.active_count(), 2);
    }

    #[test]
    fn fulfill_without_match_changes_nothing() {
        let mut ids = ItemIds::new();
        let orders = OrderManager::new(3);
        let menu = Menu::standard(10_000);
        orders.spawn_if_room(|| menu.find("Ebi Maki").unwrap().clone());
        assert!(orders.fulfill(&sake_nigiri_dish(&mut ids)).is_none());
        assert_eq!(orders.active_count(), 1);
    }

    #[test]
    fn close_all_expires_without_failing() {
        let orders = OrderManager::new(3);
        orders.spawn_if_room(nigiri);
        orders.spawn_if_room(nigiri);
        let expired = orders.close_all();
        assert_eq!(expired.len(), 2);
        assert!(expired.iter().all(|o| o.status() == OrderStatus::Expired));
        assert_eq!(
            orders.counts(),
            OrderCounts {
                completed: 0,
                failed: 0,
                expired: 2
            }
        );
        assert!(orders.spawn_if_room(nigiri).is_none());
    }

    #[test]
    fn concurrent_spawns_never_exceed_cap() {
        let orders = Arc::new(OrderManager::new(3));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let orders = Arc::clone(&orders);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        orders.spawn_if_room(nigiri);
                        assert!(orders.active_count() <= 3);
                        orders.tick(250);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(orders.active_count() <= 3);
    }

    #[test]
    fn announce_runs_only_for_spawned_orders() {
        let orders = OrderManager::new(1);
        let mut announced = Vec::new();
        let order = orders
            .spawn_announced(nigiri, |o| announced.push(o.index))
            .unwrap();
        assert!(
            orders
                .spawn_announced(nigiri, |o| announced.push(o.index))
                .is_none()
        );
        assert_eq!(announced, vec![order.index]);
    }

    #[test]
    fn nothing_spawns_once_closed() {
        let orders = Arc::new(OrderManager::new(usize::MAX));
        let running = Arc::new(std::sync::atomic::AtomicBool::new(true));
        let spawner = {
            let orders = Arc::clone(&orders);
            let running = Arc::clone(&running);
            std::thread::spawn(move || {
                while running.load(std::sync::atomic::Ordering::SeqCst) {
                    orders.spawn_if_room(nigiri);
                }
            })
        };
        while orders.active_count() < 10 {
            std::thread::yield_now();
        }

        orders.set_accepting(false);
        let at_close = orders.active_count();
        std::thread::sleep(std::time::Duration::from_millis(20));
        running.store(false, std::sync::atomic::Ordering::SeqCst);
        spawner.join().unwrap();
        assert_eq!(orders.active_count(), at_close);
    }
}
