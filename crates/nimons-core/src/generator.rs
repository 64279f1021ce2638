use crate::event::{EventBus, GameEvent};
use crate::order::{Order, OrderManager};
use crate::recipe::Menu;
use crate::tasks::{TaskError, TaskPool};
use crossbeam_channel::Receiver;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

/// Spawns orders from the menu into the shared order book.
#[derive(Debug)]
pub struct OrderGenerator {
    orders: Arc<OrderManager>,
    events: Arc<EventBus>,
    menu: Menu,
    rng: StdRng,
}

impl OrderGenerator {
    pub fn new(orders: Arc<OrderManager>, events: Arc<EventBus>, menu: Menu, seed: u64) -> Self {
        Self {
            orders,
            events,
            menu,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Try to spawn one order. Count check, recipe pick, insert and the
    /// `OrderCreated` event all happen under the order-book lock, so the
    /// event is always recorded before anything that completes the order.
    pub fn generate(&mut self) -> Option<Order> {
        let menu = &self.menu;
        let rng = &mut self.rng;
        let events = &self.events;
        self.orders.spawn_announced(
            || menu.pick(rng).clone(),
            |order| {
                tracing::info!(
                    order = %order.index,
                    recipe = order.recipe.name(),
                    time_limit_ms = order.time_limit_ms,
                    "order created"
                );
                events.publish(GameEvent::OrderCreated {
                    index: order.index,
                    recipe: order.recipe.name().to_string(),
                    time_limit_ms: order.time_limit_ms,
                });
            },
        )
    }

    /// Move the generator onto a paced task: one attempt per `interval_ms`
    /// of the game time sent on `pace`.
    pub fn start(
        mut self,
        pool: &mut TaskPool,
        pace: Receiver<u64>,
        interval_ms: u64,
    ) -> Result<(), TaskError> {
        pool.schedule_paced("nimons-order-generator", pace, interval_ms, move || {
            self.generate();
        })
    }
}
