//! Nimons Core -- the kitchen simulation engine behind Nimonscooked.
//!
//! This crate owns everything with real invariants: the item and ingredient
//! model, cooking-device timing, the per-station interaction state machines,
//! the tile map and chefs, the order book and scoring, and the background
//! order generator. Rendering, input mapping and menus live elsewhere and
//! talk to the core through [`kitchen::Kitchen`] and [`session::GameSession`].
//!
//! # Two Timelines
//!
//! 1. **Tick thread** -- single-threaded and cooperative. Chef moves,
//!    interactions and every station `update(delta)` run here.
//! 2. **Order generator** -- a repeating task on the [`tasks::TaskPool`]
//!    that spawns orders on its own thread. It shares the order book with the
//!    tick thread through the mutex inside [`order::OrderManager`].
//!
//! # Tick Pipeline
//!
//! Each call to [`kitchen::Kitchen::update`] runs:
//!
//! 1. **Stations** -- cutting, cooking, washing and serving timers advance.
//! 2. **Effects** -- completed chops and washes release their chefs, washed
//!    plates move to the rack, served plates return to storage.
//! 3. **Orders** -- remaining time counts down; expired orders fail and apply
//!    their penalty.
//!
//! # Key Types
//!
//! - [`item::Item`] -- closed sum over food, plates and utensils.
//! - [`ingredient::Ingredient`] -- per-variant chop/cook state machine.
//! - [`utensil::Utensil`] -- pot, pan and oven timing.
//! - [`station::Station`] -- closed sum over the eight station kinds.
//! - [`order::OrderManager`] -- mutex-guarded order book.
//! - [`event::EventBus`] -- thread-safe fan-out with capped history.
//! - [`session::GameSession`] -- clock, generator and kitchen wired together.

pub mod chef;
pub mod clock;
pub mod config;
pub mod event;
pub mod generator;
pub mod id;
pub mod ingredient;
pub mod item;
pub mod kitchen;
pub mod map;
pub mod matching;
pub mod order;
pub mod recipe;
pub mod score;
pub mod session;
pub mod station;
pub(crate) mod sync;
pub mod tasks;
pub mod utensil;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
