//! Fixed-cadence driver: one script command per tick, then ticks until the
//! countdown ends.

use crate::script::{Command, Script};
use nimons_core::clock::ManualTimeSource;
use nimons_core::id::ChefId;
use nimons_core::kitchen::{Kitchen, Movement};
use nimons_core::session::{GameReport, GameSession, SessionError, TickStatus};
use nimons_core::station::Interaction;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info};

/// How time moves between ticks.
#[derive(Debug, Clone)]
pub enum Pacing {
    /// Advance a manual clock by one tick per iteration. As fast as possible.
    Simulated(ManualTimeSource),
    /// Sleep one tick per iteration against the system clock.
    Realtime,
}

/// Plays a [`Script`] one command per tick.
#[derive(Debug)]
pub struct ScriptPlayer {
    pending: VecDeque<Command>,
    chef: ChefId,
    wait_ms: u64,
    served: usize,
}

impl ScriptPlayer {
    pub fn new(script: &Script) -> Self {
        Self {
            pending: script.commands().iter().copied().collect(),
            chef: ChefId(0),
            wait_ms: 0,
            served: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty() && self.wait_ms == 0
    }

    /// Dishes the script has served so far.
    pub fn served(&self) -> usize {
        self.served
    }

    /// Run the next command, or keep waiting. `delta_ms` is the game time
    /// that passed since the previous step.
    pub fn step(&mut self, kitchen: &mut Kitchen, delta_ms: u64) {
        if self.wait_ms > 0 {
            self.wait_ms = self.wait_ms.saturating_sub(delta_ms);
            return;
        }
        let Some(command) = self.pending.pop_front() else {
            return;
        };
        match command {
            Command::Chef(id) => {
                self.chef = id;
                // Switching chefs costs no tick.
                self.step(kitchen, 0);
            }
            Command::Wait(ms) => self.wait_ms = ms,
            Command::Move(dir) => match kitchen.move_chef(self.chef, dir) {
                Movement::UnknownChef => {
                    info!(chef = self.chef.0, "script drives a chef that does not exist")
                }
                movement => debug!(chef = self.chef.0, ?dir, ?movement, "move"),
            },
            Command::Interact => {
                let outcome = kitchen.interact(self.chef);
                if matches!(outcome, Interaction::Served { .. }) {
                    self.served += 1;
                }
                info!(chef = self.chef.0, ?outcome, "interact");
            }
        }
    }
}

/// Start the session and drive it to the end of its countdown.
pub fn run(
    session: &mut GameSession,
    script: &Script,
    pacing: &Pacing,
) -> Result<GameReport, SessionError> {
    let tick_ms = session.kitchen().config().tick_ms;
    let mut player = ScriptPlayer::new(script);
    session.start()?;

    let mut last_elapsed = session.clock().elapsed_ms();
    loop {
        match pacing {
            Pacing::Simulated(time) => time.advance(tick_ms),
            Pacing::Realtime => std::thread::sleep(Duration::from_millis(tick_ms)),
        }
        match session.tick()? {
            TickStatus::Finished(report) => {
                info!(
                    served = player.served(),
                    script_done = player.is_done(),
                    "run finished"
                );
                return Ok(report);
            }
            TickStatus::Paused => continue,
            TickStatus::Running => {}
        }
        let elapsed = session.clock().elapsed_ms();
        let delta = elapsed.saturating_sub(last_elapsed);
        last_elapsed = elapsed;
        player.step(session.kitchen_mut(), delta);
    }
}
