//! One playable stage: kitchen, countdown clock and background order
//! generation wired together.
//!
//! The session is driven from the tick thread. [`GameSession::tick`] reads
//! the clock, hands the pause-excluded delta to the kitchen and ends the game
//! once the countdown runs out. Orders are spawned by an [`OrderGenerator`]
//! on the session's [`TaskPool`], paced by the same pause-excluded game time:
//! every tick forwards the elapsed time to the generator thread.

use crate::clock::{GameClock, TimeSource};
use crate::config::{ConfigError, GameConfig};
use crate::event::GameEvent;
use crate::generator::OrderGenerator;
use crate::kitchen::Kitchen;
use crate::map::{KitchenMap, MapError};
use crate::recipe::Menu;
use crate::tasks::{ShutdownOutcome, TaskError, TaskPool};
use crate::view::KitchenView;
use crossbeam_channel::{Sender, unbounded};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid map: {0}")]
    Map(#[from] MapError),
    #[error("background tasks: {0}")]
    Task(#[from] TaskError),
    #[error("session has not started")]
    NotStarted,
    #[error("session already started")]
    AlreadyStarted,
    #[error("session already finished")]
    AlreadyFinished,
}

/// Final result handed to progress tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub stage_id: String,
    pub score: u32,
    pub passed: bool,
    pub completed: usize,
    pub failed: usize,
    pub expired: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickStatus {
    Running,
    Paused,
    Finished(GameReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Running,
    Finished,
}

#[derive(Debug)]
pub struct GameSession {
    stage_id: String,
    kitchen: Kitchen,
    clock: GameClock,
    menu: Option<Menu>,
    pool: Option<TaskPool>,
    pace: Option<Sender<u64>>,
    last_elapsed_ms: u64,
    phase: Phase,
}

impl GameSession {
    pub fn new(
        stage_id: impl Into<String>,
        config: GameConfig,
        map: KitchenMap,
        menu: Menu,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let clock = GameClock::new(time, config.session.duration_ms);
        let kitchen = Kitchen::new(config, map)?;
        Ok(Self {
            stage_id: stage_id.into(),
            kitchen,
            clock,
            menu: Some(menu),
            pool: None,
            pace: None,
            last_elapsed_ms: 0,
            phase: Phase::Ready,
        })
    }

    pub fn stage_id(&self) -> &str {
        &self.stage_id
    }

    pub fn kitchen(&self) -> &Kitchen {
        &self.kitchen
    }

    /// Chef input goes through here between ticks.
    pub fn kitchen_mut(&mut self) -> &mut Kitchen {
        &mut self.kitchen
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn view(&self) -> KitchenView {
        self.kitchen.view(self.clock.remaining_ms())
    }

    /// Start the clock, spawn the first order and hand the generator to the
    /// task pool.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Running => return Err(SessionError::AlreadyStarted),
            Phase::Finished => return Err(SessionError::AlreadyFinished),
            Phase::Ready => {}
        }
        let menu = self.menu.take().ok_or(SessionError::AlreadyStarted)?;
        let config = self.kitchen.config().clone();

        let mut pool = TaskPool::new(config.worker_threads)?;
        let orders = Arc::clone(self.kitchen.orders());
        orders.set_accepting(true);
        let mut generator = OrderGenerator::new(
            orders,
            Arc::clone(self.kitchen.events()),
            menu,
            config.orders.seed,
        );
        generator.generate();
        let (pace, pace_rx) = unbounded();
        generator.start(&mut pool, pace_rx, config.orders.spawn_interval_ms)?;

        self.pool = Some(pool);
        self.pace = Some(pace);
        self.clock.start();
        self.last_elapsed_ms = 0;
        self.phase = Phase::Running;
        info!(
            stage = %self.stage_id,
            duration_ms = config.session.duration_ms,
            "session started"
        );
        Ok(())
    }

    /// Advance the kitchen by the running time since the previous tick.
    pub fn tick(&mut self) -> Result<TickStatus, SessionError> {
        match self.phase {
            Phase::Ready => return Err(SessionError::NotStarted),
            Phase::Finished => return Err(SessionError::AlreadyFinished),
            Phase::Running => {}
        }
        if self.clock.is_paused() {
            return Ok(TickStatus::Paused);
        }

        let elapsed = self.clock.elapsed_ms();
        let delta = elapsed.saturating_sub(self.last_elapsed_ms);
        self.last_elapsed_ms = elapsed;
        if delta > 0 {
            self.kitchen.update(delta);
            if let Some(pace) = &self.pace {
                let _ = pace.send(elapsed);
            }
        }

        if self.clock.is_over() {
            return self.finish().map(TickStatus::Finished);
        }
        Ok(TickStatus::Running)
    }

    /// Stop the clock and order generation. No-op unless running.
    pub fn pause(&mut self) {
        if self.phase != Phase::Running || self.clock.is_paused() {
            return;
        }
        self.clock.pause();
        self.kitchen.orders().set_accepting(false);
        info!(stage = %self.stage_id, elapsed_ms = self.clock.elapsed_ms(), "session paused");
        self.kitchen.events().publish(GameEvent::GamePaused);
    }

    pub fn resume(&mut self) {
        if self.phase != Phase::Running || !self.clock.is_paused() {
            return;
        }
        self.clock.resume();
        self.kitchen.orders().set_accepting(true);
        info!(stage = %self.stage_id, "session resumed");
        self.kitchen.events().publish(GameEvent::GameResumed);
    }

    /// End the game now: stop background work, expire open orders and
    /// evaluate the pass threshold.
    pub fn finish(&mut self) -> Result<GameReport, SessionError> {
        match self.phase {
            Phase::Ready => return Err(SessionError::NotStarted),
            Phase::Finished => return Err(SessionError::AlreadyFinished),
            Phase::Running => {}
        }
        // Let the generator catch up on game time already sent before the
        // book closes.
        if let ShutdownOutcome::Forced { detached } = self.shutdown() {
            warn!(stage = %self.stage_id, ?detached, "background tasks were detached");
        }
        self.kitchen.orders().set_accepting(false);
        self.kitchen.close_orders();

        let score = self.kitchen.score();
        let passed = score.passes(self.kitchen.config().session.pass_threshold);
        let counts = self.kitchen.orders().counts();
        let report = GameReport {
            stage_id: self.stage_id.clone(),
            score: score.value(),
            passed,
            completed: counts.completed,
            failed: counts.failed,
            expired: counts.expired,
        };
        self.phase = Phase::Finished;

        info!(
            stage = %report.stage_id,
            score = report.score,
            passed = report.passed,
            completed = report.completed,
            failed = report.failed,
            expired = report.expired,
            "game over"
        );
        self.kitchen.events().publish(GameEvent::GameOver {
            score: report.score,
            passed,
        });
        Ok(report)
    }

    /// Close the generator's pace channel and wait up to the configured
    /// shutdown timeout for background work to finish.
    pub fn shutdown(&mut self) -> ShutdownOutcome {
        self.pace = None;
        match self.pool.take() {
            Some(mut pool) => pool.shutdown(Duration::from_millis(
                self.kitchen.config().shutdown_timeout_ms,
            )),
            None => ShutdownOutcome::Clean,
        }
    }
}
