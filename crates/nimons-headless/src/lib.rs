//! Headless Nimonscooked: load a stage, play a chef script against it on a
//! fixed tick, report the result. Used for smoke runs and balancing.

pub mod runner;
pub mod script;

pub use runner::{Pacing, ScriptPlayer, run};
pub use script::{Command, Script, ScriptError};
