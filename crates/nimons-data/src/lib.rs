//! Data files for Nimonscooked: game configs, menus, stage grids and saved
//! progress.
//!
//! Configs and menus may be RON, TOML or JSON (detected by extension).
//! Stages are plain-text character grids, see [`stage`].

pub mod config;
pub mod loader;
pub mod menu;
pub mod progress;
pub mod schema;
pub mod stage;

pub use config::{find_config, load_config};
pub use loader::{DataLoadError, Format};
pub use menu::load_menu;
pub use progress::{ProgressStore, StageProgress};
pub use stage::{Stage, load_stage, parse_stage};

use nimons_core::config::GameConfig;
use nimons_core::recipe::Menu;
use std::path::Path;

/// Base name of an optional menu file next to a stage.
pub const MENU_BASE_NAME: &str = "menu";

/// A stage together with the config and menu found beside it.
#[derive(Debug, Clone)]
pub struct StageBundle {
    pub stage: Stage,
    pub config: GameConfig,
    pub menu: Menu,
}

/// Load a stage file plus `config.*` and `menu.*` from the same directory.
/// Either may be absent; the defaults and the standard menu fill in.
pub fn load_bundle(stage_path: &Path) -> Result<StageBundle, DataLoadError> {
    let dir = stage_path.parent().unwrap_or_else(|| Path::new("."));
    let stage = load_stage(stage_path)?;
    let config = find_config(dir)?;
    let menu = match loader::find_data_file(dir, MENU_BASE_NAME)? {
        Some(path) => load_menu(&path, config.orders.default_time_limit_ms)?,
        None => Menu::standard(config.orders.default_time_limit_ms),
    };
    Ok(StageBundle {
        stage,
        config,
        menu,
    })
}
