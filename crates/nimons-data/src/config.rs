//! Game configuration files.

use crate::loader::{DataLoadError, deserialize_file, find_data_file};
use nimons_core::config::GameConfig;
use std::path::Path;
use tracing::{debug, info};

/// Base name looked up by [`find_config`].
pub const CONFIG_BASE_NAME: &str = "config";

/// Load a [`GameConfig`] from a `.ron`, `.toml` or `.json` file and validate
/// it. Missing fields take their default values.
pub fn load_config(path: &Path) -> Result<GameConfig, DataLoadError> {
    let config: GameConfig = deserialize_file(path)?;
    config.validate().map_err(|source| DataLoadError::Config {
        file: path.to_path_buf(),
        source,
    })?;
    info!(
        file = %path.display(),
        duration_ms = config.session.duration_ms,
        pass_threshold = config.session.pass_threshold,
        "config loaded"
    );
    Ok(config)
}

/// Load `config.{ron,toml,json}` from `dir`, or the defaults if there is none.
pub fn find_config(dir: &Path) -> Result<GameConfig, DataLoadError> {
    match find_data_file(dir, CONFIG_BASE_NAME)? {
        Some(path) => load_config(&path),
        None => {
            debug!(dir = %dir.display(), "no config file, using defaults");
            Ok(GameConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::{cleanup, make_test_dir};
    use nimons_core::config::{ConfigError, ServingPolicy};
    use std::fs;

    #[test]
    fn partial_toml_overrides_defaults() {
        let dir = make_test_dir("config_toml");
        let path = dir.join("config.toml");
        fs::write(
            &path,
            r#"
chop_duration_ms = 2000
serving_policy = "accept_any_dish"

[session]
duration_ms = 90000

[frying_pan]
cook_ms = 2500
burn_ms = 6000
capacity = 2
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.chop_duration_ms, 2_000);
        assert_eq!(config.session.duration_ms, 90_000);
        assert_eq!(config.session.pass_threshold, 100);
        assert_eq!(config.frying_pan.capacity, 2);
        assert_eq!(config.serving_policy, ServingPolicy::AcceptAnyDish);
        assert_eq!(config.boiling_pot, GameConfig::default().boiling_pot);
        cleanup(&dir);
    }

    #[test]
    fn ron_config_loads() {
        let dir = make_test_dir("config_ron");
        let path = dir.join("config.ron");
        fs::write(&path, "(chef_count: 1, orders: (max_active_orders: 5))").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.chef_count, 1);
        assert_eq!(config.orders.max_active_orders, 5);
        assert_eq!(config.orders.spawn_interval_ms, 8_000);
        cleanup(&dir);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let dir = make_test_dir("config_invalid");
        let path = dir.join("config.json");
        fs::write(&path, r#"{"oven": {"cook_ms": 5000, "burn_ms": 5000, "capacity": 1}}"#).unwrap();
        match load_config(&path) {
            Err(DataLoadError::Config { file, source }) => {
                assert_eq!(file, path);
                assert!(matches!(source, ConfigError::BurnBeforeCook { .. }));
            }
            other => panic!("expected a config error, got {other:?}"),
        }
        cleanup(&dir);
    }

    #[test]
    fn missing_config_means_defaults() {
        let dir = make_test_dir("config_missing");
        assert_eq!(find_config(&dir).unwrap(), GameConfig::default());
        cleanup(&dir);
    }
}
