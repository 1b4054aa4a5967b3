#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::Rules;
    use crate::config::Config;
    use crate::config::loader::{ConfigError, load_config_from, save_config_to};
    use crate::input::{Action, Key, RemapRequest};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    // Helper function to create a test config path
    fn create_test_config_path() -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("nested").join("config.toml");
        (temp_dir, config_path)
    }

    #[test]
    fn test_load_nonexistent_config_writes_defaults() {
        let (_temp_dir, config_path) = create_test_config_path();

        let config = load_config_from(&config_path).expect("Failed to load default config");

        assert!(config_path.exists(), "Config file should have been created");
        assert_eq!(config, Config::default());
        assert!(config.rules.ghost_enabled);
        assert!(config.rules.hold_enabled);
        assert!((config.timing.clear_pause - 1.0).abs() < f32::EPSILON);
        assert!((config.timing.pause_cooldown - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_save_and_load_config() {
        let (_temp_dir, config_path) = create_test_config_path();

        let mut config = Config::default();
        config.rules = Rules {
            ghost_enabled: false,
            hold_enabled: true,
        };
        config.timing.clear_pause = 0.6;
        config.highscore_dir = Some(PathBuf::from("/tmp/scores"));
        config.bindings.apply(RemapRequest {
            action: Action::HardDrop,
            key: Key::Enter,
        });

        save_config_to(&config_path, &config).expect("Failed to save config");
        let loaded = load_config_from(&config_path).expect("Failed to load config");

        assert_eq!(loaded, config);
        assert_eq!(loaded.bindings.hard_drop, vec![Key::Enter]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let (_temp_dir, config_path) = create_test_config_path();
        fs::create_dir_all(config_path.parent().expect("parent")).expect("Failed to create dir");
        fs::write(
            &config_path,
            "[rules]\nghost_enabled = false\n\n[bindings]\nhold = [\"h\"]\n",
        )
        .expect("Failed to write config");

        let config = load_config_from(&config_path).expect("Failed to load config");
        assert!(!config.rules.ghost_enabled);
        assert!(config.rules.hold_enabled);
        assert_eq!(config.bindings.hold, vec![Key::Char('h')]);
        assert_eq!(config.bindings.move_left, vec![Key::Left, Key::Char('a')]);
        assert_eq!(config.timing, Config::default().timing);
        assert!(config.highscore_dir.is_none());
    }

    #[test]
    fn test_invalid_config_is_a_parse_error() {
        let (_temp_dir, config_path) = create_test_config_path();
        fs::create_dir_all(config_path.parent().expect("parent")).expect("Failed to create dir");
        fs::write(&config_path, "[rules\nghost_enabled = maybe").expect("Failed to write config");

        let result = load_config_from(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_key_name_is_rejected() {
        let (_temp_dir, config_path) = create_test_config_path();
        fs::create_dir_all(config_path.parent().expect("parent")).expect("Failed to create dir");
        fs::write(&config_path, "[bindings]\npause = [\"PageUp\"]\n").expect("Failed to write");

        assert!(matches!(
            load_config_from(&config_path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_highscore_dir_override() {
        let config = Config {
            highscore_dir: Some(PathBuf::from("my_scores")),
            ..Config::default()
        };
        assert_eq!(config.highscore_dir(), PathBuf::from("my_scores"));
        assert!(
            Config::default()
                .highscore_dir()
                .ends_with("scores")
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::from(std::io::Error::other("disk gone"));
        assert!(err.to_string().contains("disk gone"));
    }
}
