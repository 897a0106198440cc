use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;

pub mod models;
pub use models::*;

/// Prefix for configuration environment variables, e.g. `MEETSCHEDULER__PRIMARY_API__BASE_URL`.
pub const ENV_PREFIX: &str = "MEETSCHEDULER";

/// Separator between path segments in configuration environment variables.
pub const ENV_SEPARATOR: &str = "__";

/// Loads the application configuration.
///
/// Sources are layered, later ones overriding earlier ones:
/// built-in defaults, `config/default.*`, `config/{RUN_ENV}.*` and finally
/// `MEETSCHEDULER__*` environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("MEETSCHEDULER_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    debug!(
        "Loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR));

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate().map_err(ConfigError::Message)?;
    Ok(config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is `.env` unless `DOTENV_OVERRIDE` names another one. Loading
/// happens at most once per process; a missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.primary_api.base_url, "http://localhost:8000");
        assert_eq!(config.scheduling_api.timeout_secs, 30);
        assert_eq!(config.booking.lookahead_days, 14);
        assert_eq!(config.auth.sign_in_route, "/connect");
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"scheduling_api": {"base_url": "https://sched.example.com"}}"#,
        )
        .unwrap();
        assert_eq!(config.scheduling_api.base_url, "https://sched.example.com");
        assert_eq!(config.scheduling_api.timeout_secs, 30);
        assert_eq!(config.primary_api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.primary_api.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scheduling_api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.booking.lookahead_days = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.booking.display_time_zone = Some("Mars/Olympus".to_string());
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.booking.display_time_zone = Some("Europe/Zurich".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_storage_path_wins() {
        let session = SessionConfig {
            storage_path: Some(PathBuf::from("/tmp/session.json")),
        };
        assert_eq!(
            session.resolved_storage_path(),
            PathBuf::from("/tmp/session.json")
        );
        assert!(SessionConfig::default()
            .resolved_storage_path()
            .ends_with("meetscheduler/session.json"));
    }
}
