use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;
pub mod models;
pub use models::*;

/// Prefix for environment overrides, e.g. `SLOTIFY__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "SLOTIFY";

/// Loads the layered application configuration.
///
/// Sources, lowest precedence first:
/// 1. `<CONFIG_DIR>/default.{toml,yaml,json}` (optional)
/// 2. `<CONFIG_DIR>/<RUN_ENV>.{toml,yaml,json}` (optional, `RUN_ENV` defaults to `debug`)
/// 3. `SLOTIFY__*` environment variables, `__` separating nested keys
///
/// `CONFIG_DIR` defaults to `config` relative to the working directory.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        default = %default_path.display(),
        env = %env_path.display(),
        "loading configuration"
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let app_config: AppConfig = builder.build()?.try_deserialize()?;
    app_config
        .calendar
        .validate_agendas()
        .map_err(|e| ConfigError::Message(e.to_string()))?;
    app_config
        .calendar
        .time_zone()
        .map_err(|e| ConfigError::Message(e.to_string()))?;
    Ok(app_config)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file named by `DOTENV_OVERRIDE` is used when set, `.env` otherwise. A missing
/// file is not an error. Returns the path that was tried.
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
    use config::FileFormat;

    const SAMPLE: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8086

        [calendar]
        store = "memory"
        time_zone = "America/Santiago"
        default_agenda = "dentist"

        [[calendar.agendas]]
        name = "physio"
        calendar_id = "physio@group.calendar.google.com"

        [[calendar.agendas]]
        name = "dentist"
        calendar_id = "dentist@group.calendar.google.com"

        [[calendar.agendas]]
        name = "nutrition"
        calendar_id = "nutrition@group.calendar.google.com"
    "#;

    fn parse(source: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_agenda_table_keeps_definition_order() {
        let config = parse(SAMPLE);
        let names: Vec<&str> = config
            .calendar
            .agendas
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["physio", "dentist", "nutrition"]);
        assert_eq!(config.calendar.default_agenda.as_deref(), Some("dentist"));
        assert_eq!(config.calendar.store, StoreKind::Memory);
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse("[server]\nhost = \"0.0.0.0\"\nport = 80\n");
        assert_eq!(config.calendar.store, StoreKind::Google);
        assert_eq!(config.calendar.time_zone, "UTC");
        assert_eq!(config.calendar.request_timeout_secs, 20);
        assert_eq!(config.calendar.reservation_settle_secs, 30);
        assert!(config.calendar.agendas.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.journald);
    }

    #[test]
    fn test_time_zone_parsing() {
        let config = parse(SAMPLE);
        assert_eq!(
            config.calendar.time_zone().unwrap(),
            chrono_tz::America::Santiago
        );

        let mut broken = config.calendar.clone();
        broken.time_zone = "Mars/Olympus_Mons".to_string();
        assert_eq!(
            broken.time_zone(),
            Err(ConfigValueError::UnknownTimeZone("Mars/Olympus_Mons".to_string()))
        );
    }

    #[test]
    fn test_duplicate_agenda_rejected() {
        let mut calendar = parse(SAMPLE).calendar;
        assert!(calendar.validate_agendas().is_ok());

        calendar.agendas.push(AgendaConfig {
            name: "physio".to_string(),
            calendar_id: "other".to_string(),
        });
        assert_eq!(
            calendar.validate_agendas(),
            Err(ConfigValueError::DuplicateAgenda("physio".to_string()))
        );
    }

    #[test]
    fn test_empty_calendar_id_rejected() {
        let mut calendar = CalendarConfig::default();
        calendar.agendas.push(AgendaConfig {
            name: "blank".to_string(),
            calendar_id: "  ".to_string(),
        });
        assert_eq!(
            calendar.validate_agendas(),
            Err(ConfigValueError::EmptyCalendarId("blank".to_string()))
        );
    }
}
