use std::env;

use super::SessionConfig;
use crate::error::ConfigError;

pub const SESSION_CONFIG_PATH_ENV: &str = "FP_SESSION_CONFIG_PATH";

/// Config named by `FP_SESSION_CONFIG_PATH`, defaults when unset or blank.
pub fn config_from_env() -> Result<SessionConfig, ConfigError> {
    let Ok(path) = env::var(SESSION_CONFIG_PATH_ENV) else {
        return Ok(SessionConfig::default());
    };
    config_from_path_value(&path)
}

fn config_from_path_value(path: &str) -> Result<SessionConfig, ConfigError> {
    let path = path.trim();
    if path.is_empty() {
        return Ok(SessionConfig::default());
    }

    SessionConfig::load_from_path(path).map_err(|e| match e {
        ConfigError::Invalid(msg) => {
            ConfigError::Invalid(format!("{SESSION_CONFIG_PATH_ENV}='{path}': {msg}"))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_blank_path_uses_defaults() {
        assert_eq!(config_from_path_value("   ").unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = config_from_path_value("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_env_var_points_at_config_file() {
        let config = SessionConfig::instant().with_seed(77);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        env::set_var(SESSION_CONFIG_PATH_ENV, file.path());
        let loaded = config_from_env();
        env::remove_var(SESSION_CONFIG_PATH_ENV);
        assert_eq!(loaded.unwrap(), config);

        assert_eq!(config_from_env().unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_invalid_file_names_env_var() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"min_participants": 0}"#).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let err = config_from_path_value(&path).unwrap_err();
        assert!(err.to_string().contains(SESSION_CONFIG_PATH_ENV));
    }
}
