use std::path::{Path, PathBuf};
use std::time::Duration;

use linnapi_client::Credentials;
use serde::Deserialize;

use crate::error::ToolError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Authentication server, if not the public one.
    pub auth_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("linnapi").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Config::default(),
    }
}

pub fn load_config_from(path: &Path) -> Config {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };

    toml::from_str(&content).unwrap_or_default()
}

/// Resolves credentials: `--username`, then the environment, then the config file.
pub fn resolve_credentials(
    config: &Config,
    cli_username: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, ToolError> {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

    let username = non_empty(cli_username)
        .or_else(|| non_empty(env("LINNWORKS_USERNAME")))
        .or_else(|| non_empty(config.username.clone()))
        .ok_or(ToolError::CredentialsNotFound)?;
    let password = non_empty(env("LINNWORKS_PASSWORD"))
        .or_else(|| non_empty(config.password.clone()))
        .ok_or(ToolError::CredentialsNotFound)?;

    Ok(Credentials { username, password })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "username = \"user@example.com\"\npassword = \"secret\"\ntimeout_secs = 5"
        )
        .unwrap();

        let config = load_config_from(file.path());
        assert_eq!(config.username.as_deref(), Some("user@example.com"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.auth_url, None);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_or_invalid_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml"));
        assert!(config.username.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "username = [").unwrap();
        assert!(load_config_from(&path).username.is_none());
    }

    #[test]
    fn test_credentials_precedence() {
        let config = Config {
            username: Some("config-user".to_string()),
            password: Some("config-pass".to_string()),
            ..Config::default()
        };

        let creds = resolve_credentials(&config, None, env_from(&[])).unwrap();
        assert_eq!(creds.username, "config-user");
        assert_eq!(creds.password, "config-pass");

        let env = env_from(&[
            ("LINNWORKS_USERNAME", "env-user"),
            ("LINNWORKS_PASSWORD", "env-pass"),
        ]);
        let creds = resolve_credentials(&config, None, &env).unwrap();
        assert_eq!(creds.username, "env-user");
        assert_eq!(creds.password, "env-pass");

        let creds = resolve_credentials(&config, Some("cli-user".to_string()), &env).unwrap();
        assert_eq!(creds.username, "cli-user");
    }

    #[test]
    fn test_missing_credentials() {
        let result = resolve_credentials(&Config::default(), None, env_from(&[]));
        assert!(matches!(result, Err(ToolError::CredentialsNotFound)));

        let env = env_from(&[("LINNWORKS_USERNAME", "env-user"), ("LINNWORKS_PASSWORD", "")]);
        let result = resolve_credentials(&Config::default(), None, env);
        assert!(matches!(result, Err(ToolError::CredentialsNotFound)));
    }
}
