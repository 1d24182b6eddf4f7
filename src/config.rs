use std::fs::File;
use std::io::Read;

use thiserror::Error;
use yaml_rust::{Yaml, YamlLoader};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config file is not valid yaml: {0}")]
    Yaml(String),
    #[error("missing or invalid config key: {0}")]
    MissingKey(&'static str),
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct MysqlConfig {
    pub host: String,
    pub port: i16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Endpoint that resolves a bearer token to the identity that owns it.
    pub user_info_url: String,
    /// Optional api-key header sent alongside the bearer token.
    pub service_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub mysql: MysqlConfig,
    pub auth: AuthConfig,
}

fn require_str(node: &Yaml, key: &'static str) -> Result<String, ConfigError> {
    node.as_str()
        .map(str::to_string)
        .ok_or(ConfigError::MissingKey(key))
}

// Out-of-range values are reported against the key rather than silently
// truncated into a confusing downstream connect error.
fn require_port<T: TryFrom<i64>>(node: &Yaml, key: &'static str) -> Result<T, ConfigError> {
    node.as_i64()
        .and_then(|value| T::try_from(value).ok())
        .ok_or(ConfigError::MissingKey(key))
}

impl AppConfig {
    /// Loads and validates the config file. Every problem comes back as a
    /// typed error so startup can report it and exit instead of panicking
    /// mid-import.
    pub fn load(path: &str) -> Result<AppConfig, ConfigError> {
        let mut buf = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut buf))
            .map_err(|source| ConfigError::Io {
                path: path.to_string(),
                source,
            })?;
        Self::from_yaml_str(&buf)
    }

    pub fn from_yaml_str(raw: &str) -> Result<AppConfig, ConfigError> {
        let docs = YamlLoader::load_from_str(raw)
            .map_err(|err| ConfigError::Yaml(err.to_string()))?;
        let doc = docs.first().ok_or(ConfigError::Yaml("empty config".to_string()))?;

        let http = &doc["http"];
        let http = HttpConfig {
            bind: require_str(&http["bind"], "http.bind")?,
            port: require_port(&http["port"], "http.port")?,
        };

        let creds = &doc["mysql"];
        let mysql = MysqlConfig {
            host: require_str(&creds["host"], "mysql.host")?,
            port: require_port(&creds["port"], "mysql.port")?,
            username: require_str(&creds["username"], "mysql.username")?,
            password: require_str(&creds["password"], "mysql.password")?,
            database: require_str(&creds["database"], "mysql.database")?,
        };

        let auth = &doc["auth"];
        let auth = AuthConfig {
            user_info_url: require_str(&auth["user-info-url"], "auth.user-info-url")?,
            service_key: auth["service-key"].as_str().map(str::to_string),
        };

        Ok(AppConfig { http, mysql, auth })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
http:
  bind: 0.0.0.0
  port: 8080

mysql:
  host: localhost
  port: 3306
  username: subs
  password: hunter2
  database: subscriptions

auth:
  user-info-url: https://auth.example.com/v1/user
  service-key: anon-key-123
"#;

    #[test]
    fn parses_full_config() {
        let config = AppConfig::from_yaml_str(FULL_CONFIG).unwrap();
        assert_eq!(config.http.bind, "0.0.0.0");
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.mysql.host, "localhost");
        assert_eq!(config.mysql.port, 3306);
        assert_eq!(config.mysql.database, "subscriptions");
        assert_eq!(config.auth.user_info_url, "https://auth.example.com/v1/user");
        assert_eq!(config.auth.service_key.as_deref(), Some("anon-key-123"));
    }

    #[test]
    fn service_key_is_optional() {
        let trimmed = FULL_CONFIG.replace("  service-key: anon-key-123\n", "");
        let config = AppConfig::from_yaml_str(&trimmed).unwrap();
        assert_eq!(config.auth.service_key, None);
    }

    #[test]
    fn missing_key_names_its_dotted_path() {
        let broken = FULL_CONFIG.replace("  host: localhost\n", "");
        let err = AppConfig::from_yaml_str(&broken).unwrap_err();
        match err {
            ConfigError::MissingKey(key) => assert_eq!(key, "mysql.host"),
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_http_port_is_reported_against_its_key() {
        let broken = FULL_CONFIG.replace("  port: 8080\n", "  port: 70000\n");
        let err = AppConfig::from_yaml_str(&broken).unwrap_err();
        match err {
            ConfigError::MissingKey(key) => assert_eq!(key, "http.port"),
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_mysql_port_is_reported_against_its_key() {
        let broken = FULL_CONFIG.replace("  port: 3306\n", "  port: 33060\n");
        let err = AppConfig::from_yaml_str(&broken).unwrap_err();
        match err {
            ConfigError::MissingKey(key) => assert_eq!(key, "mysql.port"),
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }

    #[test]
    fn invalid_yaml_is_reported_as_such() {
        let err = AppConfig::from_yaml_str("http: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
