use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod models;
pub use models::*;

/// Marker value that is replaced by an environment variable at load time.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. `config/default.{toml,yaml,json}`
/// 2. `config/{RUN_ENV}.{toml,yaml,json}` (`RUN_ENV` defaults to `debug`)
/// 3. Environment variables with prefix `PREFIX` (default `GUIDEBOOK`) and `__` as separator,
///    e.g. `GUIDEBOOK__SERVER__PORT=8080`.
///
/// The config directory is taken from `CONFIG_DIR` and defaults to `./config`.
/// After deserialization every `"secret_from_env"` value is replaced, see
/// [`apply_env_overrides_from_marker`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    load_config_from(Path::new(&config_dir))
}

/// Same as [`load_config`] but reads the layered files from `config_dir`.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "GUIDEBOOK".to_string());

    let default_path: PathBuf = config_dir.join("default");
    let env_path: PathBuf = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {} (prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values.
///
/// The variable name is the upper-cased key path joined by `_`, so
/// `google_oauth.client_secret` is read from `GOOGLE_OAUTH_CLIENT_SECRET`.
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = path.join("_").to_uppercase();
                match env::var(&env_key) {
                    Ok(env_val) => *obj = Value::String(env_val),
                    Err(_) => warn!("env var {} not found for {}", env_key, SECRET_MARKER),
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to deserialize config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// `DOTENV_OVERRIDE` wins, then the first CLI argument starting with `.env`,
/// then `.env`. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_config_from_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("default.toml"),
            r#"
use_gcal = true

[server]
host = "127.0.0.1"
port = 8086

[database]
url = "sqlite://data/test.db"

[google_oauth]
client_id = "client-123"
client_secret = "plain-secret"

[gcal]
time_zone = "Europe/Berlin"
"#,
        )
        .expect("write default.toml");

        let config = load_config_from(dir.path()).expect("config should load");
        assert!(config.use_gcal);
        assert_eq!(config.server.port, 8086);
        let oauth = config.google_oauth.expect("oauth section");
        assert_eq!(oauth.client_id, "client-123");
        assert_eq!(oauth.client_secret, "plain-secret");
        assert_eq!(oauth.token_url, DEFAULT_TOKEN_URL);
        let gcal = config.gcal.expect("gcal section");
        assert_eq!(gcal.api_base_url, DEFAULT_CALENDAR_API_BASE_URL);
        assert_eq!(gcal.time_zone_or_default(), "Europe/Berlin");
        assert_eq!(gcal.request_timeout_secs_or_default(), DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_secret_marker_is_replaced_from_env() {
        env::set_var("GOOGLE_OAUTH_CLIENT_SECRET", "from-the-environment");
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8086,
            },
            use_gcal: true,
            database: None,
            google_oauth: Some(GoogleOAuthConfig {
                client_id: "client-123".to_string(),
                client_secret: SECRET_MARKER.to_string(),
                token_url: DEFAULT_TOKEN_URL.to_string(),
            }),
            gcal: None,
        };

        let config = apply_env_overrides_from_marker(config).expect("overrides apply");
        assert_eq!(
            config.google_oauth.map(|o| o.client_secret).as_deref(),
            Some("from-the-environment")
        );
    }

    #[test]
    fn test_debug_output_redacts_client_secret() {
        let oauth = GoogleOAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "super-secret".to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        };
        let printed = format!("{:?}", oauth);
        assert!(printed.contains("client-123"));
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn test_gcal_defaults_ignore_blank_values() {
        let gcal = GcalConfig {
            api_base_url: DEFAULT_CALENDAR_API_BASE_URL.to_string(),
            time_zone: Some("  ".to_string()),
            request_timeout_secs: Some(0),
        };
        assert_eq!(gcal.time_zone_or_default(), DEFAULT_TIME_ZONE);
        assert_eq!(gcal.request_timeout_secs_or_default(), DEFAULT_REQUEST_TIMEOUT_SECS);
    }
}
