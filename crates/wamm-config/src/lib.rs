use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;
use wamm_core::{CountryCode, DEFAULT_DELAY_MS};

const APP_DIR: &str = "wamm";
const CONFIG_FILENAME: &str = "config.toml";

pub const SERVER_URL_ENV: &str = "WAMM_SERVER_URL";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "wamm";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub default_delay_ms: u64,
    pub country_code: CountryCode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            dispatch: DispatchConfig {
                default_delay_ms: DEFAULT_DELAY_MS,
                country_code: CountryCode::default(),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_SERVER_URL).expect("default server url is valid"),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid server url {value}: {reason}")]
    InvalidServerUrl { value: String, reason: String },
    #[error("invalid {field} value: {value}")]
    InvalidTimeout { field: &'static str, value: u64 },
    #[error("invalid user_agent value")]
    InvalidUserAgent,
    #[error("invalid api_key value")]
    InvalidApiKey,
    #[error("invalid country_code value: {0}")]
    InvalidCountryCode(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: Option<ServerFile>,
    dispatch: Option<DispatchFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DispatchFile {
    default_delay_ms: Option<u64>,
    country_code: Option<String>,
}

/// Loads the config file (required when `config_path` is given) and applies
/// the `WAMM_SERVER_URL` override.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let config = load_file(config_path)?;
    apply_env_overrides(config, env::var(SERVER_URL_ENV).ok())
}

fn load_file(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

/// Parses and checks an http(s) base URL for the Manager service.
pub fn parse_server_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidServerUrl {
        value: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidServerUrl {
            value: trimmed.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidServerUrl {
            value: trimmed.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(url)
}

fn apply_env_overrides(mut config: AppConfig, server_url: Option<String>) -> Result<AppConfig> {
    if let Some(raw) = server_url.filter(|value| !value.trim().is_empty()) {
        config.server.base_url = parse_server_url(&raw)?;
    }
    Ok(config)
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(server) = parsed.server {
        if let Some(base_url) = server.base_url {
            config.server.base_url = parse_server_url(&base_url)?;
        }
        if let Some(api_key) = server.api_key {
            let api_key = api_key.trim();
            if api_key.is_empty() || api_key.chars().any(|ch| ch.is_control()) {
                return Err(ConfigError::InvalidApiKey);
            }
            config.server.api_key = Some(api_key.to_string());
        }
        if let Some(secs) = server.timeout_secs {
            config.server.timeout = validate_timeout("timeout_secs", secs)?;
        }
        if let Some(secs) = server.connect_timeout_secs {
            config.server.connect_timeout = validate_timeout("connect_timeout_secs", secs)?;
        }
        if let Some(user_agent) = server.user_agent {
            let user_agent = user_agent.trim();
            if user_agent.is_empty() {
                return Err(ConfigError::InvalidUserAgent);
            }
            config.server.user_agent = user_agent.to_string();
        }
    }

    if let Some(dispatch) = parsed.dispatch {
        if let Some(delay) = dispatch.default_delay_ms {
            config.dispatch.default_delay_ms = delay;
        }
        if let Some(code) = dispatch.country_code {
            config.dispatch.country_code =
                CountryCode::new(&code).map_err(|_| ConfigError::InvalidCountryCode(code))?;
        }
    }

    Ok(config)
}

fn validate_timeout(field: &'static str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(ConfigError::InvalidTimeout { field, value: secs });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
