use crate::error::{Error, Result};
use directories::ProjectDirs;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 100;

const QUALIFIER: &str = "com";
const ORG: &str = "jobcompass";
const APP: &str = "job-compass";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub storage_path: PathBuf,
    pub page_size: usize,
    pub http_timeout: Option<Duration>,
    pub log_format: LogFormat,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let api_url = env::var("JOB_COMPASS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let storage_path = match env::var("JOB_COMPASS_STORAGE_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_storage_path()?,
        };

        Ok(Self {
            api_url: parse_api_url(&api_url)?,
            storage_path,
            page_size: get_env_parse_or("JOB_COMPASS_PAGE_SIZE", DEFAULT_PAGE_SIZE)?
                .clamp(1, MAX_PAGE_SIZE),
            http_timeout: get_env_parse_opt::<u64>("JOB_COMPASS_HTTP_TIMEOUT_SECS")?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            log_format: get_env_parse_or("JOB_COMPASS_LOG_FORMAT", LogFormat::Text)?,
        })
    }

    /// Configuration pointing at an explicit gateway and storage file.
    pub fn new(api_url: &str, storage_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            storage_path: storage_path.into(),
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout: None,
            log_format: LogFormat::Text,
        })
    }
}

/// Endpoint paths are joined onto the base, so the base must end with `/`.
fn parse_api_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized)
        .map_err(|e| Error::Config(format!("Invalid value for JOB_COMPASS_API_URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Config(format!(
            "Unsupported scheme for JOB_COMPASS_API_URL: {}",
            other
        ))),
    }
}

fn default_storage_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from(QUALIFIER, ORG, APP)
        .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;
    Ok(dirs.data_dir().join("session.json"))
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

/// Unset or blank is `None`; anything else must parse.
fn get_env_parse_opt<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => get_env_parse(name).map(Some),
        _ => Ok(None),
    }
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(get_env_parse_opt(name)?.unwrap_or(default))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
