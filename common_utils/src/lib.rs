// common_utils/src/lib.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Cities that have a pre-built result list.
pub const DEFAULT_CITIES: &[&str] = &["New York", "Mallorca", "Kopenhagen"];

/// What the pipeline does when the restriction classifier cannot reach the
/// oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestrictionFailurePolicy {
    /// Abort the search with an error.
    #[default]
    FailClosed,
    /// Treat the query as unrestricted and rank the whole catalog.
    FailOpen,
}

impl FromStr for RestrictionFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-closed" | "closed" => Ok(Self::FailClosed),
            "fail-open" | "open" => Ok(Self::FailOpen),
            other => Err(ConfigError::Invalid {
                key: "HOTEL_SEARCH_RESTRICTION_POLICY",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RestrictionFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailClosed => f.write_str("fail-closed"),
            Self::FailOpen => f.write_str("fail-open"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

// Unified service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub llm: LlmSettings,
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub categories_path: Option<PathBuf>,
    pub restriction_policy: RestrictionFailurePolicy,
    cities: BTreeMap<String, PathBuf>,
}

impl ServiceConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = load_default_config();

        if let Some(url) = lookup("HOTEL_SEARCH_LLM_URL") {
            config.llm.url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("HOTEL_SEARCH_LLM_MODEL") {
            config.llm.model = model;
        }
        config.llm.api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(raw) = lookup("HOTEL_SEARCH_LLM_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "HOTEL_SEARCH_LLM_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.llm.timeout = Duration::from_secs(secs);
        }
        if let Some(addr) = lookup("HOTEL_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(dir) = lookup("HOTEL_SEARCH_DATA_DIR") {
            config.set_data_dir(PathBuf::from(dir));
        }
        config.categories_path = lookup("HOTEL_SEARCH_CATEGORIES").map(PathBuf::from);
        if let Some(raw) = lookup("HOTEL_SEARCH_RESTRICTION_POLICY") {
            config.restriction_policy = raw.parse()?;
        }

        Ok(config)
    }

    /// Result-list path for `city` without its extension; the loader picks
    /// `.csv` or `.json`.
    pub fn catalog_stem(&self, city: &str) -> Option<&PathBuf> {
        self.cities.get(city)
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }

    pub fn set_data_dir(&mut self, data_dir: PathBuf) {
        self.cities = city_table(&data_dir);
        self.data_dir = data_dir;
    }
}

fn city_table(data_dir: &std::path::Path) -> BTreeMap<String, PathBuf> {
    DEFAULT_CITIES
        .iter()
        .map(|city| (city.to_string(), data_dir.join(format!("resultlist_{city}"))))
        .collect()
}

pub fn load_default_config() -> ServiceConfig {
    let data_dir = PathBuf::from("data/hotels");
    ServiceConfig {
        llm: LlmSettings {
            url: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
        },
        bind_addr: "0.0.0.0:8383".to_string(),
        cities: city_table(&data_dir),
        data_dir,
        categories_path: None,
        restriction_policy: RestrictionFailurePolicy::default(),
    }
}

/// Installs the fmt subscriber. `RUST_LOG` wins over `default_directive`.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
