use serde::{Deserialize, Deserializer, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jackett: JackettConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub streams: StreamsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration (stream cache)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("godon.db")
}

/// Jackett search backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JackettConfig {
    /// Jackett server URL (e.g., "http://localhost:9117")
    pub url: String,
    /// Jackett API key
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_jackett_timeout")]
    pub timeout_secs: u32,
    /// Indexer to query; "all" fans out inside Jackett itself
    #[serde(default = "default_indexer")]
    pub indexer: String,
}

fn default_jackett_timeout() -> u32 {
    30
}

fn default_indexer() -> String {
    "all".to_string()
}

/// Title/year metadata and id mapping endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    #[serde(default = "default_cinemeta_url")]
    pub cinemeta_url: String,
    #[serde(default = "default_kitsu_url")]
    pub kitsu_url: String,
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            cinemeta_url: default_cinemeta_url(),
            kitsu_url: default_kitsu_url(),
            timeout_secs: default_metadata_timeout(),
        }
    }
}

fn default_cinemeta_url() -> String {
    "https://v3-cinemeta.strem.io".to_string()
}

fn default_kitsu_url() -> String {
    "https://anime-kitsu.strem.fun".to_string()
}

fn default_metadata_timeout() -> u64 {
    10
}

/// Pipeline tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Maximum number of ranked candidates inspected per request.
    /// Non-positive, missing or non-numeric values disable the cap.
    #[serde(default, deserialize_with = "deserialize_result_cap")]
    pub max_results: Option<i64>,
    /// Upper bound for each indexer query
    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,
    /// Upper bound for each torrent file listing
    #[serde(default = "default_content_timeout")]
    pub content_timeout_secs: u64,
    /// Upper bound for the id translation and title lookups
    #[serde(default = "default_resolver_metadata_timeout")]
    pub metadata_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_results: None,
            search_timeout_secs: default_search_timeout(),
            content_timeout_secs: default_content_timeout(),
            metadata_timeout_secs: default_resolver_metadata_timeout(),
        }
    }
}

impl ResolverConfig {
    /// The effective cap, if any.
    pub fn result_cap(&self) -> Option<usize> {
        self.max_results
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
    }
}

fn default_search_timeout() -> u64 {
    30
}

fn default_content_timeout() -> u64 {
    60
}

fn default_resolver_metadata_timeout() -> u64 {
    15
}

/// Accepts integers and numeric strings. Anything else means "no cap".
fn deserialize_result_cap<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCap {
        Int(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RawCap>::deserialize(deserializer)? {
        Some(RawCap::Int(n)) => Some(n),
        Some(RawCap::Text(s)) => s.trim().parse().ok(),
        Some(RawCap::Other(_)) | None => None,
    })
}

/// Embedded librqbit session used to list magnet contents
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    /// Session output folder. Nothing is downloaded there in list-only mode.
    #[serde(default = "default_session_dir")]
    pub session_dir: PathBuf,
    #[serde(default)]
    pub disable_dht: bool,
    #[serde(default)]
    pub listen_port_start: Option<u16>,
    #[serde(default)]
    pub listen_port_end: Option<u16>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            session_dir: default_session_dir(),
            disable_dht: false,
            listen_port_start: None,
            listen_port_end: None,
        }
    }
}

fn default_session_dir() -> PathBuf {
    PathBuf::from("/tmp/godon")
}

/// Playback hints attached to every stream
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamsConfig {
    #[serde(default = "default_binge_group_prefix")]
    pub binge_group_prefix: String,
    #[serde(default = "default_country_whitelist")]
    pub country_whitelist: Vec<String>,
}

impl Default for StreamsConfig {
    fn default() -> Self {
        Self {
            binge_group_prefix: default_binge_group_prefix(),
            country_whitelist: default_country_whitelist(),
        }
    }
}

fn default_binge_group_prefix() -> String {
    "group-".to_string()
}

fn default_country_whitelist() -> Vec<String> {
    vec!["en".to_string()]
}
