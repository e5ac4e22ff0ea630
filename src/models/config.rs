//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::screen::query::FilterSupport;
use crate::screen::stats::StatsStrategy;

fn default_page_size() -> u32 {
    10
}

fn default_timeout() -> u64 {
    15
}

fn default_screen_capacity() -> usize {
    10_000
}

fn default_screen_idle() -> u64 {
    8 * 60 * 60
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Per-resource behaviour of a list screen.
pub struct ScreenSettings {
    pub page_size: u32,
    pub filtering: FilterSupport,
    pub stats: StatsStrategy,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            filtering: FilterSupport::default(),
            stats: StatsStrategy::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Base URL of the REST backend, e.g. `http://localhost:3000/api`.
    pub api_base_url: String,
    /// Identity service the login page links to.
    pub auth_service_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Most list screens kept per resource across sessions.
    #[serde(default = "default_screen_capacity")]
    pub screen_capacity: usize,
    /// Seconds after which an untouched screen may be evicted.
    #[serde(default = "default_screen_idle")]
    pub screen_idle_secs: u64,
    #[serde(default)]
    pub users: ScreenSettings,
    #[serde(default)]
    pub contexts: ScreenSettings,
}
