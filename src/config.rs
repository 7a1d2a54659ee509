use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::frontier::DEFAULT_MAX_ATTEMPTS;

/// Configuration for one crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Keyword to search for; required and must be non-blank
    pub keyword: String,

    /// Maximum number of concurrent workers
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Render attempts per item before it is reported as failed
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay after navigation before extraction, in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Bounded wait for a stage's primary container, in milliseconds
    #[serde(default = "default_element_wait_ms")]
    pub element_wait_ms: u64,
}

impl CrawlConfig {
    /// Create a configuration with default values for everything but the
    /// keyword
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            max_concurrency: default_max_concurrency(),
            webdriver_url: default_webdriver_url(),
            max_attempts: default_max_attempts(),
            settle_delay_ms: default_settle_delay_ms(),
            element_wait_ms: default_element_wait_ms(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Validate the run input before anything is crawled
    ///
    /// A missing or blank keyword is a fatal startup error, not a per-item
    /// failure.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.keyword.trim().is_empty() {
            return Err("a non-empty search keyword is required".into());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be at least 1".into());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".into());
        }
        Ok(())
    }
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    4
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default render attempts per item
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

/// Default settle delay after navigation
fn default_settle_delay_ms() -> u64 {
    1000
}

/// Default bounded wait for a stage's container
fn default_element_wait_ms() -> u64 {
    10000
}
