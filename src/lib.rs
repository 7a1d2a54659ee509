// Re-export modules
pub mod config;
pub mod extractors;
pub mod frontier;
pub mod items;
pub mod records;
pub mod renderer;
pub mod router;
pub mod workers;

// Re-export commonly used types for convenience
pub use items::WorkItem;
pub use records::{Offer, OutputRecord, ProductRecord};

use config::CrawlConfig;
use tokio::sync::mpsc;

/// Builder for configuring and running one keyword crawl
///
/// ```no_run
/// use offer_scout::Crawl;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let mut records = Crawl::new("widget").with_max_concurrency(2).run().await?;
/// while let Some(record) = records.recv().await {
///     println!("{}", serde_json::to_string(&record)?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Crawl {
    config: CrawlConfig,
}

impl Crawl {
    /// Create a new crawl for the given search keyword
    pub fn new(keyword: &str) -> Self {
        Self {
            config: CrawlConfig::new(keyword),
        }
    }

    /// Use a fully specified configuration
    pub fn with_config(config: CrawlConfig) -> Self {
        Self { config }
    }

    /// Set the maximum number of concurrent workers
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Set the WebDriver server URL
    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.config.webdriver_url = webdriver_url.to_string();
        self
    }

    /// Set the render attempts allowed per item before it is reported as
    /// failed
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.max_attempts = max_attempts;
        self
    }

    /// Set the fixed post-navigation settle delay in milliseconds
    pub fn with_settle_delay_ms(mut self, settle_delay_ms: u64) -> Self {
        self.config.settle_delay_ms = settle_delay_ms;
        self
    }

    /// Start the crawl and get a receiver for output records
    ///
    /// Validates the run input first; an empty keyword fails here, before
    /// any work is queued. The receiver yields product records, no-results
    /// status rows, and failure rows until the frontier drains.
    pub async fn run(mut self) -> Result<mpsc::Receiver<OutputRecord>, Box<dyn std::error::Error>> {
        self.config.validate()?;

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.config.webdriver_url = webdriver_url;
            }
        }

        Ok(workers::start(&self.config).await)
    }
}
