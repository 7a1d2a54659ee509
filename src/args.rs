use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "offer-scout")]
#[command(about = "Crawls keyword search results and merges per-product offer listings")]
#[command(version)]
pub struct Args {
    /// Search keyword to start the crawl from
    pub keyword: String,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 4)]
    pub concurrency: usize,

    /// WebDriver server URL (the WEBDRIVER_URL environment variable takes
    /// precedence)
    #[arg(long, default_value = "http://localhost:4444")]
    pub webdriver_url: String,

    /// Render attempts per page before it is reported as failed
    #[arg(long, default_value_t = 4)]
    pub max_attempts: u32,

    /// Settle delay after navigation, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub settle_delay_ms: u64,

    /// Write records to this file as JSON lines instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
