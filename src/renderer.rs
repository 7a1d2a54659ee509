use fantoccini::{Client, ClientBuilder, Locator};
use std::time::Duration;
use tokio::time::sleep;

use crate::items::WorkItem;

/// WebDriver-backed page renderer
///
/// Owns one browser session. Rendering navigates to the item's URL, observes
/// a fixed settle delay so deferred content can load, waits (bounded) for the
/// stage's primary container, and returns the page source. The element wait
/// timing out is tolerated; the extractors degrade gracefully on whatever
/// HTML came back.
pub struct WebDriverRenderer {
    client: Client,
    settle_delay: Duration,
    element_wait: Duration,
}

impl WebDriverRenderer {
    /// Connect to a WebDriver server, trying common fallback addresses if
    /// the configured one is unreachable
    pub async fn connect(
        webdriver_url: &str,
        settle_delay: Duration,
        element_wait: Duration,
    ) -> Option<Self> {
        let client = connect_with_fallbacks(webdriver_url).await?;
        Some(Self {
            client,
            settle_delay,
            element_wait,
        })
    }

    /// Navigate to the item's URL and return the rendered page source
    ///
    /// Errors here are transient fetch failures; the caller feeds them to
    /// the frontier's retry accounting.
    pub async fn render(&self, item: &WorkItem) -> Result<String, fantoccini::error::CmdError> {
        self.client.goto(item.url()).await?;

        // Fixed settle delay, not a retry: give the page a moment to finish
        // deferred rendering before we start waiting on selectors.
        sleep(self.settle_delay).await;

        if let Err(e) = self
            .client
            .wait()
            .at_most(self.element_wait)
            .for_element(Locator::Css(item.wait_selector()))
            .await
        {
            ::log::warn!(
                "Container {} did not appear on {}: {}",
                item.wait_selector(),
                item.url(),
                e
            );
        }

        self.client.source().await
    }

    /// Close the browser session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }
}

/// Tries the configured WebDriver URL first, then a short ladder of common
/// local defaults
async fn connect_with_fallbacks(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://127.0.0.1:4444", // Try with IP instead of localhost
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!("Failed to connect to any WebDriver server");
    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}
