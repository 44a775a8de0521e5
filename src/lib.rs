// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod obstacle;
pub mod parsers;
pub mod results;
pub mod sink;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{FlushPolicy, HarvestConfig};
pub use error::{HarvestError, Result};
pub use results::{CrawlReport, PublicationRecord};

use config::Credentials;
use crawlers::{CrawlController, ListingBrowser, StdinGate, WebBrowser};
use sink::CsvCheckpointSink;
use std::path::PathBuf;

/// Main builder for a harvest run
pub struct Harvest {
    config: HarvestConfig,
    credentials: Option<Credentials>,
}

impl Harvest {
    /// Create a new Harvest builder with the given configuration
    ///
    /// `WEBDRIVER_URL` overrides the configured WebDriver address.
    pub fn new(mut config: HarvestConfig) -> Self {
        config.apply_env();
        Self {
            config,
            credentials: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(HarvestConfig::from_file(path)?))
    }

    /// Set the organization whose listing is crawled
    pub fn with_org_id(mut self, org_id: u64) -> Self {
        self.config.org_id = org_id;
        self
    }

    /// Set the first page to extract
    pub fn with_start_page(mut self, page: u32) -> Self {
        self.config.start_page = page;
        self
    }

    /// Set the last page to extract
    pub fn with_target_page(mut self, page: u32) -> Self {
        self.config.target_page = page;
        self
    }

    /// Set the pause after every pagination click
    pub fn with_inter_page_delay(mut self, seconds: u64) -> Self {
        self.config.inter_page_delay_secs = seconds;
        self
    }

    /// Set the directory that receives checkpoint files
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.config.flush_policy = policy;
        self
    }

    /// Use these credentials for the login form
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Point the crawl at a specific WebDriver server
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.webdriver_url = url.into();
        self
    }

    /// Open the browser session, log in, and crawl to the target page
    ///
    /// The session is closed once the crawl ends, whether or not it succeeded.
    pub async fn run(self) -> Result<CrawlReport> {
        self.config.validate()?;
        let config = self.config;

        ::log::info!(
            "Harvesting org {} pages {}..={} into {}",
            config.org_id,
            config.start_page,
            config.target_page,
            config.output_dir.display()
        );

        let browser = WebBrowser::connect(&config).await?;

        match self.credentials.or_else(Credentials::from_env) {
            Some(credentials) => {
                if let Err(e) = browser.login(&config.login, &credentials).await {
                    let _ = browser.close().await;
                    return Err(e);
                }
            }
            None => ::log::warn!(
                "No credentials set (HARVEST_LOGIN / HARVEST_PASSWORD), crawling anonymously"
            ),
        }

        let sink = CsvCheckpointSink::new(&config.output_dir);
        let mut controller = CrawlController::new(&config, browser, sink, StdinGate::new())?;

        let outcome = crawl(&mut controller, &config).await;

        let browser = controller.into_browser();
        if let Err(e) = browser.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }

        outcome
    }
}

/// Place the browser on the start page and run the controller
async fn crawl(
    controller: &mut CrawlController<WebBrowser, CsvCheckpointSink, StdinGate>,
    config: &HarvestConfig,
) -> Result<CrawlReport> {
    controller
        .browser_mut()
        .goto_listing_page(config.org_id, config.start_page)
        .await?;
    controller.run(config.start_page, config.target_page).await
}
