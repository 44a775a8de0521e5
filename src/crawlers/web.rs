use crate::config::{Credentials, HarvestConfig, LoginConfig};
use crate::crawlers::crawler::{InterventionGate, ListingBrowser};
use crate::error::{HarvestError, Result};
use crate::utils;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

/// WebDriver-backed browsing session
pub struct WebBrowser {
    client: Client,
    base_url: String,
    listing_path: String,
    next_page_link_text: String,
}

impl WebBrowser {
    /// Open a new WebDriver session
    pub async fn connect(config: &HarvestConfig) -> Result<Self> {
        let client = connect_to_webdriver(&config.webdriver_url).await?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            listing_path: config.listing_path.clone(),
            next_page_link_text: config.next_page_link_text.clone(),
        })
    }

    /// Sign in through the site's login form
    pub async fn login(&self, form: &LoginConfig, credentials: &Credentials) -> Result<()> {
        ::log::info!("Logging in as {}", credentials.login);
        self.client
            .goto(&self.base_url)
            .await
            .map_err(|e| command_error(e, "opening", &self.base_url))?;

        let login_field = self.client.find(Locator::Css(&form.login_field)).await?;
        login_field.click().await?;
        login_field.send_keys(&credentials.login).await?;

        let password_field = self.client.find(Locator::Css(&form.password_field)).await?;
        password_field.click().await?;
        password_field.send_keys(&credentials.password).await?;

        if let Some(checkbox) = &form.remember_checkbox {
            match self.client.find(Locator::Css(checkbox)).await {
                Ok(element) => element.click().await?,
                Err(e) => ::log::warn!("Remember-me checkbox not found: {}", e),
            }
        }

        let submit_xpath = format!("//*[normalize-space(text())='{}']", form.submit_text);
        self.client
            .find(Locator::XPath(&submit_xpath))
            .await?
            .click()
            .await?;

        ::log::debug!("Login form submitted");
        Ok(())
    }

    /// End the WebDriver session
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl ListingBrowser for WebBrowser {
    async fn current_content(&mut self) -> Result<String> {
        self.client
            .source()
            .await
            .map_err(|e| command_error(e, "getting source for", "current page"))
    }

    async fn current_location(&mut self) -> Result<String> {
        let url = self
            .client
            .current_url()
            .await
            .map_err(|e| command_error(e, "reading location of", "current page"))?;
        Ok(url.to_string())
    }

    async fn goto_listing_page(&mut self, org_id: u64, page: u32) -> Result<()> {
        let url = utils::listing_page_url(&self.base_url, &self.listing_path, org_id, page)?;
        ::log::info!("Opening listing page {}: {}", page, url);
        self.client
            .goto(url.as_str())
            .await
            .map_err(|e| command_error(e, "accessing", url.as_str()))
    }

    async fn click_next_page(&mut self) -> Result<()> {
        self.client
            .find(Locator::LinkText(&self.next_page_link_text))
            .await
            .map_err(|e| command_error(e, "finding", "next page link"))?
            .click()
            .await
            .map_err(|e| command_error(e, "clicking", "next page link"))
    }
}

/// Asks the operator on the terminal to clear the challenge in the browser window
pub struct StdinGate {
    reader: BufReader<Stdin>,
}

impl StdinGate {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
        }
    }
}

impl Default for StdinGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InterventionGate for StdinGate {
    async fn await_resolution(&mut self, page: u32) -> Result<()> {
        println!(
            "Challenge on page {}: solve it in the browser, then press ENTER",
            page
        );
        let mut line = String::new();
        self.reader.read_line(&mut line).await?;
        ::log::info!("Operator reported challenge on page {} as solved", page);
        Ok(())
    }
}

/// Connects to the WebDriver instance, falling back to the usual local ports
async fn connect_to_webdriver(webdriver_url: &str) -> Result<Client> {
    let first_error = match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                webdriver_url,
                e
            );
            e
        }
    };

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // geckodriver / Selenium default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(HarvestError::Session(first_error))
}

/// Log a failed WebDriver command with what was being attempted
fn command_error(error: fantoccini::error::CmdError, context: &str, target: &str) -> HarvestError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, target);
    } else {
        ::log::error!("Failed {} {}: {}", context, target, error);
    }
    HarvestError::Browser(error)
}
