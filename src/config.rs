use crate::error::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What a flush does with the batch afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushPolicy {
    /// Keep the batch: every flush rewrites everything since the segment started
    #[default]
    Cumulative,
    /// Start a fresh batch after every periodic flush
    Delta,
}

/// CSS selectors used to pick apart the listing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One match per listing row
    pub row: String,
    /// Ordinal label inside a row
    pub number: String,
    pub title: String,
    pub authors: String,
    /// The last match inside a row is used
    pub info: String,
    /// Anchor carrying the detail link
    pub link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            row: "table#restab tr[id^=arw]".to_string(),
            number: "b".to_string(),
            title: "span".to_string(),
            authors: "i".to_string(),
            info: "font".to_string(),
            link: "a".to_string(),
        }
    }
}

/// Where the login form lives and how to submit it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub login_field: String,
    pub password_field: String,
    /// Optional "remember me" checkbox, ticked before submitting
    pub remember_checkbox: Option<String>,
    /// Visible text of the submit control
    pub submit_text: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            login_field: "#login".to_string(),
            password_field: "#password".to_string(),
            remember_checkbox: Some("input[type=checkbox]".to_string()),
            submit_text: "Вход".to_string(),
        }
    }
}

/// Account used to open the session
///
/// Read from `HARVEST_LOGIN` / `HARVEST_PASSWORD`, never from the config file.
#[derive(Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn from_env() -> Option<Self> {
        let login = std::env::var("HARVEST_LOGIN").ok()?;
        let password = std::env::var("HARVEST_PASSWORD").ok()?;
        if login.is_empty() {
            return None;
        }
        Some(Self { login, password })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration for a harvest run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Site root; relative detail links are resolved against it
    pub base_url: String,

    /// Path of the paginated listing, relative to `base_url`
    pub listing_path: String,

    /// Organization whose publications are listed
    pub org_id: u64,

    /// First page to extract
    pub start_page: u32,

    /// Last page to extract (inclusive)
    pub target_page: u32,

    /// Pause after every pagination click
    pub inter_page_delay_secs: u64,

    /// Pause after the operator has cleared a challenge
    pub challenge_cooldown_secs: u64,

    /// Flush after every page whose number is a multiple of this
    pub flush_every_n_pages: u32,

    pub flush_policy: FlushPolicy,

    /// Directory receiving checkpoint artifacts
    pub output_dir: PathBuf,

    /// URL for the WebDriver instance
    pub webdriver_url: String,

    /// Regex patterns; a page URL matching any of them is a challenge page
    pub challenge_markers: Vec<String>,

    /// Visible text of the "next page" link
    pub next_page_link_text: String,

    pub selectors: ListingSelectors,

    pub login: LoginConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.elibrary.ru".to_string(),
            listing_path: "org_items.asp".to_string(),
            org_id: 1193,
            start_page: 1,
            target_page: 150,
            inter_page_delay_secs: 10,
            challenge_cooldown_secs: 10,
            flush_every_n_pages: 10,
            flush_policy: FlushPolicy::default(),
            output_dir: PathBuf::from("collected_data"),
            webdriver_url: "http://localhost:4444".to_string(),
            challenge_markers: vec!["page_captcha".to_string()],
            next_page_link_text: "Следующая страница".to_string(),
            selectors: ListingSelectors::default(),
            login: LoginConfig::default(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply `WEBDRIVER_URL` if it is set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    /// Reject settings the controller cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.flush_every_n_pages == 0 {
            return Err(HarvestError::Config(
                "flush_every_n_pages must be at least 1".to_string(),
            ));
        }
        if self.start_page == 0 || self.target_page == 0 {
            return Err(HarvestError::Config("page numbers start at 1".to_string()));
        }
        if self.start_page > self.target_page {
            return Err(HarvestError::Config(format!(
                "start page {} is past target page {}",
                self.start_page, self.target_page
            )));
        }
        url::Url::parse(&self.base_url)?;
        Ok(())
    }

    pub fn inter_page_delay(&self) -> Duration {
        Duration::from_secs(self.inter_page_delay_secs)
    }

    pub fn challenge_cooldown(&self) -> Duration {
        Duration::from_secs(self.challenge_cooldown_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarvestConfig::default();
        assert_eq!(config.target_page, 150);
        assert_eq!(config.flush_every_n_pages, 10);
        assert_eq!(config.inter_page_delay(), Duration::from_secs(10));
        assert_eq!(config.flush_policy, FlushPolicy::Cumulative);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = HarvestConfig::from_json(
            r#"{ "org_id": 42, "target_page": 20, "flush_policy": "delta",
                 "selectors": { "row": "tr.entry" } }"#,
        )
        .unwrap();

        assert_eq!(config.org_id, 42);
        assert_eq!(config.target_page, 20);
        assert_eq!(config.flush_policy, FlushPolicy::Delta);
        assert_eq!(config.selectors.row, "tr.entry");
        assert_eq!(config.selectors.number, "b");
        assert_eq!(config.base_url, "https://www.elibrary.ru");
    }

    #[test]
    fn test_validation() {
        let config = HarvestConfig {
            flush_every_n_pages: 0,
            ..HarvestConfig::default()
        };
        assert!(matches!(config.validate(), Err(HarvestError::Config(_))));

        let config = HarvestConfig {
            start_page: 151,
            ..HarvestConfig::default()
        };
        assert!(matches!(config.validate(), Err(HarvestError::Config(_))));

        let config = HarvestConfig {
            base_url: "not a url".to_string(),
            ..HarvestConfig::default()
        };
        assert!(matches!(config.validate(), Err(HarvestError::Url(_))));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials {
            login: "reader".to_string(),
            password: "hunter2".to_string(),
        };
        let shown = format!("{:?}", credentials);
        assert!(shown.contains("reader"));
        assert!(!shown.contains("hunter2"));
    }
}
