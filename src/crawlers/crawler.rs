use crate::error::Result;
use async_trait::async_trait;

/// A logged-in browsing context positioned on the listing
///
/// The controller only ever reads the current page and asks for the next
/// one; how pages are fetched and rendered is up to the implementation.
#[async_trait]
pub trait ListingBrowser: Send {
    /// Rendered markup of the current page
    async fn current_content(&mut self) -> Result<String>;

    /// Address of the current page
    async fn current_location(&mut self) -> Result<String>;

    /// Open page `page` of the listing for `org_id`
    async fn goto_listing_page(&mut self, org_id: u64, page: u32) -> Result<()>;

    /// Follow the listing's "next page" control
    async fn click_next_page(&mut self) -> Result<()>;
}

/// Hands control to a human until a challenge has been cleared
#[async_trait]
pub trait InterventionGate: Send {
    /// Resolves once the operator reports the challenge on `page` as solved
    async fn await_resolution(&mut self, page: u32) -> Result<()>;
}
