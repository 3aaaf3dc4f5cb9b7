use std::time::Duration;

use crate::configuration::Locator;

/// Failure classes of a single page interaction. The pagination driver picks
/// its recovery strategy from the variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("element not found: {0}")]
    Missing(String),
    #[error("stale element reference: {0}")]
    Stale(String),
    #[error("element not interactable: {0}")]
    Obstructed(String),
    #[error("assertion failed: {0}")]
    AssertionFailed(String),
    #[error("browser session error: {0}")]
    Session(String),
}

/// Where the pagination header is looked up, in the order the lookups are
/// attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderLookup {
    Document,
    ResultsTable,
    TotalNumber,
}

impl HeaderLookup {
    pub const ORDER: [HeaderLookup; 3] = [
        HeaderLookup::Document,
        HeaderLookup::ResultsTable,
        HeaderLookup::TotalNumber,
    ];
}

/// The news website as seen by the search controller and the pagination
/// driver. Element handles returned by one call are never reused after the
/// page changes, every call resolves its elements again.
#[allow(async_fn_in_trait)]
pub trait NewsSite {
    type Item: NewsItem;

    async fn open(&self, url: &str) -> Result<(), DomError>;

    async fn reload(&self) -> Result<(), DomError>;

    /// Fails with [`DomError::AssertionFailed`] when the element is not
    /// visible before `timeout`.
    async fn wait_until_visible(&self, locator: &Locator, timeout: Duration)
        -> Result<(), DomError>;

    async fn wait_until_enabled(&self, locator: &Locator, timeout: Duration)
        -> Result<(), DomError>;

    async fn click(&self, locator: &Locator) -> Result<(), DomError>;

    /// Types `text` into the element and presses enter.
    async fn type_and_submit(&self, locator: &Locator, text: &str) -> Result<(), DomError>;

    async fn close_advertisement(&self) -> Result<(), DomError>;

    async fn category_labels(&self) -> Result<Vec<String>, DomError>;

    async fn activate_category(&self, index: usize) -> Result<(), DomError>;

    async fn result_group_count(&self) -> Result<usize, DomError>;

    async fn pagination_text(&self, lookup: HeaderLookup) -> Result<String, DomError>;

    async fn result_items(&self) -> Result<Vec<Self::Item>, DomError>;

    async fn next_page(&self) -> Result<(), DomError>;
}

#[allow(async_fn_in_trait)]
pub trait NewsItem {
    async fn title(&self) -> Result<String, DomError>;

    async fn description(&self) -> Result<String, DomError>;

    async fn date(&self) -> Result<String, DomError>;

    /// Source url of the item's picture, [`DomError::Missing`] if it has none.
    async fn image_source(&self) -> Result<String, DomError>;
}
