//! The browser capability the scraper drives.
//!
//! Resolution and extraction only ever talk to these traits. The WebDriver
//! implementation lives in [`crate::webdriver`]; tests plug in an in-memory
//! page instead.

#![allow(async_fn_in_trait)]

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::BrowserError;

/// WebDriver "Enter" key code, sent through `send_keys` to submit a form.
pub const ENTER_KEY: &str = "\u{e007}";

/// How to find an element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator<'a> {
    Css(&'a str),
    Id(&'a str),
}

impl fmt::Display for Locator<'_> {
    /// Renders the locator as the equivalent CSS selector.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => f.write_str(css),
            Locator::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// A single browser session positioned on one page at a time.
pub trait Browser {
    type Element: Element;

    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    async fn current_url(&self) -> Result<String, BrowserError>;

    /// Returns the first element matching `locator`, or `None` if there is none.
    async fn find(&self, locator: Locator<'_>) -> Result<Option<Self::Element>, BrowserError>;

    /// Returns every element matching `locator` in document order.
    async fn find_all(&self, locator: Locator<'_>) -> Result<Vec<Self::Element>, BrowserError>;
}

/// A handle to an element on the current page.
pub trait Element: Sized {
    async fn find(&self, locator: Locator<'_>) -> Result<Option<Self>, BrowserError>;

    async fn find_all(&self, locator: Locator<'_>) -> Result<Vec<Self>, BrowserError>;

    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError>;

    async fn inner_html(&self) -> Result<String, BrowserError>;

    /// Rendered text of the element and its descendants.
    async fn text(&self) -> Result<String, BrowserError>;

    async fn click(&self) -> Result<(), BrowserError>;

    async fn send_keys(&self, keys: &str) -> Result<(), BrowserError>;
}

/// Polls `check` until it yields a value or `timeout` elapses.
///
/// `check` always runs at least once. A stale element during a check counts
/// as "not ready yet"; any other browser error ends the wait. Returns
/// `Ok(None)` on timeout.
///
/// # Errors
///
/// Propagates the first non-stale [`BrowserError`] returned by `check`.
pub async fn wait_until<T, F, Fut>(
    timeout: Duration,
    poll_interval: Duration,
    mut check: F,
) -> Result<Option<T>, BrowserError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, BrowserError>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match check().await {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) | Err(BrowserError::StaleElement) => {}
            Err(err) => return Err(err),
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(poll_interval.min(deadline - now)).await;
    }
}
