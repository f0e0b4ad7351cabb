//! [`Browser`] backed by a WebDriver server through `fantoccini`.

use fantoccini::elements::Element as WdElement;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;

use crate::browser::{Browser, Element, Locator};
use crate::error::BrowserError;

impl<'a> From<Locator<'a>> for fantoccini::Locator<'a> {
    fn from(locator: Locator<'a>) -> Self {
        match locator {
            Locator::Css(css) => fantoccini::Locator::Css(css),
            Locator::Id(id) => fantoccini::Locator::Id(id),
        }
    }
}

fn command_error(err: CmdError) -> BrowserError {
    if let CmdError::Standard(wd) = &err {
        if matches!(wd.error, ErrorStatus::StaleElementReference) {
            return BrowserError::StaleElement;
        }
    }
    BrowserError::Command(err.to_string())
}

fn found<T>(result: Result<T, CmdError>) -> Result<Option<T>, BrowserError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_no_such_element() => Ok(None),
        Err(e) => Err(command_error(e)),
    }
}

/// Candidate addresses for a configured home page: the value itself when it
/// carries a scheme, otherwise an `https://` address, adding `www.` for bare
/// domains.
#[must_use]
pub fn home_urls(base_url: &str) -> Vec<String> {
    let base = base_url.trim();
    if base.contains("://") {
        return vec![base.to_string()];
    }
    if base.starts_with("www.") {
        vec![format!("https://{base}")]
    } else {
        vec![format!("https://www.{base}"), format!("https://{base}")]
    }
}

/// One browser session. Close it with [`WebDriverSession::close`]; dropping
/// it leaves the remote window open until the server times it out.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Starts a new session on the WebDriver server at `webdriver_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Connect`] when the server is unreachable or
    /// refuses the session.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, BrowserError> {
        let mut capabilities = serde_json::Map::new();
        if headless {
            capabilities.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
            capabilities.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new"] }),
            );
        }

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(webdriver_url)
            .await
            .map_err(|e| BrowserError::Connect {
                url: webdriver_url.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(webdriver_url, headless, "browser session started");
        Ok(Self { client })
    }

    /// Opens the retailer home page, trying each of [`home_urls`] in turn.
    ///
    /// # Errors
    ///
    /// Returns the error of the last candidate when none loads.
    pub async fn open_home(&self, base_url: &str) -> Result<(), BrowserError> {
        let mut last_err = BrowserError::Command(format!("no usable address in {base_url:?}"));
        for url in home_urls(base_url) {
            match self.goto(&url).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!(url, error = %e, "home page candidate failed");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    /// Ends the session and closes the browser window.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Command`] if the server rejects the request.
    pub async fn close(self) -> Result<(), BrowserError> {
        self.client.close().await.map_err(command_error)
    }
}

impl Browser for WebDriverSession {
    type Element = WebElement;

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.client.goto(url).await.map_err(command_error)
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(command_error)
    }

    async fn find(&self, locator: Locator<'_>) -> Result<Option<WebElement>, BrowserError> {
        Ok(found(self.client.find(locator.into()).await)?.map(WebElement))
    }

    async fn find_all(&self, locator: Locator<'_>) -> Result<Vec<WebElement>, BrowserError> {
        let elements = self
            .client
            .find_all(locator.into())
            .await
            .map_err(command_error)?;
        Ok(elements.into_iter().map(WebElement).collect())
    }
}

pub struct WebElement(WdElement);

impl Element for WebElement {
    async fn find(&self, locator: Locator<'_>) -> Result<Option<Self>, BrowserError> {
        Ok(found(self.0.find(locator.into()).await)?.map(WebElement))
    }

    async fn find_all(&self, locator: Locator<'_>) -> Result<Vec<Self>, BrowserError> {
        let elements = self
            .0
            .find_all(locator.into())
            .await
            .map_err(command_error)?;
        Ok(elements.into_iter().map(WebElement).collect())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError> {
        self.0.attr(name).await.map_err(command_error)
    }

    async fn inner_html(&self) -> Result<String, BrowserError> {
        self.0.html(true).await.map_err(command_error)
    }

    async fn text(&self) -> Result<String, BrowserError> {
        self.0.text().await.map_err(command_error)
    }

    async fn click(&self) -> Result<(), BrowserError> {
        self.0.click().await.map_err(command_error)
    }

    async fn send_keys(&self, keys: &str) -> Result<(), BrowserError> {
        self.0.send_keys(keys).await.map_err(command_error)
    }
}
