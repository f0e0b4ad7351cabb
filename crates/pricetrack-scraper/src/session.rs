use crate::error::BrowserError;
use crate::webdriver::WebDriverSession;

/// Where and how to start the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub webdriver_url: String,
    pub base_url: String,
    pub headless: bool,
}

/// Runs `body` against a fresh browser session positioned on the retailer
/// home page, then closes the session whatever `body` returned.
///
/// # Errors
///
/// Returns the session start-up error, or whatever `body` returns. A
/// failure to close the session is only logged.
pub async fn with_session<T, E, F>(config: &SessionConfig, body: F) -> Result<T, E>
where
    F: AsyncFnOnce(&WebDriverSession) -> Result<T, E>,
    E: From<BrowserError>,
{
    let session = WebDriverSession::connect(&config.webdriver_url, config.headless).await?;

    let result = match session.open_home(&config.base_url).await {
        Ok(()) => body(&session).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "failed to close browser session");
    }
    result
}
