use std::path::PathBuf;

/// Process-level configuration read from the environment.
///
/// Per-user settings that are edited interactively live in the settings
/// file instead; see [`crate::Settings`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Location of the YAML settings file.
    pub settings_path: PathBuf,
    /// WebDriver endpoint (geckodriver, chromedriver, ...).
    pub webdriver_url: String,
    /// Retailer home page opened when the browser session starts.
    pub base_url: String,
    pub log_level: String,
    /// Delay between two checks of a bounded wait.
    pub poll_interval_ms: u64,
}
