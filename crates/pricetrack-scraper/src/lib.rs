pub mod browser;
pub mod error;
pub mod extract;
pub mod matching;
pub mod navigate;
pub mod parse;
pub mod scraper;
pub mod selectors;
pub mod session;
pub mod webdriver;

pub use browser::{wait_until, Browser, Element, Locator, ENTER_KEY};
pub use error::{BrowserError, ScraperError};
pub use extract::{Extractor, Fields};
pub use matching::{FuzzyMatcher, DEFAULT_MATCH_THRESHOLD};
pub use navigate::{Resolution, Resolver, Tier, TierOutcome};
pub use scraper::{ProductSource, Scraper, ScraperOptions};
pub use selectors::Selectors;
pub use session::{with_session, SessionConfig};
pub use webdriver::{WebDriverSession, WebElement};
