//! Finding a product page from a free-text query.
//!
//! The query is typed into the site's search bar, then three sources are
//! tried in order:
//!
//! 1. the primary suggestion list (product entries), waited on until it
//!    shows a matching first entry;
//! 2. the secondary suggestion list (section links), checked once;
//! 3. the full search results page, after submitting the search.
//!
//! The first source that yields a matching entry wins and the browser is
//! sent to its target.

use std::time::Duration;

use crate::browser::{wait_until, Browser, Element, ENTER_KEY};
use crate::error::{BrowserError, ScraperError};
use crate::matching::FuzzyMatcher;
use crate::parse::clean_text;
use crate::selectors::Selectors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    PrimarySuggestions,
    SecondarySuggestions,
    SearchResults,
}

impl Tier {
    pub const ALL: [Tier; 3] = [
        Tier::PrimarySuggestions,
        Tier::SecondarySuggestions,
        Tier::SearchResults,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierOutcome {
    Found(String),
    /// The tier had entries, but none matched the query.
    NotFound,
    /// The tier never finished loading within the wait budget.
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub url: String,
    pub tier: Tier,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    selectors: Selectors,
    matcher: FuzzyMatcher,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl Resolver {
    #[must_use]
    pub fn new(
        selectors: Selectors,
        matcher: FuzzyMatcher,
        wait_timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            selectors,
            matcher,
            wait_timeout,
            poll_interval,
        }
    }

    /// Types `query` into the search bar and navigates to the first
    /// matching product page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingElement`] if the page has no search bar.
    /// - [`ScraperError::ProductNotFound`] if no tier produced a match.
    /// - [`ScraperError::Browser`] on any WebDriver failure.
    pub async fn resolve<B: Browser>(
        &self,
        browser: &B,
        query: &str,
    ) -> Result<Resolution, ScraperError> {
        let search_bar = browser.find(self.selectors.search_bar).await?.ok_or_else(|| {
            ScraperError::MissingElement {
                locator: self.selectors.search_bar.to_string(),
            }
        })?;
        search_bar.send_keys(query).await?;

        for tier in Tier::ALL {
            let outcome = match tier {
                Tier::PrimarySuggestions => self.primary_suggestions(browser, query).await?,
                Tier::SecondarySuggestions => self.secondary_suggestions(browser, query).await?,
                Tier::SearchResults => self.search_results(browser, &search_bar, query).await?,
            };
            tracing::debug!(query, ?tier, ?outcome, "resolution tier finished");

            if let TierOutcome::Found(url) = outcome {
                browser.goto(&url).await?;
                return Ok(Resolution { url, tier });
            }
        }

        Err(ScraperError::ProductNotFound {
            query: query.to_string(),
        })
    }

    async fn primary_suggestions<B: Browser>(
        &self,
        browser: &B,
        query: &str,
    ) -> Result<TierOutcome, BrowserError> {
        let found = wait_until(self.wait_timeout, self.poll_interval, move || {
            self.matching_primary_suggestion(browser, query)
        })
        .await?;

        Ok(found.map_or(TierOutcome::Timeout, TierOutcome::Found))
    }

    /// One check of the primary list: ready once its first entry carries a
    /// label matching `query` and a link.
    async fn matching_primary_suggestion<B: Browser>(
        &self,
        browser: &B,
        query: &str,
    ) -> Result<Option<String>, BrowserError> {
        let entries = browser.find_all(self.selectors.primary_suggestions).await?;
        let Some(first) = entries.first() else {
            return Ok(None);
        };
        let Some(label) = first.find(self.selectors.primary_suggestion_label).await? else {
            return Ok(None);
        };
        if !self.matcher.matches(&clean_text(&label.inner_html().await?), query) {
            return Ok(None);
        }
        first.attr("href").await
    }

    async fn secondary_suggestions<B: Browser>(
        &self,
        browser: &B,
        query: &str,
    ) -> Result<TierOutcome, BrowserError> {
        let Some(column) = browser.find(self.selectors.secondary_suggestions).await? else {
            return Ok(TierOutcome::NotFound);
        };
        let entries = column.find_all(self.selectors.secondary_suggestion_entry).await?;
        let Some(first) = entries.first() else {
            return Ok(TierOutcome::NotFound);
        };

        let mut labels = Vec::with_capacity(2);
        if let Some(span) = first.find(self.selectors.secondary_suggestion_label).await? {
            labels.push(span.inner_html().await?);
        }
        labels.push(first.inner_html().await?);

        if !labels
            .iter()
            .any(|label| self.matcher.matches(&clean_text(label), query))
        {
            return Ok(TierOutcome::NotFound);
        }

        Ok(first
            .attr("href")
            .await?
            .map_or(TierOutcome::NotFound, TierOutcome::Found))
    }

    async fn search_results<B: Browser>(
        &self,
        browser: &B,
        search_bar: &B::Element,
        query: &str,
    ) -> Result<TierOutcome, BrowserError> {
        search_bar.send_keys(ENTER_KEY).await?;

        let results = self.selectors.search_results;
        let loaded = wait_until(self.wait_timeout, self.poll_interval, move || async move {
            Ok(browser.find(results).await?.map(|_| ()))
        })
        .await?;
        if loaded.is_none() {
            return Ok(TierOutcome::Timeout);
        }

        for container in browser.find_all(results).await? {
            let Some(title) = container.find(self.selectors.search_result_title).await? else {
                continue;
            };
            if !self.matcher.matches(&clean_text(&title.inner_html().await?), query) {
                continue;
            }
            if let Some(href) = container.attr("href").await? {
                return Ok(TierOutcome::Found(href));
            }
        }

        Ok(TierOutcome::NotFound)
    }
}
