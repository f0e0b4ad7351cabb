//! In-memory browser for the integration tests.
//!
//! Pages are maps from a locator (rendered as CSS) to the nodes it finds.
//! The search bar is always present: text sent to it is accumulated, makes
//! the suggestion overlay registered for that text visible, and `Enter`
//! moves to the search results page for it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use pricetrack_scraper::{
    Browser, BrowserError, Element, Locator, ScraperOptions, Selectors, ENTER_KEY,
};

pub const HOME: &str = "https://www.notino.fr/";

pub const SEL: Selectors = Selectors::NOTINO;

pub fn search_url(query: &str) -> String {
    format!("https://www.notino.fr/search.asp?exps={query}")
}

pub fn fast_options() -> ScraperOptions {
    ScraperOptions {
        wait_timeout: Duration::from_millis(150),
        poll_interval: Duration::from_millis(5),
        ..ScraperOptions::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    attrs: HashMap<String, String>,
    html: String,
    children: HashMap<String, Vec<Node>>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn link(self, href: &str) -> Self {
        self.attr("href", href)
    }

    pub fn child(mut self, locator: Locator<'_>, child: Node) -> Self {
        self.children
            .entry(locator.to_string())
            .or_default()
            .push(child);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: HashMap<String, Vec<Node>>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: Locator<'_>, node: Node) -> Self {
        self.elements
            .entry(locator.to_string())
            .or_default()
            .push(node);
        self
    }

    fn nodes(&self, key: &str) -> Vec<Node> {
        self.elements.get(key).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
struct Overlay {
    page: Page,
    visible_after: usize,
}

#[derive(Debug, Default)]
struct State {
    url: String,
    pages: HashMap<String, Page>,
    overlays: HashMap<String, Overlay>,
    typed: String,
    lookups_since_typing: usize,
    visited: Vec<String>,
    clicked: Vec<String>,
}

#[derive(Clone)]
pub struct FakeBrowser {
    state: Arc<Mutex<State>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        let state = State {
            url: HOME.to_string(),
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn page(self, url: &str, page: Page) -> Self {
        self.lock().pages.insert(url.to_string(), page);
        self
    }

    /// Shows `page` as an overlay once exactly `query` has been typed.
    pub fn suggestions(self, query: &str, page: Page) -> Self {
        self.slow_suggestions(query, page, 0)
    }

    /// Like [`FakeBrowser::suggestions`], but the overlay stays empty for
    /// the first `visible_after` lookups.
    pub fn slow_suggestions(self, query: &str, page: Page, visible_after: usize) -> Self {
        self.lock().overlays.insert(
            query.to_string(),
            Overlay {
                page,
                visible_after,
            },
        );
        self
    }

    pub fn results(self, query: &str, page: Page) -> Self {
        self.page(&search_url(query), page)
    }

    pub fn at(self, url: &str) -> Self {
        self.lock().url = url.to_string();
        self
    }

    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }

    pub fn clicked(&self) -> Vec<String> {
        self.lock().clicked.clone()
    }

    pub fn typed(&self) -> String {
        self.lock().typed.clone()
    }

    fn lookup(&self, locator: Locator<'_>) -> Vec<FakeElement> {
        let key = locator.to_string();
        if key == SEL.search_bar.to_string() {
            return vec![self.element(Node::new(), true)];
        }

        let mut state = self.lock();
        let mut nodes = state
            .pages
            .get(&state.url)
            .map(|page| page.nodes(&key))
            .unwrap_or_default();

        if !state.typed.is_empty() {
            state.lookups_since_typing += 1;
            if let Some(overlay) = state.overlays.get(&state.typed) {
                if state.lookups_since_typing > overlay.visible_after {
                    nodes.extend(overlay.page.nodes(&key));
                }
            }
        }
        drop(state);

        nodes
            .into_iter()
            .map(|node| self.element(node, false))
            .collect()
    }

    fn element(&self, node: Node, search_bar: bool) -> FakeElement {
        FakeElement {
            node,
            search_bar,
            state: Arc::clone(&self.state),
        }
    }

    fn navigate(state: &mut State, url: String) {
        state.visited.push(url.clone());
        state.url = url;
        state.typed.clear();
        state.lookups_since_typing = 0;
    }
}

impl Browser for FakeBrowser {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        Self::navigate(&mut self.lock(), url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        Ok(self.lock().url.clone())
    }

    async fn find(&self, locator: Locator<'_>) -> Result<Option<FakeElement>, BrowserError> {
        Ok(self.lookup(locator).into_iter().next())
    }

    async fn find_all(&self, locator: Locator<'_>) -> Result<Vec<FakeElement>, BrowserError> {
        Ok(self.lookup(locator))
    }
}

pub struct FakeElement {
    node: Node,
    search_bar: bool,
    state: Arc<Mutex<State>>,
}

impl FakeElement {
    fn children(&self, locator: Locator<'_>) -> Vec<FakeElement> {
        self.node
            .children
            .get(&locator.to_string())
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|node| FakeElement {
                node,
                search_bar: false,
                state: Arc::clone(&self.state),
            })
            .collect()
    }
}

impl Element for FakeElement {
    async fn find(&self, locator: Locator<'_>) -> Result<Option<Self>, BrowserError> {
        Ok(self.children(locator).into_iter().next())
    }

    async fn find_all(&self, locator: Locator<'_>) -> Result<Vec<Self>, BrowserError> {
        Ok(self.children(locator))
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(self.node.attrs.get(name).cloned())
    }

    async fn inner_html(&self) -> Result<String, BrowserError> {
        Ok(self.node.html.clone())
    }

    async fn text(&self) -> Result<String, BrowserError> {
        let mut text = String::new();
        let mut in_tag = false;
        for c in self.node.html.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        Ok(text)
    }

    async fn click(&self) -> Result<(), BrowserError> {
        self.state.lock().unwrap().clicked.push(self.node.html.clone());
        Ok(())
    }

    async fn send_keys(&self, keys: &str) -> Result<(), BrowserError> {
        if !self.search_bar {
            return Ok(());
        }
        let mut state = self.state.lock().unwrap();
        if keys == ENTER_KEY {
            let url = search_url(&state.typed);
            FakeBrowser::navigate(&mut state, url);
        } else {
            state.typed.push_str(keys);
            state.lookups_since_typing = 0;
        }
        Ok(())
    }
}

/// A product page with the header fields filled in.
pub fn product_page(name: &str, brand: &str, description: &str) -> Page {
    Page::new()
        .with(SEL.product_name, Node::new().html(name))
        .with(SEL.brand, Node::new().html(brand))
        .with(SEL.description, Node::new().html(description))
}

/// A primary suggestion entry labelled `label` linking to `href`.
pub fn primary_entry(label: &str, href: &str) -> Node {
    Node::new()
        .link(href)
        .child(SEL.primary_suggestion_label, Node::new().html(label))
}
