//! Page structure of the retailer site.
//!
//! Every lookup the resolver and extractor perform goes through one of these
//! locators, so a markup change on the site is a change here only.

use crate::browser::Locator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selectors {
    /// Close button of the cookie-consent overlay.
    pub cookie_dismiss: Locator<'static>,
    pub search_bar: Locator<'static>,

    /// Product entries in the primary suggestion list.
    pub primary_suggestions: Locator<'static>,
    /// Label inside a primary suggestion entry, read as markup.
    pub primary_suggestion_label: Locator<'static>,

    pub secondary_suggestions: Locator<'static>,
    pub secondary_suggestion_entry: Locator<'static>,
    pub secondary_suggestion_label: Locator<'static>,

    pub search_results: Locator<'static>,
    pub search_result_title: Locator<'static>,

    pub product_name: Locator<'static>,
    pub description: Locator<'static>,
    pub brand: Locator<'static>,

    /// Size selector listing every purchasable variant.
    pub variant_list: Locator<'static>,
    pub variant_entry: Locator<'static>,
    pub variant_price: Locator<'static>,
    pub variant_volume: Locator<'static>,

    /// Price of the variant shown when there is no variant list.
    pub selected_price: Locator<'static>,
    pub selected_volume: Locator<'static>,
    /// Notice displayed in place of the price when the product is out of stock.
    pub unavailable_notice: Locator<'static>,
}

impl Selectors {
    pub const NOTINO: Selectors = Selectors {
        cookie_dismiss: Locator::Css("[id='exponea-cookie-compliance'] a[class~=close]"),
        search_bar: Locator::Css("[id='pageHeader'] input"),

        primary_suggestions: Locator::Css(
            "div[id='header-suggestProductCol'] a[id='header-productWrapper']",
        ),
        primary_suggestion_label: Locator::Css("div span"),

        secondary_suggestions: Locator::Id("header-suggestSectionCol"),
        secondary_suggestion_entry: Locator::Css("a"),
        secondary_suggestion_label: Locator::Css("span"),

        search_results: Locator::Css("[data-testid='product-container']"),
        search_result_title: Locator::Css("h3"),

        product_name: Locator::Css("div[id='pdHeader'] [class*=ProductName] span"),
        description: Locator::Css("div[id='pdHeader'] [class*=Description]"),
        brand: Locator::Css("div[id='pdHeader'] [class*=Brand]"),

        variant_list: Locator::Id("pdVariantsTile"),
        variant_entry: Locator::Css("li"),
        variant_price: Locator::Css("[data-testid='price-variant']"),
        variant_volume: Locator::Css("[class*=Name] span"),

        selected_price: Locator::Css("[id=pd-price] span"),
        selected_volume: Locator::Css("[id=pdSelectedVariant] [class*=Name] span"),
        unavailable_notice: Locator::Css("div[id=pdSelectedVariant] + div > span"),
    };
}

impl Default for Selectors {
    fn default() -> Self {
        Self::NOTINO
    }
}
