//! Category and listing page extraction
//!
//! Both extractors return links in document order. Recipe links are
//! de-duplicated after normalization; a listing page may link the same
//! recipe from its image and its title.

use crate::config::{CategorySelectors, ListingSelectors};
use crate::extract::locator::compile_selector;
use crate::extract::text::clean_text;
use crate::model::CategoryRef;
use crate::url::resolve_href;
use crate::{ConfigError, ParseError};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts `(name, url)` category links from a category navigation block
#[derive(Debug, Clone)]
pub struct CategoryExtractor {
    container: Selector,
    item: Selector,
    name: Selector,
}

impl CategoryExtractor {
    pub fn new(selectors: &CategorySelectors) -> Result<Self, ConfigError> {
        Ok(Self {
            container: compile_selector("categories.container", &selectors.container)?,
            item: compile_selector("categories.item", &selectors.item)?,
            name: compile_selector("categories.name", &selectors.name)?,
        })
    }

    /// Lists the categories found in the first matching container
    ///
    /// Items without a usable href are skipped. When the item has no inner
    /// name element, the link text is used as the name.
    pub fn extract(&self, html: &str, base_url: &Url) -> Result<Vec<CategoryRef>, ParseError> {
        let document = Html::parse_document(html);

        let container = document
            .select(&self.container)
            .next()
            .ok_or(ParseError::MissingElement {
                element: "category container",
            })?;

        let mut categories = Vec::new();
        for item in container.select(&self.item) {
            let Some(url) = item
                .value()
                .attr("href")
                .and_then(|href| resolve_href(href, base_url))
            else {
                continue;
            };

            let name = match item.select(&self.name).next() {
                Some(element) => clean_text(&element.text().collect::<String>()),
                None => clean_text(&item.text().collect::<String>()),
            };

            if name.is_empty() {
                tracing::debug!("Skipping unnamed category link {}", url);
                continue;
            }

            categories.push(CategoryRef::new(name, url.to_string()));
        }

        Ok(categories)
    }
}

/// Extracts recipe detail links from a listing page
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    container: Selector,
    link: Selector,
}

impl ListingExtractor {
    pub fn new(selectors: &ListingSelectors) -> Result<Self, ConfigError> {
        Ok(Self {
            container: compile_selector("listing.container", &selectors.container)?,
            link: compile_selector("listing.link", &selectors.link)?,
        })
    }

    /// Returns the ordered, de-duplicated recipe URLs of a listing page
    pub fn extract(&self, html: &str, base_url: &Url) -> Result<Vec<Url>, ParseError> {
        let document = Html::parse_document(html);

        let containers: Vec<_> = document.select(&self.container).collect();
        if containers.is_empty() {
            return Err(ParseError::MissingElement {
                element: "recipe list container",
            });
        }

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for container in containers {
            for link in container.select(&self.link) {
                let Some(url) = link
                    .value()
                    .attr("href")
                    .and_then(|href| resolve_href(href, base_url))
                else {
                    continue;
                };

                if seen.insert(url.to_string()) {
                    links.push(url);
                }
            }
        }

        Ok(links)
    }
}
