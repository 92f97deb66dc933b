//! Compiled field locators
//!
//! A [`Locator`] from the configuration is compiled once into a
//! [`CompiledLocator`], which then reads the text or attribute value of the
//! elements it designates.

use crate::config::Locator;
use crate::extract::text::clean_text;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Parses a CSS selector, naming the field it belongs to on failure
pub fn compile_selector(field: &str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        message: format!("'{}': {:?}", css, e),
    })
}

/// A locator with its selectors parsed
#[derive(Debug, Clone)]
pub struct CompiledLocator {
    selector: Selector,
    within: Option<Selector>,
    attr: Option<String>,
}

impl CompiledLocator {
    pub fn new(field: &str, locator: &Locator) -> Result<Self, ConfigError> {
        let selector = compile_selector(field, &locator.css)?;
        let within = locator
            .within
            .as_deref()
            .map(|css| compile_selector(field, css))
            .transpose()?;

        Ok(Self {
            selector,
            within,
            attr: locator.attr.clone(),
        })
    }

    /// Value of the first matching element that yields non-empty content
    pub fn first(&self, document: &Html) -> Option<String> {
        document
            .select(&self.selector)
            .find_map(|element| self.read(element))
    }

    /// Values of every matching element, in document order, skipping empties
    pub fn all(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.selector)
            .filter_map(|element| self.read(element))
            .collect()
    }

    fn read(&self, element: ElementRef<'_>) -> Option<String> {
        let target = match &self.within {
            Some(inner) => element.select(inner).next()?,
            None => element,
        };

        let value = match &self.attr {
            Some(attr) => target.value().attr(attr)?.trim().to_string(),
            None => clean_text(&target.text().collect::<String>()),
        };

        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}
