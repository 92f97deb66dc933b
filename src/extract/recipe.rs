//! Recipe detail page extraction

use crate::config::RecipeSelectors;
use crate::extract::locator::CompiledLocator;
use crate::extract::text::normalize_portion;
use crate::model::{CategoryRef, Recipe};
use crate::url::{normalize_url, resolve_href};
use crate::{ConfigError, ParseError};
use scraper::Html;
use url::Url;

/// Where a recipe page came from
///
/// The category context is known from discovery, not from the page itself.
#[derive(Debug, Clone, Default)]
pub struct RecipeSource {
    /// URL the page was fetched from; base for relative links and the
    /// fallback when the page does not declare its own URL
    pub page_url: Option<Url>,
    pub category: Option<CategoryRef>,
    pub subcategory: Option<CategoryRef>,
}

/// Extracts [`Recipe`] records from recipe detail pages
#[derive(Debug, Clone)]
pub struct RecipeExtractor {
    name: CompiledLocator,
    url: CompiledLocator,
    image_url: CompiledLocator,
    description: CompiledLocator,
    author: CompiledLocator,
    ingredients: CompiledLocator,
    steps: CompiledLocator,
    portion: CompiledLocator,
}

impl RecipeExtractor {
    pub fn new(selectors: &RecipeSelectors) -> Result<Self, ConfigError> {
        Ok(Self {
            name: CompiledLocator::new("recipe.name", &selectors.name)?,
            url: CompiledLocator::new("recipe.url", &selectors.url)?,
            image_url: CompiledLocator::new("recipe.image-url", &selectors.image_url)?,
            description: CompiledLocator::new("recipe.description", &selectors.description)?,
            author: CompiledLocator::new("recipe.author", &selectors.author)?,
            ingredients: CompiledLocator::new("recipe.ingredients", &selectors.ingredients)?,
            steps: CompiledLocator::new("recipe.steps", &selectors.steps)?,
            portion: CompiledLocator::new("recipe.portion", &selectors.portion)?,
        })
    }

    /// Extracts one recipe from the HTML of its detail page
    ///
    /// # Errors
    ///
    /// `ParseError::MissingField` when the name cannot be located, or when
    /// the page declares no URL and `source.page_url` is absent.
    pub fn extract(&self, html: &str, source: &RecipeSource) -> Result<Recipe, ParseError> {
        let document = Html::parse_document(html);

        let name = self
            .name
            .first(&document)
            .ok_or(ParseError::MissingField { field: "name" })?;

        let url = self
            .locate_url(&document, source.page_url.as_ref())
            .ok_or(ParseError::MissingField { field: "url" })?;

        let image_url = self.image_url.first(&document).map(|src| {
            match source.page_url.as_ref().and_then(|base| base.join(&src).ok()) {
                Some(absolute) => absolute.to_string(),
                None => src,
            }
        });

        let (category, category_url) = split_category(source.category.as_ref());
        let (subcategory, subcategory_url) = split_category(source.subcategory.as_ref());

        Ok(Recipe {
            name,
            url: url.to_string(),
            category,
            category_url,
            subcategory,
            subcategory_url,
            image_url,
            description: self.description.first(&document),
            author: self.author.first(&document),
            ingredients: self.ingredients.all(&document),
            steps: self.steps.all(&document),
            portion: self.portion.first(&document).map(|p| normalize_portion(&p)),
        })
    }

    fn locate_url(&self, document: &Html, page_url: Option<&Url>) -> Option<Url> {
        let declared = self.url.first(document).and_then(|href| match page_url {
            Some(base) => resolve_href(&href, base),
            None => normalize_url(&href).ok(),
        });

        declared.or_else(|| page_url.and_then(|url| normalize_url(url.as_str()).ok()))
    }
}

fn split_category(category: Option<&CategoryRef>) -> (Option<String>, Option<String>) {
    match category {
        Some(c) => (Some(c.name.clone()), Some(c.url.clone())),
        None => (None, None),
    }
}
