//! Recipe record definitions
//!
//! A [`Recipe`] is the single persisted entity. It is created by the
//! extractor from one page fetch and keyed by its `url`.

/// A named link to a category or subcategory listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryRef {
    pub name: String,
    pub url: String,
}

impl CategoryRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One scraped recipe
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recipe {
    /// Recipe title as shown on the page
    pub name: String,

    /// Canonical URL, the natural key
    pub url: String,

    /// Main category name
    pub category: Option<String>,

    /// Link to the main category listing
    pub category_url: Option<String>,

    /// Secondary classification label
    pub subcategory: Option<String>,

    /// Link to the subcategory listing
    pub subcategory_url: Option<String>,

    pub image_url: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,

    pub ingredients: Vec<String>,

    pub steps: Vec<String>,

    /// Serving size label, e.g. "4 servings"
    pub portion: Option<String>,
}

impl Recipe {
    /// Returns the name of the first required field that is empty, if any
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.url.trim().is_empty() {
            Some("url")
        } else {
            None
        }
    }

    /// Parses the leading integer of the portion label ("6 servings" -> 6)
    ///
    /// Counts too large for `u32` saturate at `u32::MAX`.
    pub fn portion_count(&self) -> Option<u32> {
        let portion = self.portion.as_deref()?.trim();
        let digits: String = portion.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        match digits.parse() {
            Ok(count) => Some(count),
            Err(_) => {
                tracing::debug!(
                    "Portion '{}' of {} overflows, saturating to {}",
                    portion,
                    self.url,
                    u32::MAX
                );
                Some(u32::MAX)
            }
        }
    }
}
