//! Robots.txt parser implementation
//!
//! This module provides functionality for parsing robots.txt content using the robotstxt crate.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
///
/// Wraps the raw file; the robotstxt matcher re-parses it on each check.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used when robots.txt cannot be fetched or checking is disabled.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Checks if a URL is allowed for the given user agent product token
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The crawler name, e.g. "RecipeHarvest"
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let robots = ParsedRobots::allow_all();
        assert!(robots.is_allowed("https://example.com/anything", "RecipeHarvest"));
    }

    #[test]
    fn test_empty_content_allows() {
        let robots = ParsedRobots::from_content("");
        assert!(robots.is_allowed("https://example.com/recipe/1", "RecipeHarvest"));
    }

    #[test]
    fn test_disallowed_path() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /private/\n");
        assert!(robots.is_allowed("https://example.com/recipe/1", "RecipeHarvest"));
        assert!(!robots.is_allowed("https://example.com/private/draft", "RecipeHarvest"));
    }

    #[test]
    fn test_agent_specific_rules() {
        let robots = ParsedRobots::from_content(
            "User-agent: RecipeHarvest\nDisallow: /\n\nUser-agent: *\nAllow: /\n",
        );
        assert!(!robots.is_allowed("https://example.com/recipe/1", "RecipeHarvest"));
        assert!(robots.is_allowed("https://example.com/recipe/1", "OtherBot"));
    }
}
