use serde::Deserialize;

/// Main configuration structure for Recipe-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// The website being scraped
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the site, used to resolve relative links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the page listing all top-level categories
    #[serde(rename = "categories-path")]
    pub categories_path: String,

    /// Name of the category whose recipes are scraped
    #[serde(rename = "main-category")]
    pub main_category: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per URL, including the first
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for linear backoff between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Minimum time between consecutive requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Skip URLs disallowed by the site's robots.txt
    #[serde(rename = "respect-robots-txt", default = "default_true")]
    pub respect_robots_txt: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            request_delay_ms: default_request_delay_ms(),
            respect_robots_txt: true,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

/// Database location
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the markdown statistics summary
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_path: default_summary_path(),
        }
    }
}

fn default_summary_path() -> String {
    "./statistics.md".to_string()
}

/// Structural rule locating one field in a page
///
/// `css` selects the element(s); `within` narrows each match to its first
/// descendant matching that selector; `attr` reads an attribute instead of
/// the element text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Locator {
    pub css: String,
    #[serde(default)]
    pub attr: Option<String>,
    #[serde(default)]
    pub within: Option<String>,
}

impl Locator {
    pub fn css(css: &str) -> Self {
        Self {
            css: css.to_string(),
            attr: None,
            within: None,
        }
    }

    pub fn attr(css: &str, attr: &str) -> Self {
        Self {
            css: css.to_string(),
            attr: Some(attr.to_string()),
            within: None,
        }
    }

    pub fn within(css: &str, within: &str) -> Self {
        Self {
            css: css.to_string(),
            attr: None,
            within: Some(within.to_string()),
        }
    }
}

/// Every site-specific selector, grouped by page kind
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectorConfig {
    #[serde(default)]
    pub categories: CategorySelectors,
    #[serde(default)]
    pub listing: ListingSelectors,
    #[serde(default)]
    pub recipe: RecipeSelectors,
}

/// Locators for a category navigation block
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategorySelectors {
    /// Element wrapping the category links
    pub container: String,
    /// Link element for one category
    pub item: String,
    /// Element holding the category name inside the link
    pub name: String,
}

impl Default for CategorySelectors {
    fn default() -> Self {
        Self {
            container: "div.recipe-categories".to_string(),
            item: "a.recipe-categories__item".to_string(),
            name: ".recipe-categories__text".to_string(),
        }
    }
}

/// Locators for a listing page of recipe links
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Element wrapping the recipe cards
    pub container: String,
    /// Link element pointing at one recipe
    pub link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: "div.recipe-list".to_string(),
            link: "a.recipe-list__link".to_string(),
        }
    }
}

/// Locators for the fields of a recipe detail page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecipeSelectors {
    pub name: Locator,
    pub url: Locator,
    #[serde(rename = "image-url")]
    pub image_url: Locator,
    pub description: Locator,
    pub author: Locator,
    pub ingredients: Locator,
    pub steps: Locator,
    pub portion: Locator,
}

impl Default for RecipeSelectors {
    fn default() -> Self {
        Self {
            name: Locator::css("div.recipe-title"),
            url: Locator::attr("link[rel='canonical']", "href"),
            image_url: Locator {
                css: "div.recipe-image".to_string(),
                attr: Some("src".to_string()),
                within: Some("img".to_string()),
            },
            description: Locator::css("div.recipe-description"),
            author: Locator::within("div.recipe-author", "a"),
            ingredients: Locator::css("div.ingredient-item"),
            steps: Locator::within("div.cooking-stage", "p"),
            portion: Locator::css("div.recipe-portion .portion-value"),
        }
    }
}
