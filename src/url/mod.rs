//! URL handling module for Recipe-Harvest
//!
//! Recipe URLs are the natural key of stored records, so every link the
//! scraper follows or stores goes through [`normalize_url`] first.

mod normalize;

pub use normalize::{normalize_url, resolve_href};
