//! Statistics over stored recipes
//!
//! This module computes aggregate figures from every recipe in the store
//! and displays them. All figures come from a single pass over
//! [`RecipeStore::all`].

use crate::model::Recipe;
use crate::storage::{RecipeStore, StoreError};
use std::collections::BTreeMap;

/// The recipe with the largest serving count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortionLeader {
    pub name: String,
    pub url: String,
    pub portions: u32,
}

/// Aggregate statistics over stored recipes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeStatistics {
    /// Number of stored recipes
    pub total_recipes: u64,

    /// Mean ingredient count (0 when the store is empty)
    pub avg_ingredients: f64,

    /// Mean step count (0 when the store is empty)
    pub avg_steps: f64,

    /// Author with the most recipes and their recipe count
    pub top_author: Option<(String, u64)>,

    /// Recipe with the largest leading number in its portion label
    pub largest_portion: Option<PortionLeader>,

    /// Recipe count per subcategory label
    pub recipes_by_subcategory: BTreeMap<String, u64>,
}

/// Running totals fed one recipe at a time
#[derive(Default)]
struct Accumulator {
    total: u64,
    ingredients: u64,
    steps: u64,
    authors: BTreeMap<String, u64>,
    largest_portion: Option<PortionLeader>,
    subcategories: BTreeMap<String, u64>,
}

impl Accumulator {
    fn add(&mut self, recipe: Recipe) {
        self.total += 1;
        self.ingredients += recipe.ingredients.len() as u64;
        self.steps += recipe.steps.len() as u64;

        if let Some(author) = recipe.author.as_deref().filter(|a| !a.trim().is_empty()) {
            *self.authors.entry(author.to_string()).or_insert(0) += 1;
        }

        if let Some(subcategory) = recipe.subcategory.as_deref() {
            *self.subcategories.entry(subcategory.to_string()).or_insert(0) += 1;
        }

        if let Some(portions) = recipe.portion_count() {
            let is_larger = self
                .largest_portion
                .as_ref()
                .map_or(true, |leader| portions > leader.portions);
            if is_larger {
                self.largest_portion = Some(PortionLeader {
                    name: recipe.name,
                    url: recipe.url,
                    portions,
                });
            }
        }
    }

    fn finish(self) -> RecipeStatistics {
        let mean = |sum: u64| {
            if self.total == 0 {
                0.0
            } else {
                sum as f64 / self.total as f64
            }
        };

        // BTreeMap iterates alphabetically, so strict comparison keeps the
        // alphabetically first author on ties
        let mut top_author: Option<(String, u64)> = None;
        for (author, count) in &self.authors {
            if top_author.as_ref().map_or(true, |(_, best)| count > best) {
                top_author = Some((author.clone(), *count));
            }
        }

        RecipeStatistics {
            total_recipes: self.total,
            avg_ingredients: mean(self.ingredients),
            avg_steps: mean(self.steps),
            top_author,
            largest_portion: self.largest_portion,
            recipes_by_subcategory: self.subcategories,
        }
    }
}

/// Computes statistics over every recipe in the store
///
/// # Errors
///
/// Any store error while reading is returned; there is no partial result.
pub fn compute_statistics(store: &dyn RecipeStore) -> Result<RecipeStatistics, StoreError> {
    let mut acc = Accumulator::default();
    for recipe in store.all()? {
        acc.add(recipe?);
    }

    tracing::debug!("Computed statistics over {} recipes", acc.total);
    Ok(acc.finish())
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RecipeStatistics) {
    println!("=== Recipe Statistics ===\n");

    println!("Overview:");
    println!("  Total recipes: {}", stats.total_recipes);
    println!("  Average ingredients per recipe: {:.2}", stats.avg_ingredients);
    println!("  Average steps per recipe: {:.2}", stats.avg_steps);
    println!();

    match &stats.top_author {
        Some((author, count)) => println!("Top author: {} ({} recipes)", author, count),
        None => println!("Top author: n/a"),
    }

    match &stats.largest_portion {
        Some(leader) => println!(
            "Largest portion: {} ({} servings) - {}",
            leader.name, leader.portions, leader.url
        ),
        None => println!("Largest portion: n/a"),
    }

    if !stats.recipes_by_subcategory.is_empty() {
        println!();
        println!("Recipes by Subcategory:");
        // Sort by count (descending), name for stable output
        let mut counts: Vec<_> = stats.recipes_by_subcategory.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (subcategory, count) in counts {
            println!("  {}: {}", subcategory, count);
        }
    }
}
