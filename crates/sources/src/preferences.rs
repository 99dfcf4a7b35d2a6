//! Preference resolution: which categories does a user buy from most?
//!
//! ## Algorithm
//! 1. Count the user's purchases per category (uncategorized products count
//!    towards nothing)
//! 2. Find the highest count
//! 3. Every category with that count is preferred; ties are not broken

use data_loader::{Category, CategoryOf, UserRatings};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Count the user's purchases per category
pub fn tally_categories<'a>(user_ratings: &UserRatings, category_of: &'a CategoryOf) -> HashMap<&'a str, usize> {
    let mut tallies: HashMap<&str, usize> = HashMap::new();
    for product_id in user_ratings.keys() {
        if let Some(category) = category_of.get(product_id) {
            *tallies.entry(category.as_str()).or_insert(0) += 1;
        }
    }
    tallies
}

/// All categories tied for the highest tally.
///
/// Empty tallies give an empty set.
pub fn preferred_categories(tallies: &HashMap<&str, usize>) -> BTreeSet<Category> {
    let Some(&max_count) = tallies.values().max() else {
        return BTreeSet::new();
    };

    tallies
        .iter()
        .filter(|(_, count)| **count == max_count)
        .map(|(category, _)| category.to_string())
        .collect()
}

/// Derive the set of categories the user purchased from most.
///
/// An empty result means the user has no categorized purchases and nothing
/// can be recommended; callers treat that as a normal outcome.
pub fn resolve_preferences(user_ratings: &UserRatings, category_of: &CategoryOf) -> BTreeSet<Category> {
    let tallies = tally_categories(user_ratings, category_of);
    let preferred = preferred_categories(&tallies);
    debug!(
        "Resolved {} preferred categories from {} tallied",
        preferred.len(),
        tallies.len()
    );
    preferred
}
