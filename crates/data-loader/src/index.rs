//! Catalog building and indexing logic.
//!
//! Builds the two secondary indices the recommendation engine reads:
//! - category -> products (candidate pools)
//! - product -> number of purchasing users (popularity)
//!
//! Both are derived in a single pass over every purchase record and are never
//! touched again once the catalog is constructed.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Default name of the ratings file inside a data directory
pub const RATINGS_FILE: &str = "ratings.json";

/// Default name of the category file inside a data directory
pub const CATEGORIES_FILE: &str = "categories.json";

/// Build the category and popularity indices from the full dataset.
///
/// Purchases of products without a category are skipped entirely: they are
/// neither listed under a category nor counted for popularity.
///
/// Category lists follow discovery order (users in key order, then each
/// user's products in key order) and hold each product once.
pub fn build_indices(ratings: &RatingsTable, category_of: &CategoryOf) -> (CategoryIndex, PopularityIndex) {
    let mut category_index = CategoryIndex::new();
    let mut listed: HashSet<&str> = HashSet::new();

    for products in ratings.values() {
        for product_id in products.keys() {
            let Some(category) = category_of.get(product_id) else {
                continue;
            };
            if listed.insert(product_id.as_str()) {
                category_index
                    .entry(category.clone())
                    .or_insert_with(Vec::new)
                    .push(product_id.clone());
            }
        }
    }

    let popularity = compute_popularity(ratings, category_of);
    (category_index, popularity)
}

/// Count, for each categorized product, how many users purchased it.
///
/// Each user's ratings map holds a product at most once, so counting
/// records is the same as counting distinct users.
fn compute_popularity(ratings: &RatingsTable, category_of: &CategoryOf) -> PopularityIndex {
    ratings
        .par_iter()
        .fold(
            HashMap::new,
            |mut local_counts: PopularityIndex, (_user_id, products)| {
                for product_id in products.keys() {
                    if category_of.contains_key(product_id) {
                        *local_counts.entry(product_id.clone()).or_insert(0) += 1;
                    }
                }
                local_counts
            },
        )
        .reduce(HashMap::new, |mut acc, local_counts| {
            for (product_id, count) in local_counts {
                *acc.entry(product_id).or_insert(0) += count;
            }
            acc
        })
}

impl Catalog {
    /// Build a catalog from fully materialized tables.
    ///
    /// Takes ownership of both tables; the returned catalog has no mutation
    /// path, so it can be shared across workers without locking.
    pub fn build(ratings: RatingsTable, category_of: CategoryOf) -> Self {
        let (category_index, popularity) = build_indices(&ratings, &category_of);
        debug!(
            "Indexed {} categories, {} categorized products",
            category_index.len(),
            popularity.len()
        );
        Self {
            ratings,
            category_of,
            category_index,
            popularity,
        }
    }

    /// Load the dataset from a directory holding `ratings.json` and
    /// `categories.json`
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        Self::load_from_files(&data_dir.join(RATINGS_FILE), &data_dir.join(CATEGORIES_FILE))
    }

    /// Load both dataset files, build the indices and validate the result.
    ///
    /// Any error here is fatal: the service never runs on partial data.
    pub fn load_from_files(ratings_path: &Path, categories_path: &Path) -> Result<Self> {
        info!(
            "Loading dataset from {:?} and {:?}",
            ratings_path, categories_path
        );

        let (ratings, category_of) = rayon::join(
            || parser::parse_ratings(ratings_path),
            || parser::parse_categories(categories_path),
        );
        let ratings = ratings?;
        let category_of = category_of?;

        validate(&ratings)?;

        let catalog = Self::build(ratings, category_of);
        let (users, products, purchases) = catalog.counts();
        info!(
            "Catalog built: {} users, {} categorized products, {} purchases",
            users, products, purchases
        );
        Ok(catalog)
    }
}

/// Validate data integrity
///
/// Ratings are only displayed, but a NaN or infinite value means the file is
/// not what we think it is.
pub fn validate(ratings: &RatingsTable) -> Result<()> {
    for (user_id, products) in ratings {
        for (product_id, rating) in products {
            if !rating.is_finite() {
                return Err(DataLoadError::InvalidValue {
                    field: format!("rating of {} by {}", product_id, user_id),
                    value: rating.to_string(),
                });
            }
        }
    }
    Ok(())
}
