//! Category Source - candidates from the user's preferred categories
//!
//! ## Algorithm
//! 1. Seed an exclusion set with every product the user owns
//! 2. Walk the preferred categories in order, and each category's product
//!    list in index order
//! 3. Every product not yet excluded becomes a candidate (tagged with its
//!    popularity and the category it was found through) and is excluded
//!    from then on, so a product reachable from two preferred categories is
//!    only emitted once
//!
//! Candidates come out in discovery order. Ranking is the pipeline's job.

use crate::types::Candidate;
use data_loader::{Catalog, Category, CategoryIndex, PopularityIndex, UserRatings};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Collect the deduplicated, owned-excluded candidates for a user.
///
/// Products indexed without a popularity entry get popularity 0.
pub fn collect_candidates(
    user_ratings: &UserRatings,
    category_index: &CategoryIndex,
    popularity_index: &PopularityIndex,
    preferred: &BTreeSet<Category>,
) -> Vec<Candidate> {
    let mut excluded: HashSet<&str> = user_ratings.keys().map(String::as_str).collect();
    let mut candidates = Vec::new();

    for category in preferred {
        let Some(products) = category_index.get(category) else {
            continue;
        };
        for product_id in products {
            if !excluded.insert(product_id.as_str()) {
                continue;
            }
            let popularity = popularity_index.get(product_id).copied().unwrap_or(0);
            candidates.push(Candidate::new(product_id.clone(), category.clone(), popularity));
        }
    }

    candidates
}

/// Candidate source backed by the shared catalog
#[derive(Clone)]
pub struct CategorySource {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,
}

impl CategorySource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Generate unranked candidates from the preferred categories
    #[instrument(skip_all, fields(categories = preferred.len()))]
    pub fn get_candidates(&self, user_ratings: &UserRatings, preferred: &BTreeSet<Category>) -> Vec<Candidate> {
        let candidates = collect_candidates(
            user_ratings,
            self.catalog.category_index(),
            self.catalog.popularity_index(),
            preferred,
        );
        debug!(
            "Generated {} category candidates (owned: {})",
            candidates.len(),
            user_ratings.len()
        );
        candidates
    }
}
