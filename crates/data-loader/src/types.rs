//! Core domain types for the purchase dataset.
//!
//! Identifiers are plain strings in the dataset files, so the aliases below
//! exist for readability rather than type safety. Ordered maps are used
//! wherever iteration order can leak into a result, so that every build of
//! the catalog from the same files produces the same indexes.

use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = String;

/// Unique identifier for a product
pub type ProductId = String;

/// Category label attached to a product
pub type Category = String;

/// Rating a user gave a purchased product. Carried through for display only.
pub type RatingValue = f64;

/// Category reported for purchases of products missing from the category file
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// =============================================================================
// Dataset Tables
// =============================================================================

/// One user's purchases: product -> rating
pub type UserRatings = BTreeMap<ProductId, RatingValue>;

/// All purchases: user -> (product -> rating)
pub type RatingsTable = BTreeMap<UserId, UserRatings>;

/// Product -> category. Products absent here are uncategorized.
pub type CategoryOf = HashMap<ProductId, Category>;

// =============================================================================
// Derived Indices
// =============================================================================

/// Category -> member products, in discovery order
pub type CategoryIndex = BTreeMap<Category, Vec<ProductId>>;

/// Product -> number of distinct users who purchased it
pub type PopularityIndex = HashMap<ProductId, u32>;

// =============================================================================
// Catalog - The Shared In-Memory Snapshot
// =============================================================================

/// The complete dataset plus the indices derived from it.
///
/// A `Catalog` is built once, before the first query is served, and is then
/// shared read-only (usually behind an `Arc`). There are no mutating methods:
/// the only way to obtain one is [`Catalog::build`] or one of the loaders,
/// which take ownership of the raw tables.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) ratings: RatingsTable,
    pub(crate) category_of: CategoryOf,

    /// Products grouped by category (each product listed once per category)
    pub(crate) category_index: CategoryIndex,
    /// Purchase counts across all users, categorized products only
    pub(crate) popularity: PopularityIndex,
}

impl Catalog {
    /// All purchases made by a user, or `None` for an unknown user
    pub fn get_user_ratings(&self, user_id: &str) -> Option<&UserRatings> {
        self.ratings.get(user_id)
    }

    /// Category of a product, if it has one
    pub fn category_of(&self, product_id: &str) -> Option<&str> {
        self.category_of.get(product_id).map(String::as_str)
    }

    /// Category of a product, falling back to [`UNKNOWN_CATEGORY`]
    pub fn resolve_category(&self, product_id: &str) -> &str {
        self.category_of(product_id).unwrap_or(UNKNOWN_CATEGORY)
    }

    /// All indexed products in a category
    ///
    /// Returns an empty slice for categories nobody has purchased from
    pub fn get_products_by_category(&self, category: &str) -> &[ProductId] {
        self.category_index
            .get(category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of users who purchased a product (0 if not indexed)
    pub fn popularity(&self, product_id: &str) -> u32 {
        self.popularity.get(product_id).copied().unwrap_or(0)
    }

    pub fn ratings(&self) -> &RatingsTable {
        &self.ratings
    }

    pub fn category_mapping(&self) -> &CategoryOf {
        &self.category_of
    }

    pub fn category_index(&self) -> &CategoryIndex {
        &self.category_index
    }

    pub fn popularity_index(&self) -> &PopularityIndex {
        &self.popularity
    }

    /// All known user ids, in lexicographic order
    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.ratings.keys().map(String::as_str)
    }

    /// Get counts for logging: (users, categorized products, purchase records)
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_purchases = self.ratings.values().map(|v| v.len()).sum();
        (self.ratings.len(), self.popularity.len(), total_purchases)
    }
}
