//! # Data Loader Crate
//!
//! This crate loads the purchase dataset and builds the immutable catalog
//! every query reads from.
//!
//! ## Main Components
//!
//! - **types**: Dataset tables, index types and the `Catalog` snapshot
//! - **parser**: Parse the JSON dataset files
//! - **index**: Build the category and popularity indices
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load_from_dir(Path::new("data"))?);
//!
//! let purchases = catalog.get_user_ratings("u1");
//! let books = catalog.get_products_by_category("Books");
//! println!("p1 bought by {} users", catalog.popularity("p1"));
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{build_indices, CATEGORIES_FILE, RATINGS_FILE};
pub use types::{
    // Type aliases
    UserId,
    ProductId,
    Category,
    RatingValue,
    // Tables and indices
    UserRatings,
    RatingsTable,
    CategoryOf,
    CategoryIndex,
    PopularityIndex,
    // Core types
    Catalog,
    UNKNOWN_CATEGORY,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_catalog() -> Catalog {
        let mut ratings = RatingsTable::new();
        ratings.insert(
            "u1".to_string(),
            [("p1".to_string(), 5.0), ("mystery".to_string(), 2.0)].into_iter().collect(),
        );
        ratings.insert(
            "u2".to_string(),
            [("p1".to_string(), 4.0), ("p2".to_string(), 3.0)].into_iter().collect(),
        );

        let category_of: CategoryOf = [("p1", "Books"), ("p2", "Music")]
            .into_iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect();

        Catalog::build(ratings, category_of)
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::build(RatingsTable::new(), CategoryOf::new());
        let (users, products, purchases) = catalog.counts();

        assert_eq!(users, 0);
        assert_eq!(products, 0);
        assert_eq!(purchases, 0);
    }

    #[test]
    fn test_catalog_queries() {
        let catalog = build_test_catalog();

        assert_eq!(catalog.get_user_ratings("u1").unwrap().len(), 2);
        assert_eq!(catalog.category_of("p1"), Some("Books"));
        assert_eq!(catalog.popularity("p1"), 2);
        assert_eq!(catalog.popularity("p2"), 1);
        assert_eq!(catalog.get_products_by_category("Books"), ["p1".to_string()]);
        assert_eq!(catalog.counts(), (2, 2, 4));
        assert_eq!(catalog.user_ids().collect::<Vec<_>>(), vec!["u1", "u2"]);
    }

    #[test]
    fn test_unknown_category_fallback() {
        let catalog = build_test_catalog();

        assert_eq!(catalog.category_of("mystery"), None);
        assert_eq!(catalog.resolve_category("mystery"), UNKNOWN_CATEGORY);
        assert_eq!(catalog.resolve_category("p2"), "Music");
        assert_eq!(catalog.popularity("mystery"), 0);
    }

    #[test]
    fn test_empty_queries() {
        let catalog = build_test_catalog();

        // Querying non-existent data should return None or empty slices
        assert!(catalog.get_user_ratings("nobody").is_none());
        assert!(catalog.get_products_by_category("Garden").is_empty());
        assert_eq!(catalog.popularity("nothing"), 0);
    }
}
