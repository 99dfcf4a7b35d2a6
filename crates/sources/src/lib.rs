//! # Sources Crate
//!
//! Everything the engine derives from one user's purchase history before
//! ranking:
//!
//! - **user_context**: the enriched purchase profile shown back to the user
//! - **preferences**: the categories the user buys from most (ties included)
//! - **category**: unranked candidates drawn from those categories, with
//!   owned products and duplicates removed
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CategorySource, preferences::resolve_preferences};
//! use data_loader::Catalog;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load_from_dir(Path::new("data"))?);
//! let owned = catalog.get_user_ratings("u1").unwrap();
//!
//! let preferred = resolve_preferences(owned, catalog.category_mapping());
//! let candidates = CategorySource::new(catalog.clone()).get_candidates(owned, &preferred);
//! ```

// Public modules
pub mod types;
pub mod user_context;
pub mod preferences;
pub mod category;

// Re-export commonly used types
pub use types::{Candidate, PurchasedProduct, UserProfile};
pub use category::{collect_candidates, CategorySource};
pub use preferences::resolve_preferences;
pub use user_context::build_user_profile;
