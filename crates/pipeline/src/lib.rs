//! Ranking stage of the recommendation engine.
//!
//! This crate provides:
//! - `rank`, the pure ranking function over explicit indices
//! - `CandidateRanker`, the same ranking bound to a shared catalog and limit
//! - `Recommendation`, the (product, category) pair sent to clients
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::CandidateRanker;
//! use sources::resolve_preferences;
//!
//! let ranker = CandidateRanker::new(catalog.clone(), 5);
//! let owned = catalog.get_user_ratings("u1").unwrap();
//! let preferred = resolve_preferences(owned, catalog.category_mapping());
//! let top = ranker.recommend(owned, &preferred);
//! ```

pub mod ranker;

// Re-export main types
pub use ranker::{rank, rank_and_select, CandidateRanker, Recommendation, DEFAULT_RECOMMENDATION_LIMIT};
