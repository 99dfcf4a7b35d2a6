//! # Recommendation Orchestrator
//!
//! This module answers one query end to end:
//! 1. Look up the user (unknown users get an empty response)
//! 2. Enrich their purchases with categories
//! 3. Resolve preferred categories (none means no recommendations)
//! 4. Rank candidates from those categories
//!
//! The orchestrator only reads the shared catalog. Each call is independent
//! and keeps no state between queries, so one instance can be cloned into
//! every connection task.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use data_loader::Catalog;
use pipeline::CandidateRanker;
use sources::{build_user_profile, resolve_preferences};

use crate::protocol::UserData;

/// Coordinates the recommendation engine for incoming queries
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalog: Arc<Catalog>,
    ranker: CandidateRanker,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over a fully built catalog
    ///
    /// # Arguments
    /// * `catalog` - Shared, immutable dataset snapshot
    /// * `limit` - Maximum number of recommendations per query
    pub fn new(catalog: Arc<Catalog>, limit: usize) -> Self {
        let ranker = CandidateRanker::new(catalog.clone(), limit);
        Self { catalog, ranker }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Main entry point: purchases and recommendations for a user
    ///
    /// Never fails: unknown users and users without categorized purchases
    /// get well-defined (partly) empty responses.
    #[instrument(skip(self))]
    pub fn get_user_data(&self, user_id: &str) -> UserData {
        let start_time = Instant::now();

        let Some(user_ratings) = self.catalog.get_user_ratings(user_id) else {
            info!("User '{}' not found", user_id);
            return UserData::empty();
        };

        let purchased_products = build_user_profile(&self.catalog, user_id)
            .map(|profile| profile.purchased)
            .unwrap_or_default();

        let preferred = resolve_preferences(user_ratings, self.catalog.category_mapping());
        if preferred.is_empty() {
            debug!("User '{}' has no categorized purchases", user_id);
            return UserData {
                purchased_products,
                recommendations: Vec::new(),
            };
        }
        debug!("Preferred categories for '{}': {:?}", user_id, preferred);

        let recommendations = self.ranker.recommend(user_ratings, &preferred);

        info!(
            "Served user '{}': {} purchases, {} recommendations in {:.2?}",
            user_id,
            purchased_products.len(),
            recommendations.len(),
            start_time.elapsed()
        );

        UserData {
            purchased_products,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{CategoryOf, RatingsTable, UNKNOWN_CATEGORY};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn build_test_catalog() -> Arc<Catalog> {
        let mut ratings = RatingsTable::new();
        let mut add = |user: &str, products: &[(&str, f64)]| {
            ratings.insert(
                user.to_string(),
                products.iter().map(|(p, r)| (p.to_string(), *r)).collect(),
            );
        };

        add("alice", &[("book-1", 5.0), ("book-2", 4.0), ("cd-1", 3.0)]);
        add("bob", &[("book-3", 4.0), ("book-4", 2.0), ("cd-2", 5.0)]);
        add("carol", &[("book-3", 5.0), ("book-5", 3.0), ("book-6", 4.0)]);
        add("dave", &[("book-3", 1.0), ("book-4", 4.0), ("book-7", 4.0), ("cd-2", 4.0)]);
        add("erin", &[("widget", 4.5)]);

        let category_of: CategoryOf = [
            ("book-1", "Books"),
            ("book-2", "Books"),
            ("book-3", "Books"),
            ("book-4", "Books"),
            ("book-5", "Books"),
            ("book-6", "Books"),
            ("book-7", "Books"),
            ("cd-1", "Music"),
            ("cd-2", "Music"),
        ]
        .into_iter()
        .map(|(p, c)| (p.to_string(), c.to_string()))
        .collect();

        Arc::new(Catalog::build(ratings, category_of))
    }

    fn ids(data: &UserData) -> Vec<&str> {
        data.recommendations.iter().map(|r| r.product_id.as_str()).collect()
    }

    #[test]
    fn test_unknown_user_gets_empty_response() {
        let orchestrator = RecommendationOrchestrator::new(build_test_catalog(), 5);
        assert_eq!(orchestrator.get_user_data("mallory"), UserData::empty());
    }

    #[test]
    fn test_purchases_are_enriched() {
        let orchestrator = RecommendationOrchestrator::new(build_test_catalog(), 5);
        let data = orchestrator.get_user_data("alice");

        assert_eq!(data.purchased_products.len(), 3);
        let cd = data
            .purchased_products
            .iter()
            .find(|p| p.product_id == "cd-1")
            .unwrap();
        assert_eq!(cd.category, "Music");
        assert_eq!(cd.rating, 3.0);
    }

    #[test]
    fn test_recommendations_rank_preferred_category_by_popularity() {
        let orchestrator = RecommendationOrchestrator::new(build_test_catalog(), 5);
        let data = orchestrator.get_user_data("alice");

        // alice prefers Books; book-3 (3 buyers), book-4 (2), then single buyers
        // in discovery order
        assert_eq!(ids(&data), vec!["book-3", "book-4", "book-5", "book-6", "book-7"]);
        assert!(data.recommendations.iter().all(|r| r.category == "Books"));
    }

    #[test]
    fn test_limit_is_respected() {
        let orchestrator = RecommendationOrchestrator::new(build_test_catalog(), 2);
        let data = orchestrator.get_user_data("alice");
        assert_eq!(ids(&data), vec!["book-3", "book-4"]);
    }

    #[test]
    fn test_owned_products_are_never_recommended() {
        let orchestrator = RecommendationOrchestrator::new(build_test_catalog(), 5);
        let data = orchestrator.get_user_data("dave");

        for recommendation in &data.recommendations {
            assert!(
                !data
                    .purchased_products
                    .iter()
                    .any(|p| p.product_id == recommendation.product_id)
            );
        }
        assert_eq!(ids(&data), vec!["book-1", "book-2", "book-5", "book-6"]);
    }

    #[test]
    fn test_uncategorized_user_gets_purchases_only() {
        let orchestrator = RecommendationOrchestrator::new(build_test_catalog(), 5);
        let data = orchestrator.get_user_data("erin");

        assert_eq!(data.purchased_products.len(), 1);
        assert_eq!(data.purchased_products[0].category, UNKNOWN_CATEGORY);
        assert!(data.recommendations.is_empty());
    }

    #[test]
    fn test_queries_are_independent() {
        let orchestrator = RecommendationOrchestrator::new(build_test_catalog(), 5);

        let first = orchestrator.get_user_data("bob");
        let _ = orchestrator.get_user_data("alice");
        let second = orchestrator.get_user_data("bob");
        assert_eq!(first, second);
    }
}
