//! Candidate ranking: popularity order and the result limit.
//!
//! The ranker turns the unranked candidates from
//! [`sources::collect_candidates`] into the final recommendation list.

use data_loader::{Catalog, Category, CategoryIndex, PopularityIndex, ProductId, UserRatings};
use serde::{Deserialize, Serialize};
use sources::{Candidate, CategorySource};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default number of recommendations returned per query
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: ProductId,
    pub category: Category,
}

impl From<Candidate> for Recommendation {
    fn from(candidate: Candidate) -> Self {
        Self {
            product_id: candidate.product_id,
            category: candidate.category,
        }
    }
}

/// Sort candidates by popularity (highest first) and keep the top `limit`.
///
/// The sort is stable: candidates with equal popularity keep their
/// discovery order.
pub fn rank_and_select(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Recommendation> {
    candidates.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    candidates.truncate(limit);
    candidates.into_iter().map(Recommendation::from).collect()
}

/// Rank unowned products from the preferred categories by popularity.
///
/// The output never contains an owned product or a duplicate, and holds
/// `min(limit, eligible candidates)` entries.
pub fn rank(
    user_ratings: &UserRatings,
    category_index: &CategoryIndex,
    popularity_index: &PopularityIndex,
    preferred: &BTreeSet<Category>,
    limit: usize,
) -> Vec<Recommendation> {
    let candidates = sources::collect_candidates(user_ratings, category_index, popularity_index, preferred);
    rank_and_select(candidates, limit)
}

/// Ranker bound to the shared catalog and a fixed result limit
#[derive(Clone)]
pub struct CandidateRanker {
    source: CategorySource,
    limit: usize,
}

impl CandidateRanker {
    /// Create a ranker returning at most `limit` recommendations
    pub fn new(catalog: Arc<Catalog>, limit: usize) -> Self {
        Self {
            source: CategorySource::new(catalog),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    #[instrument(skip_all, fields(limit = self.limit))]
    pub fn recommend(&self, user_ratings: &UserRatings, preferred: &BTreeSet<Category>) -> Vec<Recommendation> {
        let candidates = self.source.get_candidates(user_ratings, preferred);
        let total = candidates.len();
        let recommendations = rank_and_select(candidates, self.limit);
        debug!("Selected {} of {} candidates", recommendations.len(), total);
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(recommendations: &[Recommendation]) -> Vec<&str> {
        recommendations.iter().map(|r| r.product_id.as_str()).collect()
    }

    #[test]
    fn test_rank_and_select_sorts_by_popularity_descending() {
        let candidates = vec![
            Candidate::new("p1", "Books", 1),
            Candidate::new("p2", "Books", 9),
            Candidate::new("p3", "Music", 4),
        ];

        let recommendations = rank_and_select(candidates, 10);
        assert_eq!(ids(&recommendations), vec!["p2", "p3", "p1"]);
        assert_eq!(recommendations[1].category, "Music");
    }

    #[test]
    fn test_rank_and_select_truncates_to_limit() {
        let candidates = (1..=8)
            .map(|i| Candidate::new(format!("p{i}"), "Books", i))
            .collect();

        let recommendations = rank_and_select(candidates, 5);
        assert_eq!(ids(&recommendations), vec!["p8", "p7", "p6", "p5", "p4"]);
    }

    #[test]
    fn test_rank_and_select_ties_keep_discovery_order() {
        let candidates = vec![
            Candidate::new("c", "Books", 2),
            Candidate::new("a", "Music", 2),
            Candidate::new("b", "Books", 3),
            Candidate::new("d", "Books", 2),
        ];

        let recommendations = rank_and_select(candidates, 10);
        assert_eq!(ids(&recommendations), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_rank_and_select_handles_empty_input() {
        assert!(rank_and_select(vec![], 5).is_empty());
        assert!(rank_and_select(vec![Candidate::new("p1", "Books", 1)], 0).is_empty());
    }

    #[test]
    fn test_rank_excludes_owned_and_merges_categories() {
        let mut category_index = CategoryIndex::new();
        category_index.insert("Books".to_string(), vec!["b1".to_string(), "b2".to_string()]);
        category_index.insert("Music".to_string(), vec!["m1".to_string(), "m2".to_string()]);
        let popularity: PopularityIndex = [("b1", 5), ("b2", 1), ("m1", 3), ("m2", 4)]
            .into_iter()
            .map(|(p, n)| (p.to_string(), n))
            .collect();
        let owned: UserRatings = [("b1".to_string(), 5.0), ("m1".to_string(), 2.0)].into_iter().collect();
        let preferred: BTreeSet<Category> = ["Books".to_string(), "Music".to_string()].into_iter().collect();

        let recommendations = rank(&owned, &category_index, &popularity, &preferred, 5);
        assert_eq!(
            recommendations,
            vec![
                Recommendation { product_id: "m2".to_string(), category: "Music".to_string() },
                Recommendation { product_id: "b2".to_string(), category: "Books".to_string() },
            ]
        );
    }

    #[test]
    fn test_recommendation_wire_format() {
        let recommendation = Recommendation::from(Candidate::new("p7", "Music", 12));
        let json = serde_json::to_string(&recommendation).unwrap();
        assert_eq!(json, r#"{"product_id":"p7","category":"Music"}"#);
    }
}
