//! Per-query types produced while building recommendations.
//!
//! Everything here lives for exactly one query and is never shared.

use data_loader::{Category, ProductId, RatingValue, UserId};
use serde::{Deserialize, Serialize};

/// A product the user bought, enriched for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedProduct {
    pub product_id: ProductId,
    pub rating: RatingValue,
    /// Resolved category, or `"Unknown"` for uncategorized products
    pub category: Category,
}

/// Everything we know about one user for the duration of one query
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub user_id: UserId,
    /// Purchases in product id order
    pub purchased: Vec<PurchasedProduct>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            purchased: Vec::new(),
        }
    }

    /// Whether the user already owns a product
    pub fn owns(&self, product_id: &str) -> bool {
        self.purchased.iter().any(|p| p.product_id == product_id)
    }
}

/// A recommendable product found in one of the user's preferred categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub product_id: ProductId,
    /// The preferred category the product was discovered through
    pub category: Category,
    /// Number of users who purchased the product
    pub popularity: u32,
}

impl Candidate {
    pub fn new(product_id: impl Into<ProductId>, category: impl Into<Category>, popularity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            category: category.into(),
            popularity,
        }
    }
}
