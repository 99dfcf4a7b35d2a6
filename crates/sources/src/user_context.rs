//! Helper functions to build a UserProfile from the Catalog
//!
//! The profile is the "purchased products" half of every response: each
//! product the user bought, with its rating and resolved category.

use crate::types::{PurchasedProduct, UserProfile};
use data_loader::Catalog;

/// Build the purchase profile for a user.
///
/// Returns `None` when the user is not in the dataset. That is a normal
/// outcome for the caller, not an error. Uncategorized products keep their
/// place in the profile under the `"Unknown"` category.
pub fn build_user_profile(catalog: &Catalog, user_id: &str) -> Option<UserProfile> {
    let ratings = catalog.get_user_ratings(user_id)?;

    let mut profile = UserProfile::new(user_id);
    profile.purchased = ratings
        .iter()
        .map(|(product_id, &rating)| PurchasedProduct {
            product_id: product_id.clone(),
            rating,
            category: catalog.resolve_category(product_id).to_string(),
        })
        .collect();

    Some(profile)
}
