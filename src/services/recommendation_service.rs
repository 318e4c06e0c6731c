use std::cmp::Ordering;

use crate::catalog::{Product, UserProfile};
use crate::models::ScoredProduct;

const SIMILAR_LIMIT: usize = 3;
const PROFILE_LIMIT: usize = 5;

// Rule weights for profile scoring.
const INTEREST_WEIGHT: i64 = 2;
const PREFERRED_WEIGHT: i64 = 3;
const ORGANIC_WEIGHT: i64 = 2;
const EXPERIENCE_WEIGHT: i64 = 1;
const GARDEN_SIZE_WEIGHT: i64 = 1;

/// Cosine similarity between two feature vectors. NaN when either vector has
/// zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    dot / (norm_a * norm_b)
}

/// Top catalog products most similar to `target`, excluding the target
/// itself. Ties keep catalog order (the sort is stable).
pub fn similar_products(target: &Product, catalog: &[Product]) -> Vec<ScoredProduct> {
    let mut scored: Vec<ScoredProduct> = catalog
        .iter()
        .filter(|p| p.name != target.name)
        .map(|p| ScoredProduct {
            name: p.name.clone(),
            score: cosine_similarity(&target.features, &p.features),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(SIMILAR_LIMIT);
    scored
}

/// Weighted rule score for one candidate against a user profile.
pub fn profile_score(profile: &UserProfile, product: &Product) -> i64 {
    let mut score = 0;

    for interest in &profile.interests {
        if has_tag(product, interest) {
            score += INTEREST_WEIGHT;
        }
    }
    if profile
        .preferred_products
        .iter()
        .any(|p| p.eq_ignore_ascii_case(&product.name))
    {
        score += PREFERRED_WEIGHT;
    }
    if profile.prefers_organic && product.organic {
        score += ORGANIC_WEIGHT;
    }
    if has_tag(product, &profile.experience_level) {
        score += EXPERIENCE_WEIGHT;
    }
    if has_tag(product, &profile.garden_size) {
        score += GARDEN_SIZE_WEIGHT;
    }

    score
}

/// Top catalog products for a user profile, ranked by rule score. Ties keep
/// catalog order.
pub fn recommendations_for_profile(
    profile: &UserProfile,
    catalog: &[Product],
) -> Vec<ScoredProduct> {
    let mut scored: Vec<ScoredProduct> = catalog
        .iter()
        .map(|p| ScoredProduct {
            name: p.name.clone(),
            score: profile_score(profile, p) as f64,
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(PROFILE_LIMIT);
    scored
}

fn has_tag(product: &Product, tag: &str) -> bool {
    product.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
}
