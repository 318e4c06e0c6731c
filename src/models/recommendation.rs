use serde::Serialize;

/// A candidate product with its computed score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredProduct {
    pub name: String,
    pub score: f64,
}

/// Response body for `/api/recommendations/{product}` (similarity mode).
#[derive(Debug, Clone, Serialize)]
pub struct SimilarProducts {
    pub product: String,
    pub recommendations: Vec<ScoredProduct>,
}

/// Response body for `/api/recommendations/user/{user}` (profile mode).
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRecommendations {
    pub user: String,
    pub recommendations: Vec<ScoredProduct>,
}
