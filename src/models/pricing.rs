use serde::Serialize;

/// Ranked contribution of one model input.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Response body for `/api/optimal_price/{product}`. The optimal price is the
/// best grid point found, not a proven global maximum.
#[derive(Debug, Clone, Serialize)]
pub struct PriceOptimization {
    pub product: String,
    pub optimal_price: f64,
    pub model_mse: f64,
    pub model_r2: f64,
    pub feature_importance: Vec<FeatureImportance>,
}
