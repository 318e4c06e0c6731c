use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single point in a forecast time series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: String,
    pub predicted_value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Fixed-horizon forecast for one market signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalForecast {
    pub signal: String,
    pub points: Vec<ForecastPoint>,
    pub confidence_level: f64,
    pub diagnostics: Option<String>,
}

/// Response body for `/api/predict/{product}`.
#[derive(Debug, Clone, Serialize)]
pub struct DemandSupplyForecast {
    pub product: String,
    pub demand: SignalForecast,
    pub supply: SignalForecast,
    pub generated_at: DateTime<Utc>,
}
