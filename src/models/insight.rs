use serde::Serialize;

/// Direction of a signal over the trailing window, judged by comparing the
/// last 30 days against the first 30. Ties resolve to `Decreasing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

/// Sign of the zero-lag cross-correlation with a 30-day reference sine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeasonalStrength {
    High,
    Low,
}

/// Response body for `/api/market_insights/{product}`.
#[derive(Debug, Clone, Serialize)]
pub struct MarketInsights {
    pub product: String,
    pub average_demand: f64,
    pub average_supply: f64,
    pub average_price: f64,
    pub demand_trend: TrendDirection,
    pub supply_trend: TrendDirection,
    pub price_trend: TrendDirection,
    pub demand_volatility: f64,
    pub supply_volatility: f64,
    pub price_volatility: f64,
    pub seasonal_demand: SeasonalStrength,
    pub seasonal_supply: SeasonalStrength,
    /// Mean demand over mean supply; positive infinity when mean supply is
    /// exactly zero (serialized as null).
    pub demand_supply_ratio: f64,
    pub price_elasticity: f64,
    pub price_forecast: Vec<f64>,
    pub weather_demand_correlation: f64,
    pub weather_supply_correlation: f64,
}
