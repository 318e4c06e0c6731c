mod forecast;
mod insight;
mod pricing;
mod recommendation;
mod series;

pub use forecast::{DemandSupplyForecast, ForecastPoint, SignalForecast};
pub use insight::{MarketInsights, SeasonalStrength, TrendDirection};
pub use pricing::{FeatureImportance, PriceOptimization};
pub use recommendation::{ProfileRecommendations, ScoredProduct, SimilarProducts};
pub use series::{MarketSeries, SeriesPoint, Signal};
