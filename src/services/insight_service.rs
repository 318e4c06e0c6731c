use std::f64::consts::TAU;

use tracing::debug;

use crate::errors::AppError;
use crate::models::{MarketInsights, MarketSeries, SeasonalStrength, TrendDirection};
use crate::services::forecasting_service::{self, FORECAST_HORIZON};
use crate::services::stats;

/// Window compared against itself at the other end of the history for trend
/// labels, and the period of the seasonal reference wave.
const TREND_WINDOW: usize = 30;
const SEASONAL_REFERENCE_PERIOD: f64 = 30.0;

/// Compute the full descriptive report for one product's market history.
/// Every statistic is a pure function of the series; the only model fit is
/// the univariate price forecast.
pub fn market_insights(
    product: &str,
    series: &MarketSeries,
    season_length: usize,
) -> Result<MarketInsights, AppError> {
    if series.is_empty() {
        return Err(AppError::DegenerateInput("empty market series".to_string()));
    }

    let demand = series.demand();
    let supply = series.supply();
    let price = series.price();
    let weather = series.weather();

    let average_demand = stats::mean(&demand);
    let average_supply = stats::mean(&supply);
    let average_price = stats::mean(&price);

    // Mean demand over mean supply; positive infinity when supply averages
    // to exactly zero.
    let demand_supply_ratio = if average_supply == 0.0 {
        f64::INFINITY
    } else {
        average_demand / average_supply
    };

    let price_elasticity =
        mean_fractional_change(&demand) / mean_fractional_change(&price);

    let price_forecast = forecasting_service::forecast_price(series, season_length, FORECAST_HORIZON)?;

    debug!(product, average_demand, average_supply, "market insights computed");

    Ok(MarketInsights {
        product: product.to_string(),
        average_demand,
        average_supply,
        average_price,
        demand_trend: trend_label(&demand),
        supply_trend: trend_label(&supply),
        price_trend: trend_label(&price),
        demand_volatility: stats::population_std_dev(&demand) / average_demand,
        supply_volatility: stats::population_std_dev(&supply) / average_supply,
        price_volatility: stats::population_std_dev(&price) / average_price,
        seasonal_demand: seasonal_label(&demand),
        seasonal_supply: seasonal_label(&supply),
        demand_supply_ratio,
        price_elasticity,
        price_forecast,
        weather_demand_correlation: stats::pearson(&weather, &demand),
        weather_supply_correlation: stats::pearson(&weather, &supply),
    })
}

/// Compare the mean of the trailing window against the leading one. Strictly
/// greater reads as increasing; ties resolve to decreasing.
fn trend_label(values: &[f64]) -> TrendDirection {
    let window = TREND_WINDOW.min(values.len());
    let first = stats::mean(&values[..window]);
    let last = stats::mean(&values[values.len() - window..]);
    if last > first {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    }
}

/// Sign of the zero-lag cross-correlation with a fixed-period sine wave.
fn seasonal_label(values: &[f64]) -> SeasonalStrength {
    let score: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &v)| v * (i as f64 * TAU / SEASONAL_REFERENCE_PERIOD).sin())
        .sum();
    if score > 0.0 {
        SeasonalStrength::High
    } else {
        SeasonalStrength::Low
    }
}

/// Mean of the day-over-day fractional changes. NaN when fewer than two
/// points exist.
fn mean_fractional_change(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let changes: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    stats::mean(&changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeriesPoint;
    use crate::services::series_generator::{self, SeriesParams};
    use chrono::{Duration, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn series_with(demand: impl Fn(usize) -> f64, supply: impl Fn(usize) -> f64) -> MarketSeries {
        let today = Utc::now().date_naive();
        let days = 365;
        let points = (0..days)
            .map(|i| SeriesPoint {
                date: today - Duration::days((days - 1 - i) as i64),
                demand: demand(i),
                supply: supply(i),
                price: 3.0 + ((i % 7) as f64) * 0.1,
                weather: 20.0 + ((i % 5) as f64),
            })
            .collect();
        MarketSeries::new(points)
    }

    #[test]
    fn zero_mean_supply_reports_infinite_ratio() {
        let series = series_with(|i| 100.0 + (i % 3) as f64, |_| 0.0);
        let insights = market_insights("Tomatoes", &series, 12).unwrap();
        assert!(insights.demand_supply_ratio.is_infinite());
        assert!(insights.demand_supply_ratio.is_sign_positive());
    }

    #[test]
    fn rising_tail_reads_as_increasing() {
        let values: Vec<f64> = (0..365).map(|i| i as f64).collect();
        assert_eq!(trend_label(&values), TrendDirection::Increasing);
    }

    #[test]
    fn equal_window_means_read_as_decreasing() {
        let values = vec![42.0; 365];
        assert_eq!(trend_label(&values), TrendDirection::Decreasing);
    }

    #[test]
    fn falling_tail_reads_as_decreasing() {
        let values: Vec<f64> = (0..365).map(|i| 365.0 - i as f64).collect();
        assert_eq!(trend_label(&values), TrendDirection::Decreasing);
    }

    #[test]
    fn in_phase_sine_scores_high_seasonality() {
        let values: Vec<f64> = (0..360)
            .map(|i| (i as f64 * TAU / 30.0).sin() * 10.0)
            .collect();
        assert_eq!(seasonal_label(&values), SeasonalStrength::High);
    }

    #[test]
    fn anti_phase_sine_scores_low_seasonality() {
        let values: Vec<f64> = (0..360)
            .map(|i| -(i as f64 * TAU / 30.0).sin() * 10.0)
            .collect();
        assert_eq!(seasonal_label(&values), SeasonalStrength::Low);
    }

    #[test]
    fn generated_history_yields_averages_in_generator_ranges() {
        // Fixed-seed end-to-end scenario over a full year of history.
        let mut rng = StdRng::seed_from_u64(42);
        let series = series_generator::generate_history(365, &SeriesParams::default(), &mut rng);
        let insights = market_insights("Tomatoes", &series, 12).unwrap();

        // Uniform base 50..200 plus bounded seasonal and noise terms.
        assert!(insights.average_demand > 50.0 && insights.average_demand < 200.0);
        // Uniform base 40..180.
        assert!(insights.average_supply > 40.0 && insights.average_supply < 180.0);
        // Uniform base 1.5..5.0.
        assert!(insights.average_price > 1.0 && insights.average_price < 5.5);

        assert_eq!(insights.price_forecast.len(), FORECAST_HORIZON);
        assert!(insights.weather_demand_correlation.abs() <= 1.0);
        assert!(insights.weather_supply_correlation.abs() <= 1.0);
        assert!(insights.demand_volatility > 0.0);
    }
}
