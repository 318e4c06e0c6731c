use chrono::Duration;
use tracing::debug;

use crate::errors::AppError;
use crate::models::{ForecastPoint, MarketSeries, Signal, SignalForecast};
use crate::services::stats;

/// Fixed forecast horizon in days.
pub const FORECAST_HORIZON: usize = 30;

// Smoothing parameters for level, trend and seasonal components.
const ALPHA: f64 = 0.3;
const BETA: f64 = 0.1;
const GAMMA: f64 = 0.2;

const Z_95: f64 = 1.96;

/// Fitted state of the seasonal smoother after one pass over the history.
struct SmoothingFit {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    residual_std: f64,
    fitted_len: usize,
}

impl SmoothingFit {
    /// Point forecast `h` steps past the end of the fitted history (h >= 1).
    fn project(&self, h: usize) -> f64 {
        let season = self.seasonals[(self.fitted_len + h - 1) % self.seasonals.len()];
        self.level + self.trend * h as f64 + season
    }
}

/// Additive seasonal exponential smoothing (level + trend + seasonal cycle),
/// fit fresh on each call. Requires at least two full seasonal cycles and a
/// non-constant series; anything less is a fit failure, never a partial
/// forecast.
fn fit_seasonal_smoothing(values: &[f64], season: usize) -> Result<SmoothingFit, AppError> {
    if season < 2 {
        return Err(AppError::DegenerateInput(format!(
            "seasonal cycle of {season} is too short to model"
        )));
    }
    if values.len() < 2 * season {
        return Err(AppError::FitFailure(format!(
            "need at least {} points for a {season}-period seasonal fit, got {}",
            2 * season,
            values.len()
        )));
    }
    if stats::population_variance(values) < 1e-12 {
        return Err(AppError::FitFailure(
            "series is constant; nothing to fit".to_string(),
        ));
    }

    // Initialize components from the full cycles in the history.
    let cycles = values.len() / season;
    let cycle_avg: Vec<f64> = (0..cycles)
        .map(|c| stats::mean(&values[c * season..(c + 1) * season]))
        .collect();

    let mut seasonals: Vec<f64> = (0..season)
        .map(|i| {
            (0..cycles)
                .map(|c| values[c * season + i] - cycle_avg[c])
                .sum::<f64>()
                / cycles as f64
        })
        .collect();
    let mut level = cycle_avg[0];
    let mut trend = (cycle_avg[1] - cycle_avg[0]) / season as f64;

    // One-step-ahead residuals drive the confidence bounds; the first cycle
    // is warm-up and excluded.
    let mut residuals = Vec::with_capacity(values.len());
    for (i, &value) in values.iter().enumerate() {
        let seasonal = seasonals[i % season];
        let one_step = level + trend + seasonal;
        if i >= season {
            residuals.push(value - one_step);
        }

        let prev_level = level;
        level = ALPHA * (value - seasonal) + (1.0 - ALPHA) * (level + trend);
        trend = BETA * (level - prev_level) + (1.0 - BETA) * trend;
        seasonals[i % season] = GAMMA * (value - level) + (1.0 - GAMMA) * seasonal;
    }

    Ok(SmoothingFit {
        level,
        trend,
        seasonals,
        residual_std: stats::population_std_dev(&residuals),
        fitted_len: values.len(),
    })
}

/// Forecast `target` over `future_weather.len()` days with weather as an
/// exogenous regressor: a least-squares stage absorbs the weather effect, the
/// seasonal smoother models the residuals, and the regression contribution is
/// added back using the caller-supplied future covariates.
pub fn forecast_with_weather(
    series: &MarketSeries,
    target: Signal,
    future_weather: &[f64],
    season_length: usize,
) -> Result<SignalForecast, AppError> {
    let horizon = future_weather.len();
    if horizon == 0 {
        return Err(AppError::DegenerateInput(
            "empty forecast horizon".to_string(),
        ));
    }
    let last_date = series
        .last_date()
        .ok_or_else(|| AppError::DegenerateInput("empty market series".to_string()))?;

    let values = target.values(series);
    if stats::population_variance(&values) < 1e-12 {
        return Err(AppError::FitFailure(format!(
            "{} series is constant; nothing to fit",
            target.name()
        )));
    }

    let weather = series.weather();
    let (intercept, slope) = stats::linear_fit(&weather, &values);
    let residuals: Vec<f64> = values
        .iter()
        .zip(&weather)
        .map(|(&y, &w)| y - (intercept + slope * w))
        .collect();

    let fit = fit_seasonal_smoothing(&residuals, season_length)?;
    debug!(
        signal = target.name(),
        slope,
        residual_std = fit.residual_std,
        "seasonal smoothing fit"
    );

    let sigma = fit.residual_std;
    let points = (1..=horizon)
        .map(|h| {
            let predicted = fit.project(h) + intercept + slope * future_weather[h - 1];
            // Bounds widen with the horizon, matching the growth of one-step
            // residual uncertainty.
            let margin = Z_95 * sigma * ((h as f64) / horizon as f64).sqrt();
            ForecastPoint {
                date: (last_date + Duration::days(h as i64)).to_string(),
                predicted_value: predicted,
                lower_bound: predicted - margin,
                upper_bound: predicted + margin,
            }
        })
        .collect();

    Ok(SignalForecast {
        signal: target.name().to_string(),
        points,
        confidence_level: 0.95,
        diagnostics: Some(format!(
            "additive seasonal smoothing (period {season_length}) over weather-regression \
             residuals; weather slope {slope:.3}, residual sigma {sigma:.3}"
        )),
    })
}

/// Univariate seasonal price forecast used by the market insights report.
pub fn forecast_price(
    series: &MarketSeries,
    season_length: usize,
    horizon: usize,
) -> Result<Vec<f64>, AppError> {
    let fit = fit_seasonal_smoothing(&series.price(), season_length)?;
    Ok((1..=horizon).map(|h| fit.project(h)).collect())
}
