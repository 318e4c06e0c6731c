use std::f64::consts::TAU;
use std::ops::Range;

use chrono::{Duration, Utc};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::models::{MarketSeries, SeriesPoint};

/// Generative parameters for one synthetic market history. Each signal is a
/// per-day uniform base plus a fixed-period seasonal wave plus Gaussian noise.
#[derive(Debug, Clone)]
pub struct SeriesParams {
    pub demand_base: Range<i64>,
    pub demand_season_period: f64,
    pub demand_season_amplitude: f64,
    pub demand_noise_sigma: f64,
    pub supply_base: Range<i64>,
    pub supply_season_period: f64,
    pub supply_season_amplitude: f64,
    pub supply_noise_sigma: f64,
    pub price_base: Range<f64>,
    pub price_season_period: f64,
    pub price_season_amplitude: f64,
    pub price_noise_sigma: f64,
    pub weather_mean: f64,
    pub weather_sigma: f64,
    pub weather_season_period: f64,
    pub weather_season_amplitude: f64,
}

impl Default for SeriesParams {
    fn default() -> Self {
        Self {
            demand_base: 50..200,
            demand_season_period: 30.0,
            demand_season_amplitude: 20.0,
            demand_noise_sigma: 10.0,
            supply_base: 40..180,
            supply_season_period: 30.0,
            supply_season_amplitude: 15.0,
            supply_noise_sigma: 8.0,
            price_base: 1.5..5.0,
            price_season_period: 60.0,
            price_season_amplitude: 0.5,
            price_noise_sigma: 0.2,
            weather_mean: 20.0,
            weather_sigma: 5.0,
            weather_season_period: 365.0,
            weather_season_amplitude: 10.0,
        }
    }
}

/// Produce `days` points of synthetic history ending today, oldest first.
/// Total over any `days > 0`; consumes nothing beyond the RNG passed in, so a
/// seeded `StdRng` reproduces the same history.
pub fn generate_history(days: usize, params: &SeriesParams, rng: &mut impl Rng) -> MarketSeries {
    let demand_noise = Normal::new(0.0, params.demand_noise_sigma).expect("non-negative sigma");
    let supply_noise = Normal::new(0.0, params.supply_noise_sigma).expect("non-negative sigma");
    let price_noise = Normal::new(0.0, params.price_noise_sigma).expect("non-negative sigma");
    let weather_noise =
        Normal::new(params.weather_mean, params.weather_sigma).expect("non-negative sigma");

    let today = Utc::now().date_naive();
    let mut points = Vec::with_capacity(days);

    for i in 0..days {
        let t = i as f64;
        let date = today - Duration::days((days - 1 - i) as i64);

        let demand = rng.random_range(params.demand_base.clone()) as f64
            + (t * TAU / params.demand_season_period).sin() * params.demand_season_amplitude
            + demand_noise.sample(rng);
        let supply = rng.random_range(params.supply_base.clone()) as f64
            + (t * TAU / params.supply_season_period).cos() * params.supply_season_amplitude
            + supply_noise.sample(rng);
        let price = rng.random_range(params.price_base.clone())
            + (t * TAU / params.price_season_period).sin() * params.price_season_amplitude
            + price_noise.sample(rng);
        let weather = weather_noise.sample(rng)
            + (t * TAU / params.weather_season_period).sin() * params.weather_season_amplitude;

        points.push(SeriesPoint {
            date,
            demand,
            supply,
            price,
            weather,
        });
    }

    MarketSeries::new(points)
}

/// Synthesize future weather draws from the same generative distribution as
/// history, continuing the seasonal phase where the history left off. True
/// future covariates are unknown; callers that have them should pass them to
/// the forecast engine instead.
pub fn synthesize_future_weather(
    history_len: usize,
    horizon: usize,
    params: &SeriesParams,
    rng: &mut impl Rng,
) -> Vec<f64> {
    let noise = Normal::new(params.weather_mean, params.weather_sigma).expect("non-negative sigma");
    (0..horizon)
        .map(|h| {
            let t = (history_len + h) as f64;
            noise.sample(rng)
                + (t * TAU / params.weather_season_period).sin() * params.weather_season_amplitude
        })
        .collect()
}
