use std::time::{Duration, Instant};

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{FeatureImportance, MarketSeries, PriceOptimization};
use crate::services::forest::{ForestParams, RegressionForest};
use crate::services::stats;

/// Seed for the shuffle split and bootstrap sampling, keeping the fit
/// deterministic for a given series.
const SPLIT_SEED: u64 = 42;
const TEST_FRACTION: f64 = 0.2;

const FEATURE_NAMES: [&str; 3] = ["demand", "supply", "weather"];

/// Fit a tree ensemble mapping (demand, supply, weather) to price, report its
/// held-out fit quality, then scan a dense grid over the observed input
/// ranges for the highest predicted price. The scan respects a wall-clock
/// deadline; the reported optimum is the best grid point evaluated, not a
/// proven global maximum.
pub fn optimal_price(
    product: &str,
    series: &MarketSeries,
    grid_resolution: usize,
    grid_deadline: Duration,
) -> Result<PriceOptimization, AppError> {
    let n = series.len();
    if n < 10 {
        return Err(AppError::FitFailure(format!(
            "insufficient history for price model: {n} points"
        )));
    }

    let demand = series.demand();
    let supply = series.supply();
    let weather = series.weather();
    let price = series.price();

    if stats::population_variance(&price) < 1e-12 {
        return Err(AppError::FitFailure(
            "price target is constant; nothing to fit".to_string(),
        ));
    }

    let mut x = Array2::zeros((n, 3));
    for i in 0..n {
        x[[i, 0]] = demand[i];
        x[[i, 1]] = supply[i];
        x[[i, 2]] = weather[i];
    }

    // Deterministic 80/20 shuffle split.
    let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
    let mut indices: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        indices.swap(i, j);
    }
    let test_len = ((n as f64) * TEST_FRACTION).round().max(1.0) as usize;
    let (test_idx, train_idx) = indices.split_at(test_len);

    let mut x_train = Array2::zeros((train_idx.len(), 3));
    let mut y_train = Vec::with_capacity(train_idx.len());
    for (row, &i) in train_idx.iter().enumerate() {
        for f in 0..3 {
            x_train[[row, f]] = x[[i, f]];
        }
        y_train.push(price[i]);
    }

    let forest = RegressionForest::fit(&x_train, &y_train, &ForestParams::default(), &mut rng);

    // Held-out error and goodness of fit.
    let y_test: Vec<f64> = test_idx.iter().map(|&i| price[i]).collect();
    let predictions: Vec<f64> = test_idx
        .iter()
        .map(|&i| forest.predict_row(&[x[[i, 0]], x[[i, 1]], x[[i, 2]]]))
        .collect();

    let model_mse = stats::mean(
        &predictions
            .iter()
            .zip(&y_test)
            .map(|(p, y)| (p - y).powi(2))
            .collect::<Vec<f64>>(),
    );
    let test_mean = stats::mean(&y_test);
    let ss_tot: f64 = y_test.iter().map(|y| (y - test_mean).powi(2)).sum();
    let ss_res: f64 = predictions
        .iter()
        .zip(&y_test)
        .map(|(p, y)| (p - y).powi(2))
        .sum();
    let model_r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        warn!("held-out price slice is constant; reporting r2 = 0");
        0.0
    };

    // Exhaustive scan over the cross product of the observed input ranges,
    // bounded by the deadline.
    let (d_lo, d_hi) = stats::min_max(&demand);
    let (s_lo, s_hi) = stats::min_max(&supply);
    let (w_lo, w_hi) = stats::min_max(&weather);
    let d_axis = stats::linspace(d_lo, d_hi, grid_resolution);
    let s_axis = stats::linspace(s_lo, s_hi, grid_resolution);
    let w_axis = stats::linspace(w_lo, w_hi, grid_resolution);

    let deadline = Instant::now() + grid_deadline;
    let total = d_axis.len() * s_axis.len() * w_axis.len();
    let mut evaluated = 0usize;
    let mut best = f64::NEG_INFINITY;

    'scan: for &d in &d_axis {
        if Instant::now() >= deadline {
            break 'scan;
        }
        for &s in &s_axis {
            for &w in &w_axis {
                let predicted = forest.predict_row(&[d, s, w]);
                if predicted > best {
                    best = predicted;
                }
                evaluated += 1;
            }
        }
    }

    if evaluated < total {
        warn!(
            "price grid scan for {product} hit its {:?} deadline after {evaluated}/{total} points",
            grid_deadline
        );
    }
    if !best.is_finite() {
        return Err(AppError::FitFailure(
            "grid scan produced no finite prediction".to_string(),
        ));
    }

    let mut feature_importance: Vec<FeatureImportance> = forest
        .feature_importances()
        .iter()
        .zip(FEATURE_NAMES)
        .map(|(&importance, feature)| FeatureImportance {
            feature: feature.to_string(),
            importance,
        })
        .collect();
    feature_importance.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    info!(
        "optimal price for {product}: {best:.2} (mse {model_mse:.4}, r2 {model_r2:.3}, \
         {evaluated}/{total} grid points)"
    );

    Ok(PriceOptimization {
        product: product.to_string(),
        optimal_price: best,
        model_mse,
        model_r2,
        feature_importance,
    })
}
