use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::errors::AppError;
use crate::models::{
    DemandSupplyForecast, MarketInsights, MarketSeries, PriceOptimization,
    ProfileRecommendations, Signal, SimilarProducts,
};
use crate::services::forecasting_service::{self, FORECAST_HORIZON};
use crate::services::series_generator::{self, SeriesParams};
use crate::services::{insight_service, pricing_service, recommendation_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict/:product", get(predict))
        .route("/market_insights/:product", get(market_insights))
        .route("/recommendations/:product", get(similar_products))
        .route("/recommendations/user/:user", get(profile_recommendations))
        .route("/optimal_price/:product", get(optimal_price))
}

/// Fresh history for one request. Each invocation draws an independent
/// realization; nothing is cached or shared.
fn fresh_history(state: &AppState, rng: &mut StdRng) -> MarketSeries {
    series_generator::generate_history(state.config.history_days, &SeriesParams::default(), rng)
}

async fn predict(
    Path(product): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DemandSupplyForecast>, AppError> {
    let product = state
        .catalog
        .product(&product)
        .ok_or_else(|| AppError::NotFound(format!("product {product}")))?;
    info!("GET /api/predict/{}", product.name);

    let params = SeriesParams::default();
    let mut rng = StdRng::from_os_rng();
    let series = fresh_history(&state, &mut rng);
    // True future weather is unknown; synthesize it from the same generative
    // distribution and hand it to the engine explicitly.
    let future_weather = series_generator::synthesize_future_weather(
        series.len(),
        FORECAST_HORIZON,
        &params,
        &mut rng,
    );

    let demand = forecasting_service::forecast_with_weather(
        &series,
        Signal::Demand,
        &future_weather,
        state.config.season_length,
    )?;
    let supply = forecasting_service::forecast_with_weather(
        &series,
        Signal::Supply,
        &future_weather,
        state.config.season_length,
    )?;

    Ok(Json(DemandSupplyForecast {
        product: product.name.clone(),
        demand,
        supply,
        generated_at: Utc::now(),
    }))
}

async fn market_insights(
    Path(product): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MarketInsights>, AppError> {
    let product = state
        .catalog
        .product(&product)
        .ok_or_else(|| AppError::NotFound(format!("product {product}")))?;
    info!("GET /api/market_insights/{}", product.name);

    let mut rng = StdRng::from_os_rng();
    let series = fresh_history(&state, &mut rng);
    insight_service::market_insights(&product.name, &series, state.config.season_length).map(Json)
}

async fn similar_products(
    Path(product): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SimilarProducts>, AppError> {
    let product = state
        .catalog
        .product(&product)
        .ok_or_else(|| AppError::NotFound(format!("product {product}")))?;
    info!("GET /api/recommendations/{}", product.name);

    let recommendations =
        recommendation_service::similar_products(product, state.catalog.products());

    Ok(Json(SimilarProducts {
        product: product.name.clone(),
        recommendations,
    }))
}

async fn profile_recommendations(
    Path(user): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProfileRecommendations>, AppError> {
    let profile = state
        .catalog
        .user(&user)
        .ok_or_else(|| AppError::NotFound(format!("user {user}")))?;
    info!("GET /api/recommendations/user/{}", profile.username);

    let recommendations =
        recommendation_service::recommendations_for_profile(profile, state.catalog.products());

    Ok(Json(ProfileRecommendations {
        user: profile.username.clone(),
        recommendations,
    }))
}

async fn optimal_price(
    Path(product): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PriceOptimization>, AppError> {
    let product = state
        .catalog
        .product(&product)
        .ok_or_else(|| AppError::NotFound(format!("product {product}")))?;
    info!("GET /api/optimal_price/{}", product.name);

    let mut rng = StdRng::from_os_rng();
    let series = fresh_history(&state, &mut rng);
    pricing_service::optimal_price(
        &product.name,
        &series,
        state.config.grid_resolution,
        Duration::from_millis(state.config.grid_deadline_ms),
    )
    .map(Json)
}
