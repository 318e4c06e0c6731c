//! Router-level tests for the analytics API: auth surfaces, error payloads,
//! and the response contracts of all five endpoints.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use agrimarket_backend::app::create_app;
use agrimarket_backend::catalog::Catalog;
use agrimarket_backend::config::AppConfig;
use agrimarket_backend::state::AppState;

const TEST_TOKEN: &str = "test-token";

fn test_state() -> AppState {
    let config = AppConfig {
        api_token: TEST_TOKEN.to_string(),
        // Small grid keeps the optimizer test fast; the deadline stays
        // generous so the scan always completes.
        grid_resolution: 8,
        grid_deadline_ms: 30_000,
        ..AppConfig::default()
    };
    AppState {
        config: Arc::new(config),
        catalog: Arc::new(Catalog::seeded()),
    }
}

async fn get_authed(path: &str) -> (StatusCode, Value) {
    let app = create_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri(path)
                .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = create_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/predict/Tomatoes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let app = create_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/market_insights/Tomatoes")
                .header(header::AUTHORIZATION, "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = create_app(test_state());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_product_is_not_found_with_error_payload() {
    let (status, body) = get_authed("/api/predict/Durian").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Durian"));
}

#[tokio::test]
async fn predict_returns_thirty_days_of_ordered_bounds() {
    let (status, body) = get_authed("/api/predict/Tomatoes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"], "Tomatoes");

    for signal in ["demand", "supply"] {
        let points = body[signal]["points"].as_array().unwrap();
        assert_eq!(points.len(), 30, "{signal} horizon must be 30 days");
        for point in points {
            let predicted = point["predicted_value"].as_f64().unwrap();
            let lower = point["lower_bound"].as_f64().unwrap();
            let upper = point["upper_bound"].as_f64().unwrap();
            assert!(lower <= predicted && predicted <= upper);
        }
    }
}

#[tokio::test]
async fn market_insights_reports_generator_ranges() {
    let (status, body) = get_authed("/api/market_insights/Carrots").await;
    assert_eq!(status, StatusCode::OK);

    let average_demand = body["average_demand"].as_f64().unwrap();
    let average_supply = body["average_supply"].as_f64().unwrap();
    let average_price = body["average_price"].as_f64().unwrap();
    assert!(average_demand > 50.0 && average_demand < 200.0);
    assert!(average_supply > 40.0 && average_supply < 180.0);
    assert!(average_price > 1.0 && average_price < 5.5);

    for trend in ["demand_trend", "supply_trend", "price_trend"] {
        let label = body[trend].as_str().unwrap();
        assert!(label == "increasing" || label == "decreasing");
    }
    for seasonal in ["seasonal_demand", "seasonal_supply"] {
        let label = body[seasonal].as_str().unwrap();
        assert!(label == "High" || label == "Low");
    }
    assert_eq!(body["price_forecast"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn recommendations_exclude_the_query_and_cap_at_three() {
    let (status, body) = get_authed("/api/recommendations/Tomatoes").await;
    assert_eq!(status, StatusCode::OK);

    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(!recommendations.is_empty() && recommendations.len() <= 3);
    for entry in recommendations {
        assert_ne!(entry["name"], "Tomatoes");
    }
    // Descending similarity.
    let scores: Vec<f64> = recommendations
        .iter()
        .map(|r| r["score"].as_f64().unwrap())
        .collect();
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn profile_recommendations_cap_at_five() {
    let (status, body) = get_authed("/api/recommendations/user/sprout").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], "sprout");

    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(!recommendations.is_empty() && recommendations.len() <= 5);
    // Herbs matches every rule for this profile and must rank first.
    assert_eq!(recommendations[0]["name"], "Herbs");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (status, _) = get_authed("/api/recommendations/user/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn optimal_price_reports_fit_quality() {
    let (status, body) = get_authed("/api/optimal_price/Peppers").await;
    assert_eq!(status, StatusCode::OK);

    assert!(body["optimal_price"].as_f64().unwrap().is_finite());
    assert!(body["model_mse"].as_f64().unwrap() >= 0.0);
    assert!(body["model_r2"].as_f64().unwrap() <= 1.0);

    let importances = body["feature_importance"].as_array().unwrap();
    assert_eq!(importances.len(), 3);
    let values: Vec<f64> = importances
        .iter()
        .map(|f| f["importance"].as_f64().unwrap())
        .collect();
    for pair in values.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}
