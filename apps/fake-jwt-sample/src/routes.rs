//! HTTP routes for the sample service.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fake_jwt_bearer::{
    AuthScheme, Authenticated, FakeJwtBearerHandler, FakeJwtBearerLayer, forbidden_response,
};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tower_http::trace::TraceLayer;

const ADMIN_ROLE: &str = "admin";

const FORECAST_DAYS: i64 = 5;

const SUMMARIES: [&str; 10] = [
    "Freezing", "Bracing", "Chilly", "Cool", "Mild", "Warm", "Balmy", "Hot", "Sweltering",
    "Scorching",
];

#[derive(Debug, Clone, Serialize)]
pub struct WeatherForecast {
    pub date: String,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub summary: &'static str,
}

impl WeatherForecast {
    fn for_day(today: time::Date, offset: i64) -> Self {
        let date = today + Duration::days(offset);
        // Deterministic spread over -20..55 C, keyed on the calendar day.
        let seed = i32::from(date.ordinal()) * 7 + i32::from(date.day());
        let temperature_c = seed.rem_euclid(75) - 20;
        let bucket = usize::try_from((temperature_c + 20).div_euclid(8)).unwrap_or_default();

        Self {
            date: date.to_string(),
            temperature_c,
            temperature_f: 32 + (temperature_c * 9).div_euclid(5),
            summary: SUMMARIES[bucket.min(SUMMARIES.len() - 1)],
        }
    }
}

fn forecast() -> Vec<WeatherForecast> {
    let today = OffsetDateTime::now_utc().date();
    (1..=FORECAST_DAYS)
        .map(|offset| WeatherForecast::for_day(today, offset))
        .collect()
}

/// Build the application routes.
///
/// - `GET /health` - liveness, open to anyone
/// - `GET /api/weatherforecast` - any authenticated caller
/// - `GET /api/weatherforecast/admin` - callers in the `admin` role
#[must_use]
pub fn build_routes(handler: Arc<FakeJwtBearerHandler>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/weatherforecast", get(weather_forecast))
        .route("/api/weatherforecast/admin", get(admin_weather_forecast))
        .layer(FakeJwtBearerLayer::new(handler))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn weather_forecast(Authenticated(ticket): Authenticated) -> Json<Vec<WeatherForecast>> {
    tracing::debug!(user = ?ticket.principal().name(), "Serving forecast");
    Json(forecast())
}

async fn admin_weather_forecast(
    Authenticated(ticket): Authenticated,
    scheme: AuthScheme,
) -> Response {
    if !ticket.principal().is_in_role(ADMIN_ROLE) {
        tracing::debug!(user = ?ticket.principal().name(), "Caller is not an admin");
        return forbidden_response(&scheme).await;
    }
    Json(forecast()).into_response()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use fake_jwt_bearer::{BearerValueType, FakeJwtBearerConfig};
    use fake_jwt_bearer_sdk::client::FakeBearerRequestExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn app_with(config: FakeJwtBearerConfig) -> Router {
        build_routes(Arc::new(FakeJwtBearerHandler::new(config)))
    }

    fn app() -> Router {
        app_with(FakeJwtBearerConfig::default())
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn forecast_covers_next_five_days() {
        let days = forecast();
        assert_eq!(days.len(), 5);
        for day in &days {
            assert!((-20..55).contains(&day.temperature_c));
            assert!(SUMMARIES.contains(&day.summary));
        }
    }

    #[tokio::test]
    async fn health_is_public() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn forecast_requires_token() {
        let request = Request::builder()
            .uri("/api/weatherforecast")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "FakeBearer");
    }

    #[tokio::test]
    async fn forecast_with_fake_token() {
        let request = Request::builder()
            .uri("/api/weatherforecast")
            .fake_bearer_json(&json!({ "sub": "8d2f6b1e", "role": ["sub_role", "admin"] }))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn real_bearer_scheme_is_ignored() {
        let request = Request::builder()
            .uri("/api/weatherforecast")
            .bearer_token("Bearer", r#"{"sub":"Bob"}"#)
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_forecast_needs_admin_role() {
        let request = Request::builder()
            .uri("/api/weatherforecast/admin")
            .fake_bearer_user_with_roles("Bob", &["reader"])
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_forecast_for_admin() {
        let request = Request::builder()
            .uri("/api/weatherforecast/admin")
            .fake_bearer_user_with_roles("Alice", &[ADMIN_ROLE])
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unsigned_jwt_when_configured() {
        let app = app_with(FakeJwtBearerConfig {
            bearer_value_type: BearerValueType::Jwt,
            ..FakeJwtBearerConfig::default()
        });
        let claims = json!({ "sub": "Carol", "role": "admin" });
        let request = Request::builder()
            .uri("/api/weatherforecast/admin")
            .fake_jwt_bearer_token(claims.as_object().cloned().unwrap())
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
