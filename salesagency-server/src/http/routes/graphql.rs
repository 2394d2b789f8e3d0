//! GraphQL endpoint and playground
//!
//! - POST /query - execute a GraphQL request
//! - GET / - GraphiQL pointed at /query

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::http::server::AppState;

/// GraphQL endpoint path
pub const ENDPOINT: &str = "/query";

/// POST /query
async fn execute(
    State(state): State<Arc<AppState>>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(state.schema.execute(request).await)
}

/// GET /
async fn playground() -> impl IntoResponse {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint(ENDPOINT)
            .title("salesagency")
            .finish(),
    )
}

/// GraphQL routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(ENDPOINT, post(execute))
        .route("/", get(playground))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::http::server::{app, ServerConfig};

    /// Router over a pool that never connects; only schema-level paths run.
    fn test_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        app(AppState::new(pool), &ServerConfig::default())
    }

    #[tokio::test]
    async fn playground_points_at_endpoint() {
        let response = test_app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/query"));
    }

    #[tokio::test]
    async fn introspection_over_http() {
        let request = Request::post(ENDPOINT)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"query":"{ __type(name: \"AIAgent\") { name } }"}"#))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["__type"]["name"], "AIAgent");
    }

    #[tokio::test]
    async fn validation_error_carries_code() {
        let request = Request::post(ENDPOINT)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"query":"{ leads(offset: -5) { id } }"}"#))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");
    }
}
