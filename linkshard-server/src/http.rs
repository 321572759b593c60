//! HTTP API
//!
//! - `POST /api/url/create` with `{ "url": ... }`
//! - `GET  /api/url/redirect?shortUrl=...`
//! - `GET  /api/url/get-all?page=&limit=`

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use linkshard_types::{ListedUrl, Pagination};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

use crate::error::ServiceError;
use crate::service::UrlMappingService;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

/// Create the API router
pub fn router(service: Arc<UrlMappingService>) -> Router {
    Router::new()
        .route("/api/url/create", post(handle_create))
        .route("/api/url/redirect", get(handle_redirect))
        .route("/api/url/get-all", get(handle_get_all))
        .with_state(service)
}

/// Any origin, no credentials
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
}

// ============================================
// Request / response bodies
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateRequest {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectParams {
    pub short_url: Option<String>,
}

/// Raw listing parameters; bad values fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> u32 {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        positive_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

fn positive_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(default)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedData {
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedData {
    pub original_url: String,
    pub short_url: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<ListedUrl>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(SuccessResponse { success: true, data })).into_response()
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// Client errors carry their message; anything else is logged and hidden
fn service_failure(err: ServiceError, context: &str) -> Response {
    if err.is_client_error() {
        return failure(StatusCode::BAD_REQUEST, err.to_string());
    }
    error!(error = %err, "{}", context);
    failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

// ============================================
// Handlers
// ============================================

/// POST /api/url/create
pub async fn handle_create(
    State(service): State<Arc<UrlMappingService>>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    // Missing, malformed or mistyped bodies all read as "no URL"
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(reason = %rejection, "Unreadable create body");
            CreateRequest::default()
        }
    };

    let url = match request.url.filter(|url| !url.is_empty()) {
        Some(url) => url,
        None => return failure(StatusCode::BAD_REQUEST, "URL is required"),
    };

    match service.create(&url).await {
        Ok(created) => success(
            StatusCode::CREATED,
            CreatedData {
                original_url: url,
                short_url: created.short_url,
                short_code: created.short_code,
            },
        ),
        Err(e) => service_failure(e, "Error creating short URL"),
    }
}

/// GET /api/url/redirect
pub async fn handle_redirect(
    State(service): State<Arc<UrlMappingService>>,
    Query(params): Query<RedirectParams>,
) -> Response {
    let short_url = match params.short_url.filter(|value| !value.is_empty()) {
        Some(value) => value,
        None => return failure(StatusCode::BAD_REQUEST, "Short URL is required"),
    };

    match service.resolve(&short_url).await {
        Ok(Some(original_url)) => success(StatusCode::OK, ResolvedData { original_url, short_url }),
        Ok(None) => failure(StatusCode::NOT_FOUND, "URL not found"),
        Err(e) => service_failure(e, "Error resolving short URL"),
    }
}

/// GET /api/url/get-all
pub async fn handle_get_all(
    State(service): State<Arc<UrlMappingService>>,
    Query(params): Query<ListParams>,
) -> Response {
    match service.list(params.page(), params.limit()).await {
        Ok(page) => (
            StatusCode::OK,
            Json(ListResponse {
                success: true,
                data: page.urls,
                pagination: page.pagination,
            }),
        )
            .into_response(),
        Err(e) => service_failure(e, "Error fetching URLs"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use linkshard_router_core::ShardingConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    fn service() -> Arc<UrlMappingService> {
        let service =
            UrlMappingService::in_memory("http://localhost:3000", ShardingConfig::default());
        Arc::new(service.unwrap())
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn create(url: Option<&str>) -> Result<Json<CreateRequest>, JsonRejection> {
        Ok(Json(CreateRequest {
            url: url.map(str::to_string),
        }))
    }

    fn post_create(content_type: Option<&str>, body: &'static str) -> Request<Body> {
        let mut request = Request::builder().method("POST").uri("/api/url/create");
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }
        request.body(Body::from(body)).unwrap()
    }

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams::default();
        assert_eq!((params.page(), params.limit()), (1, 10));

        let params = ListParams {
            page: Some("0".into()),
            limit: Some("abc".into()),
        };
        assert_eq!((params.page(), params.limit()), (1, 10));

        let params = ListParams {
            page: Some("3".into()),
            limit: Some("25".into()),
        };
        assert_eq!((params.page(), params.limit()), (3, 25));
    }

    #[tokio::test]
    async fn test_create_returns_201() {
        let response = handle_create(State(service()), create(Some("https://example.com"))).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["originalUrl"], "https://example.com");
        let code = body["data"]["shortCode"].as_str().unwrap();
        assert_eq!(body["data"]["shortUrl"], format!("http://localhost:3000/{}", code));
    }

    #[tokio::test]
    async fn test_create_requires_valid_url() {
        let response = handle_create(State(service()), create(None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "URL is required");

        let response = handle_create(State(service()), create(Some("nope"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid URL provided");
    }

    #[tokio::test]
    async fn test_unreadable_create_body_is_missing_url() {
        let cases = [
            (None, ""),
            (Some("application/json"), ""),
            (Some("application/json"), r#"{"url":5}"#),
            (Some("application/json"), "{not json"),
            (Some("text/plain"), r#"{"url":"https://example.com"}"#),
        ];

        for (content_type, body) in cases {
            let response = router(service())
                .oneshot(post_create(content_type, body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
            assert_eq!(body_json(response).await["error"], "URL is required");
        }
    }

    #[tokio::test]
    async fn test_redirect_statuses() {
        let service = service();
        let created = service.create("https://example.com/r").await.unwrap();

        let response = handle_redirect(
            State(service.clone()),
            Query(RedirectParams {
                short_url: Some(created.short_url.clone()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["originalUrl"], "https://example.com/r");
        assert_eq!(body["data"]["shortUrl"], created.short_url);

        let response = handle_redirect(
            State(service.clone()),
            Query(RedirectParams {
                short_url: Some("missing".into()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = handle_redirect(State(service), Query(RedirectParams::default())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_closed_shards_hide_error_detail() {
        let service = service();
        for (_, handle) in service.registry().get_all().unwrap() {
            handle.close().await.unwrap();
        }

        let response = handle_get_all(State(service), Query(ListParams::default())).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_router_serves_get_all() {
        let service = service();
        service.create("https://example.com/1").await.unwrap();
        service.create("https://example.com/2").await.unwrap();

        let response = router(service)
            .oneshot(
                Request::builder()
                    .uri("/api/url/get-all?page=1&limit=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["total"], 2);
        assert_eq!(body["pagination"]["totalPages"], 2);
    }

    #[tokio::test]
    async fn test_router_create_round_trip() {
        let app = router(service());

        let response = app
            .clone()
            .oneshot(post_create(
                Some("application/json"),
                r#"{"url":"https://example.com/x"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let code = body_json(response).await["data"]["shortCode"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/url/redirect?shortUrl={}", code))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["originalUrl"], "https://example.com/x");
    }

    #[tokio::test]
    async fn test_cors_answers_any_origin() {
        let app = router(service()).layer(cors_layer());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/url/get-all")
                    .header("origin", "https://app.example.org")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let preflight = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/url/create")
                    .header("origin", "https://app.example.org")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(preflight.status(), StatusCode::OK);
        assert_eq!(preflight.headers()["access-control-allow-origin"], "*");
        let methods = preflight.headers()["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("POST"));
    }

    #[tokio::test]
    async fn test_no_cors_headers_without_layer() {
        let response = router(service())
            .oneshot(
                Request::builder()
                    .uri("/api/url/get-all")
                    .header("origin", "https://app.example.org")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }
}
