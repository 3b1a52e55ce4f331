//! HTTP surface for consolidated quotes.
//!
//! `GET /` answers a fixed health message and `GET /cotacao/{ativo_id}`
//! runs [`QuoteService::consolidate`]. Errors are rendered as
//! `{"detail": "..."}` with the status picked from the [`QuoteError`] kind.

use std::any::Any;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cotacao::models::ConsolidatedAsset;
use cotacao::quote::{QuoteError, QuoteService};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub const HEALTH_MESSAGE: &str = "API de Agregação Financeira Ativa.";

#[derive(Clone)]
pub struct AppState {
    quotes: QuoteService,
}

/// Build the application router around a quote service.
pub fn router(quotes: QuoteService) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/cotacao/{ativo_id}", get(consolidated_quote))
        .fallback(not_found)
        .with_state(AppState { quotes })
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Any origin, method and header, with credentials.
///
/// A literal `*` is not allowed alongside credentials, so the request's own
/// origin, method and headers are echoed back.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn health() -> Json<Value> {
    Json(json!({ "Mensagem": HEALTH_MESSAGE }))
}

async fn consolidated_quote(
    State(state): State<AppState>,
    Path(ativo_id): Path<String>,
) -> Result<Json<ConsolidatedAsset>, ApiError> {
    let asset = state.quotes.consolidate(&ativo_id).await?;
    Ok(Json(asset))
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not Found")
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(panic = %message, "Request handler panicked");
    ApiError::from(QuoteError::Unclassified(message)).into_response()
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Status plus human-readable detail.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        let status = match &err {
            QuoteError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            QuoteError::AssetNotFound { .. } => StatusCode::NOT_FOUND,
            QuoteError::PriceValidation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            QuoteError::VolumeValidation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            QuoteError::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}
