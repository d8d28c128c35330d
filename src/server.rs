//! HTTP application: locale-routed page shell plus a small locale API.

use crate::i18n::{LocaleError, LocaleRegistry, MetricsReport, RoutingMetrics};
use crate::middleware::{route_locale, RequestLocale};
use crate::preference::locale_cookie;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for handlers and the locale router.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LocaleRegistry>,
    pub metrics: Arc<RoutingMetrics>,
}

impl AppState {
    pub fn new(registry: LocaleRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            metrics: Arc::new(RoutingMetrics::new()),
        }
    }
}

/// Build the application router with locale routing in front of every route.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/locales", get(list_locales))
        .route("/api/locale", post(select_locale))
        .route("/api/locale/metrics", get(metrics))
        .fallback(page)
        .layer(middleware::from_fn_with_state(state.clone(), route_locale))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Errors returned by the locale API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Locale(#[from] LocaleError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::Locale(_) => (StatusCode::BAD_REQUEST, "unsupported_locale"),
        };
        let body = ErrorBody {
            error,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
struct LocaleInfo {
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    is_default: bool,
}

async fn list_locales(State(state): State<AppState>) -> Json<Vec<LocaleInfo>> {
    let default = state.registry.default_locale();
    let locales = state
        .registry
        .list()
        .iter()
        .map(|config| LocaleInfo {
            code: config.code,
            name: config.name,
            native_name: config.native_name,
            is_default: config.code == default.code(),
        })
        .collect();
    Json(locales)
}

#[derive(Debug, Deserialize)]
struct SelectLocale {
    locale: String,
}

/// Explicit selection: persist the chosen locale in the cookie.
async fn select_locale(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SelectLocale>,
) -> Result<impl IntoResponse, ApiError> {
    let locale = state.registry.require(&body.locale)?;
    info!("Locale explicitly selected: '{}'", locale);
    Ok((jar.add(locale_cookie(locale)), StatusCode::NO_CONTENT))
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.metrics.report())
}

/// Page shell standing in for the rendering pipeline.
///
/// Only requests the locale router let through carry a [`RequestLocale`];
/// anything else reaching here (bypassed files, unknown API paths) is a 404.
async fn page(request_locale: Option<Extension<RequestLocale>>) -> Response {
    let Some(Extension(RequestLocale(locale))) = request_locale else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"{}\"><head><meta charset=\"utf-8\"></head><body></body></html>\n",
        locale
    ))
    .into_response()
}
