use crate::core::validate::validate_matrix_payload;
use crate::domain::model::Matrix;
use crate::domain::ports::{Storage, PRICING_PATH, SAVE_PRICING_PATH};
use crate::utils::error::{FieldError, PricingError, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct AppState<S: Storage> {
    storage: Arc<S>,
    pricing_file: String,
    default_pricing_file: Option<String>,
}

impl<S: Storage> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            pricing_file: self.pricing_file.clone(),
            default_pricing_file: self.default_pricing_file.clone(),
        }
    }
}

impl<S: Storage> AppState<S> {
    pub fn new(storage: S, pricing_file: String, default_pricing_file: Option<String>) -> Self {
        Self {
            storage: Arc::new(storage),
            pricing_file,
            default_pricing_file,
        }
    }
}

/// Failure of a request, rendered in the fixed response shapes:
/// 422 with a plain `Error` body, or 500 with `{"error": "Unknown Error"}`.
#[derive(Debug)]
pub struct ApiError(PricingError);

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_validation() {
            tracing::warn!("⚠️ Rejected pricing payload: {}", self.0);
            return (StatusCode::UNPROCESSABLE_ENTITY, "Error").into_response();
        }

        tracing::error!("❌ Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Unknown Error" })),
        )
            .into_response()
    }
}

pub fn router<S: Storage + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route(PRICING_PATH, get(get_pricing::<S>))
        .route(SAVE_PRICING_PATH, post(save_pricing::<S>))
        .with_state(state)
}

pub async fn serve<S: Storage + 'static>(addr: SocketAddr, state: AppState<S>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        pricing_file = %state.pricing_file,
        "🚀 Pricing server listening"
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// 讀取已儲存的價格表；沒有則回傳預設價格表
async fn get_pricing<S: Storage + 'static>(
    State(state): State<AppState<S>>,
) -> std::result::Result<Json<Value>, ApiError> {
    if let Some(data) = state.storage.read_file(&state.pricing_file).await? {
        tracing::debug!("Serving pricing from {}", state.pricing_file);
        return Ok(Json(serde_json::from_slice::<Value>(&data).map_err(PricingError::from)?));
    }

    if let Some(default_file) = &state.default_pricing_file {
        if let Some(data) = state.storage.read_file(default_file).await? {
            tracing::debug!("Serving default pricing from {}", default_file);
            return Ok(Json(serde_json::from_slice::<Value>(&data).map_err(PricingError::from)?));
        }
    }

    tracing::debug!("No pricing file found, serving empty matrix");
    let empty = serde_json::to_value(Matrix::empty()).map_err(PricingError::from)?;
    Ok(Json(empty))
}

/// 驗證並寫入價格表，寫入完成後才回應
async fn save_pricing<S: Storage + 'static>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> std::result::Result<Json<Value>, ApiError> {
    tracing::debug!("req.body {}", String::from_utf8_lossy(&body));

    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| PricingError::ValidationError {
            errors: vec![FieldError::new("value", format!("must be valid JSON ({})", e))],
        })?;
    let data = validate_matrix_payload(payload)?;

    let json_data = serde_json::to_string_pretty(&data).map_err(PricingError::from)?;
    state
        .storage
        .write_file(&state.pricing_file, json_data.as_bytes())
        .await?;
    tracing::info!("💾 Pricing saved to {}", state.pricing_file);

    Ok(Json(data))
}
