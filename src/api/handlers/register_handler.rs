//! Registration handlers.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::ApiJson;
use crate::api::AppState;
use crate::domain::{Account, VerificationDispatch};
use crate::errors::{AppError, AppResult};
use crate::validation::{validate_registration, RegisterRequest};

/// Verification dispatch info returned to the client
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationInfo {
    /// Dispatch channel (currently always "email")
    #[schema(example = "email")]
    pub channel: String,
    /// Dispatch timestamp
    pub sent_at: DateTime<Utc>,
}

/// Successful registration response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Opaque account identifier
    #[schema(example = "usr_a1b2c3d4e5")]
    pub user_id: String,
    /// Account lifecycle status
    #[schema(example = "pending_verification")]
    pub status: String,
    /// Simulated verification dispatch details
    pub verification: VerificationInfo,
}

impl From<(Account, VerificationDispatch)> for RegisterResponse {
    fn from((account, dispatch): (Account, VerificationDispatch)) -> Self {
        Self {
            user_id: account.id,
            status: account.status.to_string(),
            verification: VerificationInfo {
                channel: dispatch.channel,
                sent_at: dispatch.sent_at,
            },
        }
    }
}

/// Create registration routes
pub fn register_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/v1/register",
    tag = "Registration",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    if let Some(username) = payload.username.as_deref() {
        tracing::info!("Registration request received for username: {}", username);
    }

    // Received but not used to deduplicate retries yet; logged for tracing
    if let Some(key) = headers
        .get("Idempotency-Key")
        .and_then(|value| value.to_str().ok())
    {
        tracing::info!("Idempotency-Key: {}", key);
    }

    let registration = validate_registration(&payload).map_err(AppError::validation)?;

    let created = state.registration_service.register(registration).await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse::from(created))))
}
