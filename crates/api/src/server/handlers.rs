//! Axum request handlers for all service endpoints.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    MessageResponse,
};
use common::ServiceError;
use tracing::{debug, error, warn};

use super::state::AppState;
use crate::crypto;
use crate::nutrition::{NutritionError, Recognition};

/// Body of `GET /api`.
pub const GREETING: &str = "Welcome to the Calorie Counter AI API!";

/// Body of `POST /api/analyze` when the provider finds no food.
pub const NO_FOOD_DETECTED: &str = "No food detected in the image.";

/// Multipart field carrying the uploaded image.
const IMAGE_FIELD: &str = "image";

/// Handler error: a [`ServiceError`] rendered as a JSON [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<NutritionError> for ApiError {
    fn from(err: NutritionError) -> Self {
        let mapped = match &err {
            NutritionError::MissingCredentials | NutritionError::Auth(_) => {
                ServiceError::UpstreamAuth(err.to_string())
            }
            NutritionError::Request(_) => ServiceError::Upstream(err.to_string()),
            NutritionError::Provider(message) => ServiceError::BadRequest(message.clone()),
            NutritionError::Client(_) => ServiceError::Internal(err.to_string()),
        };
        Self(mapped)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        let body: ErrorResponse = self.0.to_response();
        (status, Json(body)).into_response()
    }
}

/// `GET /api` — greeting and liveness check.
pub async fn greeting() -> Json<MessageResponse> {
    Json(MessageResponse::new(GREETING))
}

/// `POST /api/encrypt` — encrypt `text` under a key derived from `password`.
pub async fn encrypt(Json(req): Json<EncryptRequest>) -> Result<Json<EncryptResponse>, ApiError> {
    let EncryptRequest { text, password } = req;
    let encrypted_text = run_blocking(move || crypto::encrypt(&text, &password))
        .await?
        .map_err(|e| ServiceError::Internal(e.to_string()))?;

    Ok(Json(EncryptResponse { encrypted_text }))
}

/// `POST /api/decrypt` — recover the plaintext of an `/api/encrypt` payload.
///
/// Every failure yields the same 400 body, whatever its cause.
pub async fn decrypt(Json(req): Json<DecryptRequest>) -> Result<Json<DecryptResponse>, ApiError> {
    let DecryptRequest {
        encrypted_text,
        password,
    } = req;

    match run_blocking(move || crypto::decrypt(&encrypted_text, &password)).await? {
        Ok(decrypted_text) => Ok(Json(DecryptResponse { decrypted_text })),
        Err(e) => {
            debug!(reason = %e, "decryption rejected");
            Err(ServiceError::InvalidCiphertext.into())
        }
    }
}

/// `POST /api/analyze` — recognise the food in an uploaded image.
///
/// Expects `multipart/form-data` with an `image` file field.
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let image = read_image(&mut multipart).await?;

    match state.nutrition.recognize(&image).await? {
        Recognition::Food(food) => Ok(Json(food).into_response()),
        Recognition::NoFood => Ok(Json(MessageResponse::new(NO_FOOD_DETECTED)).into_response()),
    }
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Return the bytes of the first `image` field in the form.
async fn read_image(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| ServiceError::BadRequest(e.body_text()).into());
        }
    }
    Err(ServiceError::BadRequest(format!("missing {IMAGE_FIELD} field")).into())
}

/// Run CPU-bound vault work off the async worker threads.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!(error = %e, "vault task did not complete");
        ApiError(ServiceError::Internal(e.to_string()))
    })
}
