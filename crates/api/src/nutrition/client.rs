//! [`FatSecretClient`]: token exchange and image recognition over HTTPS.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::protocol::FoodAnalysis;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// OAuth scope requested for image recognition.
const RECOGNITION_SCOPE: &str = "image-recognition";

/// Errors produced by the nutrition client.
#[derive(Debug, Error)]
pub enum NutritionError {
    /// Client id or secret is not configured.
    #[error("FATSECRET_CLIENT_ID and FATSECRET_CLIENT_SECRET must be set.")]
    MissingCredentials,

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The token endpoint was unreachable or refused the credentials.
    #[error("token exchange failed: {0}")]
    Auth(#[source] reqwest::Error),

    /// The recognition endpoint was unreachable or returned an error status.
    #[error("{0}")]
    Request(#[source] reqwest::Error),

    /// The provider answered with an `error` object.
    #[error("{0}")]
    Provider(String),
}

/// Outcome of a successful recognition call.
#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    /// Summary of the first recognised food item.
    Food(FoodAnalysis),
    /// The provider found nothing edible in the image.
    NoFood,
}

/// Connection settings for [`FatSecretClient`].
#[derive(Clone)]
pub struct NutritionConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for NutritionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NutritionConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

struct Credentials {
    client_id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct RecognitionRequest {
    image_b64: String,
    include_food_data: bool,
}

/// HTTP client for the FatSecret platform.
pub struct FatSecretClient {
    http: Client,
    credentials: Option<Credentials>,
    token_url: String,
    api_url: String,
}

impl FatSecretClient {
    /// Build a client from `cfg`.
    ///
    /// Blank credentials are treated as absent; every call then fails with
    /// [`NutritionError::MissingCredentials`].
    ///
    /// # Errors
    ///
    /// Returns [`NutritionError::Client`] if the TLS backend cannot be initialised.
    pub fn new(cfg: NutritionConfig) -> Result<Self, NutritionError> {
        let http = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(NutritionError::Client)?;

        let credentials = match (cfg.client_id, cfg.client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.trim().is_empty() && !client_secret.trim().is_empty() =>
            {
                Some(Credentials {
                    client_id,
                    client_secret,
                })
            }
            _ => None,
        };

        Ok(Self {
            http,
            credentials,
            token_url: cfg.token_url,
            api_url: cfg.api_url,
        })
    }

    /// Returns `true` if client credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Exchange the client credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`NutritionError::MissingCredentials`] if no credentials are
    /// configured, or [`NutritionError::Auth`] if the exchange fails.
    pub async fn access_token(&self) -> Result<String, NutritionError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(NutritionError::MissingCredentials)?;

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("scope", RECOGNITION_SCOPE),
        ];

        let resp: TokenResponse = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(NutritionError::Auth)?
            .error_for_status()
            .map_err(NutritionError::Auth)?
            .json()
            .await
            .map_err(NutritionError::Auth)?;

        debug!("obtained provider access token");
        Ok(resp.access_token)
    }

    /// Submit `image` for recognition and summarise the first food item.
    ///
    /// # Errors
    ///
    /// Propagates [`access_token`](Self::access_token) failures. Returns
    /// [`NutritionError::Request`] on transport or status errors, and
    /// [`NutritionError::Provider`] when the reply carries an `error` object.
    pub async fn recognize(&self, image: &[u8]) -> Result<Recognition, NutritionError> {
        let token = self.access_token().await?;

        let body = RecognitionRequest {
            image_b64: STANDARD.encode(image),
            include_food_data: true,
        };
        debug!(image_bytes = image.len(), "submitting image for recognition");

        let reply: Value = self
            .http
            .post(&self.api_url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(NutritionError::Request)?
            .error_for_status()
            .map_err(NutritionError::Request)?
            .json()
            .await
            .map_err(NutritionError::Request)?;

        interpret(&reply)
    }
}

/// Reduce a raw recognition reply to a [`Recognition`].
fn interpret(reply: &Value) -> Result<Recognition, NutritionError> {
    if let Some(err) = reply.get("error") {
        let message = match err.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "provider returned an error".to_owned(),
        };
        return Err(NutritionError::Provider(message));
    }

    let Some(first) = reply
        .get("food_response")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
    else {
        return Ok(Recognition::NoFood);
    };

    let totals = first.pointer("/eaten/total_nutritional_content");
    let nutrient = |name: &str| totals.and_then(|t| t.get(name)).cloned();

    Ok(Recognition::Food(FoodAnalysis {
        food_name: first.get("food_entry_name").cloned(),
        calories: nutrient("calories"),
        protein: nutrient("protein"),
        fat: nutrient("fat"),
        carbs: nutrient("carbohydrate"),
    }))
}
