//! Client for the FatSecret image-recognition API.
//!
//! Each recognition performs an OAuth2 client-credentials exchange followed by
//! one recognition call. Nothing is cached between requests.
//!
//! # Invariants
//!
//! - Client secrets and access tokens never appear in logs or error messages.

pub mod client;

pub use client::{FatSecretClient, NutritionConfig, NutritionError, Recognition};
