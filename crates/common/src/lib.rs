//! Common wire types and errors shared across `calorie-api` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
