//! Defaults for the middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, body size limits, and
//! response compression.

use std::time::Duration;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default upper bound on request bodies, sized for phone camera photos.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
