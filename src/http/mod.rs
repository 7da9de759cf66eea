//! HTTP client module
//!
//! Thin transport over `reqwest` for the movies API.
//!
//! # Features
//!
//! - **Default headers**: `Accept: application/json` on every request
//! - **Credentials**: bearer token or API key from the auth module
//! - **Bounded timeouts**: connect and overall request timeouts
//! - **Throttling**: optional token bucket rate limiter using governor
//! - **Error classification**: network / HTTP status / decode
//!
//! The client never retries. Whoever owns the request decides whether to
//! try again.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
