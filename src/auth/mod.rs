//! Authentication module
//!
//! Supports: Bearer token (TMDB API read access token), API key query parameter
//!
//! `Credentials` are attached to every outgoing request by the HTTP client.

mod credentials;

pub use credentials::Credentials;
