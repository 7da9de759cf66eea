//! Request credentials
//!
//! The movies API accepts either a v4 read access token sent as a bearer
//! header or a v3 key sent as the `api_key` query parameter.

use reqwest::RequestBuilder;
use std::fmt;

/// Query parameter carrying a v3 API key
pub const API_KEY_PARAM: &str = "api_key";

/// Credentials applied to each request
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication
    #[default]
    None,

    /// `Authorization: Bearer <token>`
    Bearer {
        /// The read access token
        token: String,
    },

    /// `?api_key=<key>`
    ApiKey {
        /// The API key value
        key: String,
    },
}

impl Credentials {
    /// Create bearer credentials
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Create API key credentials
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey { key: key.into() }
    }

    /// Check whether any credential is configured
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Apply the credentials to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::None => req,
            Self::Bearer { token } => req.bearer_auth(token),
            Self::ApiKey { key } => req.query(&[(API_KEY_PARAM, key)]),
        }
    }
}

// Secrets never reach logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Self::ApiKey { .. } => f.debug_struct("ApiKey").field("key", &"***").finish(),
        }
    }
}
