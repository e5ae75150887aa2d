//! Backend API endpoint configuration.

use serde::{Deserialize, Serialize};

/// Where and how to reach the gallery backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the folder/image/upload endpoints.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix of the login/register endpoints (e.g. `/api`).
    #[serde(default = "default_auth_prefix")]
    pub auth_prefix: String,
    /// Optional per-request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_prefix: default_auth_prefix(),
            request_timeout_seconds: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_auth_prefix() -> String {
    "/api".to_string()
}
