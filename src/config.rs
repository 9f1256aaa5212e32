//! Environment configuration.

use crate::error::AppError;

/// Environment variable holding the backend base URL.
pub const API_URL_VAR: &str = "DASHBOARD_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_url: String,
}

impl DashboardConfig {
    /// Read configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_url = std::env::var(API_URL_VAR)
            .map_err(|_| {
                AppError::new(2, format!("Missing {API_URL_VAR} in environment (.env)."))
            })?;
        Self::with_api_url(api_url)
    }

    /// Build a configuration from an explicit base URL (e.g. `--api-url`).
    pub fn with_api_url(api_url: impl Into<String>) -> Result<Self, AppError> {
        let api_url = normalize_base_url(&api_url.into());
        if api_url.is_empty() {
            return Err(AppError::new(2, "Backend base URL is empty."));
        }
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(AppError::new(
                2,
                format!("Backend base URL must start with http:// or https:// (got: {api_url})."),
            ));
        }
        Ok(Self { api_url })
    }

    /// Resolve the configuration, preferring an explicit override.
    pub fn resolve(override_url: Option<&str>) -> Result<Self, AppError> {
        match override_url {
            Some(url) => Self::with_api_url(url),
            None => Self::from_env(),
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
