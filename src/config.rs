//! API configuration: credential, endpoint, and year range.
//!
//! The credential comes from the environment (a `.env` file is honored); the
//! year range comes from CLI flags.

use crate::data::bls::DEFAULT_BASE_URL;
use crate::error::BlsError;

pub const API_KEY_VAR: &str = "BLS_API_KEY";
pub const BASE_URL_VAR: &str = "BLS_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl ApiConfig {
    /// Read `BLS_API_KEY` (required) and `BLS_API_BASE_URL` (optional).
    pub fn from_env(start_year: i32, end_year: i32) -> Result<Self, BlsError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(API_KEY_VAR).unwrap_or_default();
        let base_url = std::env::var(BASE_URL_VAR).ok();
        Self::build(api_key, base_url, start_year, end_year)
    }

    pub fn build(
        api_key: String,
        base_url: Option<String>,
        start_year: i32,
        end_year: i32,
    ) -> Result<Self, BlsError> {
        if api_key.trim().is_empty() {
            return Err(BlsError::config(format!(
                "BLS API key is not set. Please define {API_KEY_VAR} in your environment (.env)."
            )));
        }
        if start_year > end_year {
            return Err(BlsError::config(format!(
                "Invalid year range: start year {start_year} is after end year {end_year}."
            )));
        }

        let mut base_url = base_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url,
            start_year,
            end_year,
        })
    }
}
