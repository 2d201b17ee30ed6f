//! BLS public API (v2) integration: one request per series.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::BlsError;

pub const DEFAULT_BASE_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
pub const DEFAULT_START_YEAR: i32 = 2015;
pub const DEFAULT_END_YEAR: i32 = 2025;

const SUCCESS_STATUS: &str = "REQUEST_SUCCEEDED";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can retrieve one series' raw observations.
///
/// A single attempt per call; callers decide what to do with failures.
pub trait SeriesSource {
    fn fetch(
        &self,
        series_id: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<RawObservation>, BlsError>;
}

/// One observation as the API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawObservation {
    pub year: String,
    pub period: String,
    #[serde(rename = "periodName", default)]
    pub period_name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub footnotes: Vec<RawFootnote>,
}

/// Footnote objects are frequently empty (`{}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawFootnote {
    pub code: Option<String>,
    pub text: Option<String>,
}

pub struct BlsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl BlsClient {
    pub fn new(config: &ApiConfig) -> Result<Self, BlsError> {
        if config.api_key.trim().is_empty() {
            return Err(BlsError::config(
                "BLS API key is not set. Please define BLS_API_KEY in your environment (.env).",
            ));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BlsError::transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }
}

impl SeriesSource for BlsClient {
    fn fetch(
        &self,
        series_id: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<RawObservation>, BlsError> {
        let url = series_url(&self.base_url, series_id, &self.api_key, start_year, end_year)?;
        debug!(series_id, start_year, end_year, "requesting series");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| BlsError::transport(format!("Request failed: {e}")))?;

        check_status(resp.status())?;

        let body = resp
            .text()
            .map_err(|e| BlsError::transport(format!("Failed to read response body: {e}")))?;

        parse_body(series_id, &body)
    }
}

/// Build `{base}{series_id}?registrationkey=..&startyear=..&endyear=..`.
///
/// Fails with a configuration error when the series id or key is empty.
pub fn series_url(
    base_url: &str,
    series_id: &str,
    api_key: &str,
    start_year: i32,
    end_year: i32,
) -> Result<Url, BlsError> {
    if series_id.trim().is_empty() {
        return Err(BlsError::config("Series ID is required"));
    }
    if api_key.trim().is_empty() {
        return Err(BlsError::config("API key is required"));
    }

    Url::parse_with_params(
        &format!("{base_url}{series_id}"),
        &[
            ("registrationkey", api_key.to_string()),
            ("startyear", start_year.to_string()),
            ("endyear", end_year.to_string()),
        ],
    )
    .map_err(|e| BlsError::config(format!("Invalid BLS API URL '{base_url}': {e}")))
}

pub fn check_status(status: StatusCode) -> Result<(), BlsError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(BlsError::transport(format!("HTTP error! status: {}", status.as_u16())))
    }
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    status: Option<String>,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(rename = "Results")]
    results: Option<ResultsBody>,
}

#[derive(Debug, Deserialize)]
struct ResultsBody {
    #[serde(default)]
    series: Vec<SeriesBody>,
}

#[derive(Debug, Deserialize)]
struct SeriesBody {
    data: Option<Vec<RawObservation>>,
}

/// Validate a response body and return the first series' observations.
pub fn parse_body(series_id: &str, body: &str) -> Result<Vec<RawObservation>, BlsError> {
    let resp: SeriesResponse = serde_json::from_str(body)
        .map_err(|e| BlsError::api(format!("Failed to parse BLS response: {e}")))?;

    if let Some(status) = resp.status.as_deref() {
        if status != SUCCESS_STATUS {
            return Err(BlsError::api(format!(
                "API error: {}",
                message_text(resp.message.as_ref())
            )));
        }
    }

    let series = resp
        .results
        .and_then(|r| r.series.into_iter().next())
        .ok_or_else(|| BlsError::api(format!("No series data returned for {series_id}")))?;

    match series.data {
        Some(data) if !data.is_empty() => Ok(data),
        _ => Err(BlsError::api(format!("No data points found for {series_id}"))),
    }
}

/// The API reports `message` as a list of strings; older payloads used a string.
fn message_text(message: Option<&serde_json::Value>) -> String {
    let text = match message {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    };
    if text.is_empty() {
        "Request failed".to_string()
    } else {
        text
    }
}
