//! Serde shapes for The Odds API `/sports/{sport}/odds` response:
//! events → bookmakers → markets → outcomes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OddsEvent {
    pub id: Option<String>,
    pub commence_time: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Bookmaker {
    pub key: String,
    pub title: Option<String>,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Outcome {
    pub name: Option<String>,
    /// Free text such as "Aaron Judge Over". Present on player props.
    pub description: Option<String>,
    pub price: Option<f64>,
    /// Line / threshold, when the market has one.
    pub point: Option<f64>,
}

impl OddsEvent {
    /// `commence_time` as UTC. None when absent or not RFC 3339.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.commence_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Bookmaker {
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.key)
    }
}

impl Outcome {
    /// Price in whole American odds. None when absent or outside `i32`.
    pub fn american_price(&self) -> Option<i32> {
        self.price
            .map(f64::round)
            .filter(|p| p.is_finite() && p.abs() <= i32::MAX as f64)
            .map(|p| p as i32)
    }
}

/// Decode an odds response body. The provider answers with a JSON array of
/// events; anything else (e.g. a `{"message": ...}` object) is an unexpected shape.
pub fn parse_events(body: &str) -> Result<Vec<OddsEvent>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_array() {
        let sample: String = body.chars().take(200).collect();
        return Err(AppError::UnexpectedShape(format!(
            "odds response was not an array: {sample}"
        )));
    }
    Ok(serde_json::from_value(value)?)
}
