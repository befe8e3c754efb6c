use std::time::Duration;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::header::HeaderMap;
use tracing::{debug, info, warn};

use crate::config::{Config, LOW_QUOTA_THRESHOLD, ODDS_FORMAT, ODDS_REGIONS, SPORT_KEY};
use crate::error::{AppError, Result};
use crate::odds::wire::{parse_events, OddsEvent};
use crate::stats::wire::{render_leader_text, LeadersResponse};
use crate::types::{LeaderBoard, StatGroup};

fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Body of a 2xx response; anything else becomes `AppError::Status`.
async fn read_body(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(AppError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

// ---------------------------------------------------------------------------
// Odds provider
// ---------------------------------------------------------------------------

pub struct OddsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    tz: Tz,
}

impl OddsClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: build_client(cfg.request_timeout_secs)?,
            base_url: cfg.odds_api_url.trim_end_matches('/').to_string(),
            api_key: cfg.odds_api_key.clone(),
            tz: cfg.display_tz,
        })
    }

    /// Fetch MLB events priced in `markets` (comma-separated market keys) that
    /// start on `date` (YYYY-MM-DD) in the display time zone.
    /// The date is validated before any request is made.
    pub async fn fetch_events(&self, markets: &str, date: &str) -> Result<Vec<OddsEvent>> {
        let day = validate_date(date)?;
        let (from, to) = day_window(day, self.tz);

        let url = format!("{}/sports/{}/odds", self.base_url, SPORT_KEY);
        info!(markets, date, "[ODDS] requesting {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", ODDS_REGIONS),
                ("markets", markets),
                ("oddsFormat", ODDS_FORMAT),
                ("dateFormat", "iso"),
                ("commenceTimeFrom", from.as_str()),
                ("commenceTimeTo", to.as_str()),
            ])
            .send()
            .await?;

        log_quota(resp.headers());

        let body = match read_body(resp).await {
            Ok(b) => b,
            Err(AppError::Status { status: 422, body }) => {
                warn!(
                    markets,
                    date,
                    "[ODDS] 422: usually no data for this date/market, or the date is out of range"
                );
                return Err(AppError::Status { status: 422, body });
            }
            Err(e) => return Err(e),
        };

        let events = parse_events(&body)?;
        debug!(markets, date, "[ODDS] {} events", events.len());
        Ok(events)
    }
}

/// Parse a caller-supplied `YYYY-MM-DD` date.
pub fn validate_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(date.to_string()))
}

/// UTC bounds of a calendar day in `tz`, formatted the way the odds API expects.
/// The window is 23 or 25 hours long on daylight-saving transition days.
pub fn day_window(day: NaiveDate, tz: Tz) -> (String, String) {
    let start = local_midnight(day, tz);
    let end = local_midnight(day.checked_add_days(Days::new(1)).unwrap_or(day), tz);
    (
        start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        end.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    )
}

/// Start of `day` in `tz`, as UTC. A midnight skipped by a DST jump is read as UTC midnight.
fn local_midnight(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    Unknown,
    Ok(u32),
    Low(u32),
}

/// Classify the `x-requests-remaining` header value.
pub fn classify_quota(remaining: Option<&str>) -> Quota {
    let Some(n) = remaining
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.floor() as u32)
    else {
        return Quota::Unknown;
    };
    if n < LOW_QUOTA_THRESHOLD {
        Quota::Low(n)
    } else {
        Quota::Ok(n)
    }
}

fn log_quota(headers: &HeaderMap) {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let used = header("x-requests-used").unwrap_or("unknown");
    match classify_quota(header("x-requests-remaining")) {
        Quota::Unknown => {}
        Quota::Ok(remaining) => info!(remaining, used, "[ODDS] API usage"),
        Quota::Low(remaining) => {
            info!(remaining, used, "[ODDS] API usage");
            warn!(remaining, "[ODDS] low on API requests");
        }
    }
}

// ---------------------------------------------------------------------------
// League statistics provider
// ---------------------------------------------------------------------------

pub struct StatsClient {
    client: reqwest::Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: build_client(cfg.request_timeout_secs)?,
            base_url: cfg.stats_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the top `limit` leaders for `stat` and render them as a ranked text block.
    pub async fn fetch_leader_board(
        &self,
        stat: &str,
        label: &str,
        group: StatGroup,
        season: i32,
        limit: usize,
    ) -> Result<LeaderBoard> {
        let url = format!("{}/stats/leaders", self.base_url);
        let group_name = group.to_string();
        let season = season.to_string();
        let limit_str = limit.to_string();
        debug!(stat, group = %group, "[STATS] requesting {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("leaderCategories", stat),
                ("season", season.as_str()),
                ("limit", limit_str.as_str()),
                ("statGroup", group_name.as_str()),
                ("sportId", "1"),
            ])
            .send()
            .await?;
        let body = read_body(resp).await?;

        let parsed: LeadersResponse = serde_json::from_str(&body)?;
        let category = parsed.category(stat, &group_name).ok_or_else(|| {
            AppError::UnexpectedShape(format!("no leader category for {group_name} {stat}"))
        })?;

        Ok(LeaderBoard {
            stat_key: stat.to_string(),
            label: label.to_string(),
            group,
            text: render_leader_text(&category.leaders, limit),
        })
    }
}
