use chrono::{Duration, Utc};
use chrono_tz::Tz;

use crate::error::{AppError, Result};
use crate::types::StatWeight;

pub const ODDS_API_URL: &str = "https://api.the-odds-api.com/v4";
pub const STATS_API_URL: &str = "https://statsapi.mlb.com/api/v1";

/// Credential used when ODDS_API_KEY is not set.
pub const DEFAULT_ODDS_API_KEY: &str = "YOUR_API_KEY";

pub const SPORT_KEY: &str = "baseball_mlb";
pub const ODDS_REGIONS: &str = "us";
pub const ODDS_FORMAT: &str = "american";

/// IANA zone game times and the report date are shown in.
pub const DEFAULT_DISPLAY_TZ: &str = "America/Denver";

/// Two-way game winner market.
pub const MONEYLINE_MARKET: &str = "h2h";

/// Threshold assumed for a prop outcome that carries no `point`.
pub const DEFAULT_PROP_LINE: f64 = 0.5;

/// Below this many remaining odds requests a warning is logged.
pub const LOW_QUOTA_THRESHOLD: u32 = 10;

/// Rows per leader board shown in the report.
pub const LEADER_DISPLAY_LIMIT: usize = 5;

/// Leaders fetched per stat for value scoring. Averages are taken over this sample.
pub const VALUE_SAMPLE_LIMIT: usize = 10;

/// Value picks shown per stat group.
pub const VALUE_PICKS_SHOWN: usize = 5;

/// Props whose outcomes are yes/no and carry no meaningful line.
pub const LINELESS_PROPS: &[&str] = &["batter_first_home_run", "pitcher_record_a_win"];

pub const HITTING_LEADER_STATS: &[(&str, &str)] = &[
    ("avg", "Batting Average"),
    ("homeRuns", "Home Runs"),
    ("rbi", "RBI"),
    ("obp", "On-Base %"),
    ("slg", "Slugging %"),
    ("ops", "OPS"),
    ("hits", "Hits"),
    ("doubles", "Doubles"),
    ("triples", "Triples"),
    ("stolenBases", "Stolen Bases"),
];

pub const PITCHING_LEADER_STATS: &[(&str, &str)] = &[
    ("era", "ERA"),
    ("strikeOuts", "Strikeouts"),
    ("wins", "Wins"),
    ("saves", "Saves"),
    ("whip", "WHIP"),
    ("inningsPitched", "Innings Pitched"),
    ("hitsAllowed", "Hits Allowed"),
    ("earnedRuns", "Earned Runs"),
    ("walks", "Walks"),
    ("qualityStarts", "Quality Starts"),
];

const DEFAULT_HITTING_WEIGHTS: &str = "avg:1.5,homeRuns:2.0,rbi:1.8,obp:1.3,slg:1.7";
const DEFAULT_PITCHING_WEIGHTS: &str = "era:-2.0,strikeOuts:1.5,wins:1.2,saves:1.0,whip:-1.8";

#[derive(Debug, Clone)]
pub struct Config {
    pub odds_api_url: String,
    pub stats_api_url: String,
    pub odds_api_key: String,
    pub log_level: String,
    /// Sportsbook whose props are reported (BOOKMAKER_KEY)
    pub bookmaker_key: String,
    /// Prop market key reported for `bookmaker_key` (TARGET_MARKET)
    pub target_market: String,
    pub season: i32,
    /// Calendar date of the games, YYYY-MM-DD (REPORT_DATE). Validated by the odds fetch.
    pub report_date: String,
    /// IANA display time zone (DISPLAY_TZ)
    pub display_tz: Tz,
    pub display_tz_label: String,
    pub request_timeout_secs: u64,
    /// Where the HTML report is written (REPORT_PATH)
    pub output_path: String,
    pub hitting_weights: Vec<StatWeight>,
    pub pitching_weights: Vec<StatWeight>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let display_tz = parse_display_tz(
            &std::env::var("DISPLAY_TZ").unwrap_or_else(|_| DEFAULT_DISPLAY_TZ.to_string()),
        )?;

        let report_date = std::env::var("REPORT_DATE")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| default_report_date(display_tz));

        Ok(Self {
            odds_api_url: std::env::var("ODDS_API_URL").unwrap_or_else(|_| ODDS_API_URL.to_string()),
            stats_api_url: std::env::var("STATS_API_URL")
                .unwrap_or_else(|_| STATS_API_URL.to_string()),
            odds_api_key: std::env::var("ODDS_API_KEY")
                .unwrap_or_else(|_| DEFAULT_ODDS_API_KEY.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            bookmaker_key: std::env::var("BOOKMAKER_KEY").unwrap_or_else(|_| "fanduel".to_string()),
            target_market: std::env::var("TARGET_MARKET")
                .unwrap_or_else(|_| "batter_hits".to_string()),
            season: std::env::var("SEASON")
                .unwrap_or_else(|_| "2024".to_string())
                .parse::<i32>()
                .map_err(|_| AppError::Config("SEASON must be a year".to_string()))?,
            report_date,
            display_tz,
            display_tz_label: std::env::var("DISPLAY_TZ_LABEL").unwrap_or_else(|_| "MT".to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse::<u64>()
                .map_err(|_| AppError::Config("REQUEST_TIMEOUT_SECS must be a number of seconds".to_string()))?,
            output_path: std::env::var("REPORT_PATH")
                .unwrap_or_else(|_| "mlb_daily_report.html".to_string()),
            hitting_weights: parse_weights(
                &std::env::var("HITTING_WEIGHTS").unwrap_or_else(|_| DEFAULT_HITTING_WEIGHTS.to_string()),
            )?,
            pitching_weights: parse_weights(
                &std::env::var("PITCHING_WEIGHTS")
                    .unwrap_or_else(|_| DEFAULT_PITCHING_WEIGHTS.to_string()),
            )?,
        })
    }

}

/// Resolve an IANA zone name such as `America/Denver`.
pub fn parse_display_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| AppError::Config(format!("DISPLAY_TZ '{name}' is not an IANA time zone")))
}

/// Tomorrow's date in the display time zone.
fn default_report_date(tz: Tz) -> String {
    let today = Utc::now().with_timezone(&tz).date_naive();
    (today + Duration::days(1)).format("%Y-%m-%d").to_string()
}

/// Parse an ordered `key:weight` list, e.g. `avg:1.5,era:-2.0`.
pub fn parse_weights(raw: &str) -> Result<Vec<StatWeight>> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (key, weight) = entry
                .split_once(':')
                .ok_or_else(|| AppError::Config(format!("weight entry '{entry}' is not key:weight")))?;
            let weight = weight
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::Config(format!("weight for '{}' is not a number", key.trim())))?;
            Ok(StatWeight {
                key: key.trim().to_string(),
                weight,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_weight_tables_in_order() {
        let hitting = parse_weights(DEFAULT_HITTING_WEIGHTS).unwrap();
        let keys: Vec<_> = hitting.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(keys, vec!["avg", "homeRuns", "rbi", "obp", "slg"]);
        assert_eq!(hitting[0].weight, 1.5);

        let pitching = parse_weights(DEFAULT_PITCHING_WEIGHTS).unwrap();
        assert_eq!(pitching[0].key, "era");
        assert_eq!(pitching[0].weight, -2.0);
        assert_eq!(pitching[4].weight, -1.8);
    }

    #[test]
    fn rejects_malformed_weight_entries() {
        assert!(matches!(parse_weights("avg=1.5"), Err(AppError::Config(_))));
        assert!(matches!(parse_weights("avg:high"), Err(AppError::Config(_))));
    }

    #[test]
    fn tolerates_blank_entries_and_spacing() {
        let w = parse_weights(" avg : 1.5 ,, whip:-1.8 ").unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].key, "avg");
        assert_eq!(w[1].key, "whip");
    }

    #[test]
    fn display_tz_resolves_iana_names() {
        assert_eq!(parse_display_tz(DEFAULT_DISPLAY_TZ).unwrap(), chrono_tz::America::Denver);
        assert_eq!(parse_display_tz(" UTC ").unwrap(), chrono_tz::UTC);
        assert!(matches!(parse_display_tz("Mountain"), Err(AppError::Config(_))));
        assert!(matches!(parse_display_tz("-7"), Err(AppError::Config(_))));
    }
}

/// Config pointed at an unroutable host, for exercising failure paths.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        odds_api_url: "http://127.0.0.1:9".to_string(),
        stats_api_url: "http://127.0.0.1:9/".to_string(),
        odds_api_key: "k".to_string(),
        log_level: "info".to_string(),
        bookmaker_key: "fanduel".to_string(),
        target_market: "batter_hits".to_string(),
        season: 2024,
        report_date: "2025-06-03".to_string(),
        display_tz: chrono_tz::America::Denver,
        display_tz_label: "MT".to_string(),
        request_timeout_secs: 1,
        output_path: "report.html".to_string(),
        hitting_weights: vec![StatWeight {
            key: "avg".to_string(),
            weight: 1.5,
        }],
        pitching_weights: vec![StatWeight {
            key: "era".to_string(),
            weight: -2.0,
        }],
    }
}
