use tracing::{debug, warn};

use crate::config::DEFAULT_PROP_LINE;
use crate::odds::wire::OddsEvent;
use crate::types::{OddsRow, OutcomeCategory};

/// Flatten prop outcomes for one bookmaker and one market key.
///
/// Only the positive side of a two-way prop is reported: an outcome is kept
/// when its description contains "Over" or "Yes"; everything else is dropped.
/// Returns an empty vec when nothing matches.
pub fn normalize_props(events: &[OddsEvent], bookmaker_key: &str, market_key: &str) -> Vec<OddsRow> {
    let mut rows = Vec::new();

    for event in events {
        let Some(event_id) = event.id.clone() else {
            warn!("[PROPS] event without id skipped");
            continue;
        };
        let start_time = event.start_time();

        for bookmaker in event.bookmakers.iter().filter(|b| b.key == bookmaker_key) {
            for market in bookmaker.markets.iter().filter(|m| m.key == market_key) {
                for outcome in &market.outcomes {
                    let Some(description) = outcome.description.as_deref() else {
                        continue;
                    };
                    let Some((subject_name, category)) = split_outcome(description) else {
                        continue;
                    };
                    let Some(price) = outcome.american_price() else {
                        debug!(event_id = %event_id, "[PROPS] outcome '{description}' has no price");
                        continue;
                    };
                    rows.push(OddsRow {
                        event_id: event_id.clone(),
                        home_team: event.home_team.clone(),
                        away_team: event.away_team.clone(),
                        start_time,
                        bookmaker: bookmaker.display_name().to_string(),
                        subject_name,
                        category,
                        price,
                        line: Some(outcome.point.unwrap_or(DEFAULT_PROP_LINE)),
                    });
                }
            }
        }
    }
    rows
}

/// Split "Jane Doe Over" into ("Jane Doe", Over). The name is cut at the first
/// " Over", then at the first " Yes". None for descriptions that contain neither
/// "Over" nor "Yes".
pub fn split_outcome(description: &str) -> Option<(String, OutcomeCategory)> {
    let category = if description.contains("Over") {
        OutcomeCategory::Over
    } else if description.contains("Yes") {
        OutcomeCategory::Yes
    } else {
        return None;
    };
    let name = description.split(" Over").next().unwrap_or(description);
    let name = name.split(" Yes").next().unwrap_or(name);
    Some((name.to_string(), category))
}
