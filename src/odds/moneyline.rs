use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::config::MONEYLINE_MARKET;
use crate::odds::wire::OddsEvent;
use crate::types::{GameOddsSummary, MoneylineSummary, Offer, OddsRow, OutcomeCategory, SideOdds};

/// Flatten every bookmaker's moneyline outcomes into rows, one per team price.
/// Events missing a team name are kept here; grouping drops them.
pub fn flatten_moneyline(events: &[OddsEvent]) -> Vec<OddsRow> {
    let mut rows = Vec::new();
    for event in events {
        let Some(event_id) = event.id.clone() else {
            warn!("[MONEYLINE] event without id skipped");
            continue;
        };
        let start_time = event.start_time();
        for bookmaker in &event.bookmakers {
            for market in bookmaker.markets.iter().filter(|m| m.key == MONEYLINE_MARKET) {
                for outcome in &market.outcomes {
                    let (Some(team), Some(price)) = (outcome.name.clone(), outcome.american_price()) else {
                        continue;
                    };
                    rows.push(OddsRow {
                        event_id: event_id.clone(),
                        home_team: event.home_team.clone(),
                        away_team: event.away_team.clone(),
                        start_time,
                        bookmaker: bookmaker.display_name().to_string(),
                        subject_name: team,
                        category: OutcomeCategory::Side,
                        price,
                        line: outcome.point,
                    });
                }
            }
        }
    }
    rows
}

/// Keep rows whose start falls on `date` in the display zone. Rows without a start time are dropped.
pub fn rows_on_date(rows: Vec<OddsRow>, date: NaiveDate, tz: Tz) -> Vec<OddsRow> {
    rows.into_iter()
        .filter(|r| {
            r.start_time
                .map(|t| t.with_timezone(&tz).date_naive() == date)
                .unwrap_or(false)
        })
        .collect()
}

/// Implied win probability in percent, rounded to one decimal. Bookmaker margin is not removed.
pub fn american_odds_to_pct(price: i32) -> f64 {
    let p = price as f64;
    let prob = if p > 0.0 {
        100.0 / (p + 100.0)
    } else {
        p.abs() / (p.abs() + 100.0)
    };
    (prob * 1000.0).round() / 10.0
}

/// Group moneyline rows into one summary per game.
///
/// Per team the highest price across bookmakers is selected; equal prices are
/// resolved arbitrarily. Games missing a home or away team are dropped.
/// Output is ordered by each game's most extreme selected price, descending.
pub fn group_moneyline(rows: &[OddsRow]) -> Vec<GameOddsSummary> {
    let mut groups: BTreeMap<(&str, Option<DateTime<Utc>>), Vec<&OddsRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.event_id.as_str(), row.start_time))
            .or_default()
            .push(row);
    }

    let mut games = Vec::new();
    for ((event_id, start_time), group) in groups {
        let first = group[0];
        let (Some(home), Some(away)) = (first.home_team.clone(), first.away_team.clone()) else {
            warn!(event_id, "[MONEYLINE] game missing home or away team, skipped");
            continue;
        };

        let mut sides: Vec<SideOdds> = [&home, &away]
            .into_iter()
            .filter_map(|team| best_side(team, &group))
            .collect();
        if sides.is_empty() {
            warn!(event_id, "[MONEYLINE] no prices for either team, skipped");
            continue;
        }
        sides.sort_by_key(|s| (!s.is_favorite, s.price.unsigned_abs()));

        let best_game_odds = sides.iter().map(|s| s.price.unsigned_abs()).max().unwrap_or(0);
        games.push(GameOddsSummary {
            event_id: event_id.to_string(),
            home_team: home,
            away_team: away,
            start_time,
            sides,
            best_game_odds,
        });
    }

    games.sort_by(|a, b| b.best_game_odds.cmp(&a.best_game_odds));
    games
}

fn best_side(team: &str, group: &[&OddsRow]) -> Option<SideOdds> {
    let team_rows: Vec<&OddsRow> = group.iter().copied().filter(|r| r.subject_name == team).collect();
    let best = team_rows.iter().max_by_key(|r| r.price)?;
    Some(SideOdds {
        team: team.to_string(),
        price: best.price,
        bookmaker: best.bookmaker.clone(),
        implied_pct: american_odds_to_pct(best.price),
        is_favorite: best.price < 0,
        offers: team_rows
            .iter()
            .map(|r| Offer {
                bookmaker: r.bookmaker.clone(),
                price: r.price,
                implied_pct: american_odds_to_pct(r.price),
            })
            .collect(),
    })
}

/// Totals over every offered price in the grouped games. None when there are no prices.
pub fn summarize(games: &[GameOddsSummary]) -> Option<MoneylineSummary> {
    let prices: Vec<i32> = games
        .iter()
        .flat_map(|g| g.sides.iter())
        .flat_map(|s| s.offers.iter().map(|o| o.price))
        .collect();
    let best_odds = *prices.iter().min()?;
    let worst_odds = *prices.iter().max()?;
    let avg_odds = prices.iter().map(|&p| p as f64).sum::<f64>() / prices.len() as f64;
    Some(MoneylineSummary {
        total_games: games.len(),
        total_prices: prices.len(),
        best_odds,
        worst_odds,
        avg_odds,
    })
}
