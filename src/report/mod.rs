pub mod console;
pub mod html;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::LINELESS_PROPS;
use crate::types::{AggregatedEntity, GameOddsSummary, LeaderBoard, LeaderValue, MoneylineSummary, OddsRow};

pub const NO_DATA: &str = "No data available";

/// Everything one report run renders. Built fresh per run.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub generated_at: DateTime<Tz>,
    pub report_date: String,
    pub tz: Tz,
    pub tz_label: String,
    pub games: Vec<GameOddsSummary>,
    pub moneyline_summary: Option<MoneylineSummary>,
    pub bookmaker_key: String,
    pub prop_market: String,
    pub props: Vec<OddsRow>,
    pub hitting_leaders: Vec<LeaderBoard>,
    pub pitching_leaders: Vec<LeaderBoard>,
    pub hitting_picks: Vec<AggregatedEntity>,
    pub pitching_picks: Vec<AggregatedEntity>,
}

impl ReportData {
    pub fn start_time(&self, start: Option<DateTime<Utc>>) -> String {
        format_start_time(start, self.tz, &self.tz_label)
    }
}

/// `2025-06-03 05:05 PM MT`, or `TBD` when unknown.
pub fn format_start_time(start: Option<DateTime<Utc>>, tz: Tz, label: &str) -> String {
    match start {
        Some(t) => format!("{} {label}", t.with_timezone(&tz).format("%Y-%m-%d %I:%M %p")),
        None => "TBD".to_string(),
    }
}

/// American price with an explicit sign on underdogs: `+110`, `-130`.
pub fn format_price(price: i32) -> String {
    if price > 0 {
        format!("+{price}")
    } else {
        price.to_string()
    }
}

/// `AVG: .332 | HOMERUNS: 58`
pub fn format_stats(raw_stats: &[(String, Option<LeaderValue>)]) -> String {
    raw_stats
        .iter()
        .map(|(k, v)| {
            let v = v.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
            format!("{}: {v}", k.to_uppercase())
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// `Over 1.5`, or just the category for yes/no props.
pub fn prop_outcome_label(row: &OddsRow, market: &str) -> String {
    match row.line {
        Some(line) if !LINELESS_PROPS.contains(&market) => format!("{} {line}", row.category),
        _ => row.category.to_string(),
    }
}

/// `batter_hits` → `Batter Hits`
pub fn market_title(market: &str) -> String {
    market
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Props grouped per game. Games are ordered by their best (lowest) price,
/// rows within a game by ascending price.
pub fn props_by_game(rows: &[OddsRow]) -> Vec<Vec<&OddsRow>> {
    let mut games: Vec<Vec<&OddsRow>> = Vec::new();
    for row in rows {
        match games.iter_mut().find(|g| g[0].event_id == row.event_id) {
            Some(g) => g.push(row),
            None => games.push(vec![row]),
        }
    }
    for g in &mut games {
        g.sort_by_key(|r| r.price);
    }
    games.sort_by_key(|g| g[0].price);
    games
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::Denver;

    use super::ReportData;
    use crate::odds::{group_moneyline, summarize};
    use crate::types::{AggregatedEntity, LeaderBoard, LeaderValue, OddsRow, OutcomeCategory, StatGroup};

    pub fn row(event: &str, team: &str, price: i32, category: OutcomeCategory, line: Option<f64>) -> OddsRow {
        OddsRow {
            event_id: event.to_string(),
            home_team: Some("Boston Red Sox".to_string()),
            away_team: Some("New York Yankees".to_string()),
            start_time: Some(Utc.with_ymd_and_hms(2025, 6, 3, 23, 5, 0).unwrap()),
            bookmaker: "FanDuel".to_string(),
            subject_name: team.to_string(),
            category,
            price,
            line,
        }
    }

    pub fn empty_report() -> ReportData {
        ReportData {
            generated_at: Utc.with_ymd_and_hms(2025, 6, 2, 18, 0, 0).unwrap().with_timezone(&Denver),
            report_date: "2025-06-03".to_string(),
            tz: Denver,
            tz_label: "MT".to_string(),
            games: vec![],
            moneyline_summary: None,
            bookmaker_key: "fanduel".to_string(),
            prop_market: "batter_hits".to_string(),
            props: vec![],
            hitting_leaders: vec![],
            pitching_leaders: vec![],
            hitting_picks: vec![],
            pitching_picks: vec![],
        }
    }

    pub fn full_report() -> ReportData {
        let moneyline = vec![
            row("ev1", "Boston Red Sox", -130, OutcomeCategory::Side, None),
            row("ev1", "New York Yankees", 110, OutcomeCategory::Side, None),
        ];
        let games = group_moneyline(&moneyline);
        let summary = summarize(&games);
        ReportData {
            games,
            moneyline_summary: summary,
            props: vec![
                row("ev1", "Jane Doe", -120, OutcomeCategory::Over, Some(1.5)),
                row("ev1", "John <Roe>", 140, OutcomeCategory::Over, Some(0.5)),
            ],
            hitting_leaders: vec![LeaderBoard {
                stat_key: "avg".to_string(),
                label: "Batting Average".to_string(),
                group: StatGroup::Hitting,
                text: "Rank  Name  Team  Value\n1     Jane Doe  Boston Red Sox  .340\n2     John Roe  Chicago Cubs  .300\n"
                    .to_string(),
            }],
            hitting_picks: vec![AggregatedEntity {
                subject_name: "Jane Doe".to_string(),
                team: "Boston Red Sox".to_string(),
                stats: [("avg".to_string(), 0.34)].into_iter().collect(),
                raw_stats: vec![("avg".to_string(), Some(LeaderValue::number(0.34, ".340")))],
                value_score: Some(0.03),
            }],
            ..empty_report()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::row;
    use super::*;
    use crate::types::OutcomeCategory;
    use chrono::TimeZone;

    #[test]
    fn start_time_follows_daylight_saving() {
        let denver = chrono_tz::America::Denver;
        let june = Utc.with_ymd_and_hms(2025, 6, 3, 23, 5, 0).unwrap();
        assert_eq!(format_start_time(Some(june), denver, "MT"), "2025-06-03 05:05 PM MT");
        let january = Utc.with_ymd_and_hms(2025, 1, 15, 23, 5, 0).unwrap();
        assert_eq!(format_start_time(Some(january), denver, "MT"), "2025-01-15 04:05 PM MT");
        assert_eq!(format_start_time(None, denver, "MT"), "TBD");
    }

    #[test]
    fn prices_carry_sign() {
        assert_eq!(format_price(110), "+110");
        assert_eq!(format_price(-130), "-130");
        assert_eq!(format_price(0), "0");
    }

    #[test]
    fn stats_line_uppercases_keys() {
        let raw = vec![
            ("avg".to_string(), Some(LeaderValue::number(0.332, ".332"))),
            ("homeRuns".to_string(), Some(LeaderValue::Text("INJ".to_string()))),
            ("rbi".to_string(), None),
        ];
        assert_eq!(format_stats(&raw), "AVG: .332 | HOMERUNS: INJ | RBI: -");
    }

    #[test]
    fn lineless_props_drop_the_line() {
        let over = row("ev1", "Jane Doe", -120, OutcomeCategory::Over, Some(1.5));
        assert_eq!(prop_outcome_label(&over, "batter_hits"), "Over 1.5");
        let yes = row("ev1", "Jane Doe", 900, OutcomeCategory::Yes, Some(0.5));
        assert_eq!(prop_outcome_label(&yes, "batter_first_home_run"), "Yes");
    }

    #[test]
    fn market_titles() {
        assert_eq!(market_title("batter_hits"), "Batter Hits");
        assert_eq!(market_title("pitcher_record_a_win"), "Pitcher Record A Win");
    }

    #[test]
    fn props_group_by_game_and_sort_by_price() {
        let rows = vec![
            row("ev1", "A", 140, OutcomeCategory::Over, Some(0.5)),
            row("ev2", "B", -200, OutcomeCategory::Over, Some(0.5)),
            row("ev1", "C", -120, OutcomeCategory::Over, Some(1.5)),
        ];
        let games = props_by_game(&rows);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0][0].event_id, "ev2");
        let names: Vec<_> = games[1].iter().map(|r| r.subject_name.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
    }
}
