use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Odds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeCategory {
    Over,
    Under,
    Yes,
    No,
    /// One team of a two-way moneyline.
    Side,
}

impl std::fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutcomeCategory::Over => "Over",
            OutcomeCategory::Under => "Under",
            OutcomeCategory::Yes => "Yes",
            OutcomeCategory::No => "No",
            OutcomeCategory::Side => "Side",
        };
        write!(f, "{s}")
    }
}

/// One priced outcome flattened out of an odds payload.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsRow {
    pub event_id: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    /// Bookmaker display title.
    pub bookmaker: String,
    /// Player name for props, team name for moneylines.
    pub subject_name: String,
    pub category: OutcomeCategory,
    /// American odds.
    pub price: i32,
    pub line: Option<f64>,
}

impl OddsRow {
    /// `Away @ Home` label, tolerant of missing names.
    pub fn matchup(&self) -> String {
        match (&self.away_team, &self.home_team) {
            (Some(a), Some(h)) => format!("{a} @ {h}"),
            (Some(t), None) | (None, Some(t)) => t.clone(),
            (None, None) => self.event_id.clone(),
        }
    }
}

/// One bookmaker's price for one side of a game.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub bookmaker: String,
    pub price: i32,
    pub implied_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SideOdds {
    pub team: String,
    /// Most favorable price across bookmakers.
    pub price: i32,
    pub bookmaker: String,
    /// Implied win probability in percent, vig included.
    pub implied_pct: f64,
    pub is_favorite: bool,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOddsSummary {
    pub event_id: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: Option<DateTime<Utc>>,
    /// Favorites first, then by ascending absolute price.
    pub sides: Vec<SideOdds>,
    /// Largest absolute selected price across both sides. Games sort on this, descending.
    pub best_game_odds: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoneylineSummary {
    pub total_games: usize,
    pub total_prices: usize,
    pub best_odds: i32,
    pub worst_odds: i32,
    pub avg_odds: f64,
}

// ---------------------------------------------------------------------------
// League leaders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatGroup {
    Hitting,
    Pitching,
}

impl std::fmt::Display for StatGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatGroup::Hitting => "hitting",
            StatGroup::Pitching => "pitching",
        };
        write!(f, "{s}")
    }
}

/// Leader value: numeric when the column parses as a plain decimal, raw text otherwise.
/// Numbers keep the provider's token (`.340`) so they display as the leader tables do.
#[derive(Debug, Clone, PartialEq)]
pub enum LeaderValue {
    Number { value: f64, raw: String },
    Text(String),
}

impl LeaderValue {
    pub fn number(value: f64, raw: &str) -> Self {
        LeaderValue::Number {
            value,
            raw: raw.to_string(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            LeaderValue::Number { value, .. } => Some(*value),
            LeaderValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for LeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaderValue::Number { raw, .. } => write!(f, "{raw}"),
            LeaderValue::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderRecord {
    /// Always >= 1.
    pub rank: u32,
    pub subject_name: String,
    pub team: String,
    pub value: Option<LeaderValue>,
}

/// A ranked leader list for one stat, as the pre-formatted text block the stats provider yields.
#[derive(Debug, Clone)]
pub struct LeaderBoard {
    pub stat_key: String,
    pub label: String,
    pub group: StatGroup,
    pub text: String,
}

/// Parsed leaders for one stat key, input to value scoring.
#[derive(Debug, Clone)]
pub struct StatLeaders {
    pub stat_key: String,
    pub records: Vec<LeaderRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatWeight {
    pub key: String,
    /// Positive = higher is better, negative = lower is better.
    pub weight: f64,
}

/// One player merged across every stat board they appear on.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedEntity {
    pub subject_name: String,
    pub team: String,
    /// Numeric values only.
    pub stats: BTreeMap<String, f64>,
    /// Every value seen, numeric or not, in merge order. Used for display.
    pub raw_stats: Vec<(String, Option<LeaderValue>)>,
    /// None when no weighted stat contributed.
    pub value_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        // statGroup query parameter
        assert_eq!(StatGroup::Hitting.to_string(), "hitting");
        assert_eq!(StatGroup::Pitching.to_string(), "pitching");
        // prop outcome label
        assert_eq!(OutcomeCategory::Over.to_string(), "Over");
        assert_eq!(OutcomeCategory::Yes.to_string(), "Yes");
        assert_eq!(LeaderValue::number(0.34, ".340").to_string(), ".340");
        assert_eq!(LeaderValue::Text("INJ".to_string()).as_number(), None);
    }
}
