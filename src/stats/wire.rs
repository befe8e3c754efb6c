//! Serde shapes for the MLB stats `/stats/leaders` endpoint and the text
//! rendering that turns them into a ranked leader block.

use std::fmt::Write;

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LeadersResponse {
    #[serde(default)]
    pub league_leaders: Vec<LeaderCategory>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaderCategory {
    pub leader_category: Option<String>,
    pub stat_group: Option<String>,
    #[serde(default)]
    pub leaders: Vec<WireLeader>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireLeader {
    pub rank: Option<u32>,
    /// The API reports every value as a string (".332", "58", "2.41").
    pub value: Option<String>,
    pub team: Option<WireTeam>,
    pub person: Option<WirePerson>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireTeam {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WirePerson {
    pub full_name: Option<String>,
}

impl LeadersResponse {
    /// The category matching `stat` (and `group` when the API tags one), else the first category.
    pub fn category(&self, stat: &str, group: &str) -> Option<&LeaderCategory> {
        let matched = self.league_leaders.iter().find(|c| {
            c.leader_category.as_deref() == Some(stat)
                && c.stat_group.as_deref().map_or(true, |g| g == group)
        });
        if matched.is_some() {
            return matched;
        }
        let first = self.league_leaders.first()?;
        warn!(
            requested = stat,
            group,
            returned = first.leader_category.as_deref().unwrap_or("?"),
            "[STATS] no matching leader category, using the first one returned"
        );
        Some(first)
    }
}

/// Render leaders as a `Rank  Name  Team  Value` block, one leader per line.
/// Columns are padded and always separated by at least two spaces.
/// Leaders without a name are left out; a missing rank falls back to position.
pub fn render_leader_text(leaders: &[WireLeader], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<4}  {:<24}  {:<24}  {}", "Rank", "Name", "Team", "Value");
    for (i, leader) in leaders.iter().take(limit).enumerate() {
        let Some(name) = leader
            .person
            .as_ref()
            .and_then(|p| p.full_name.as_deref())
            .map(collapse_spaces)
            .filter(|n| !n.is_empty())
        else {
            continue;
        };
        let team = leader
            .team
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .map(collapse_spaces)
            .unwrap_or_else(|| "-".to_string());
        let rank = leader.rank.unwrap_or(i as u32 + 1);
        let value = leader.value.as_deref().unwrap_or("").trim();
        let _ = writeln!(out, "{rank:<4}  {name:<24}  {team:<24}  {value}");
    }
    out
}

/// Collapse internal whitespace runs so a name can never contain a column gap.
fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
