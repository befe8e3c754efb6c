mod config;
mod error;
mod fetcher;
mod odds;
mod report;
mod scorer;
mod stats;
mod types;

use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{
    Config, HITTING_LEADER_STATS, LEADER_DISPLAY_LIMIT, MONEYLINE_MARKET, PITCHING_LEADER_STATS,
    VALUE_SAMPLE_LIMIT,
};
use crate::error::Result;
use crate::fetcher::{validate_date, OddsClient, StatsClient};
use crate::report::console::render_console;
use crate::report::html::render_html;
use crate::report::ReportData;
use crate::scorer::rank_value_picks;
use crate::stats::parse_leader_text;
use crate::types::{AggregatedEntity, GameOddsSummary, LeaderBoard, OddsRow, StatGroup, StatLeaders, StatWeight};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            // Reported, not propagated: the process always exits 0.
            eprintln!("Config error: {e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        warn!("[REPORT] report not produced: {e}");
    }
}

async fn run(cfg: Config) -> Result<()> {
    let stats = StatsClient::new(&cfg)?;
    let odds_client = OddsClient::new(&cfg)?;
    info!(
        date = %cfg.report_date,
        season = cfg.season,
        bookmaker = %cfg.bookmaker_key,
        market = %cfg.target_market,
        tz = %cfg.display_tz,
        "[REPORT] building daily report"
    );

    let data = build_report(&cfg, &stats, &odds_client).await;

    println!("{}", render_console(&data));

    tokio::fs::write(&cfg.output_path, render_html(&data)).await?;
    info!(path = %cfg.output_path, "[REPORT] HTML report written");
    println!("\nHTML report written to {}", cfg.output_path);
    Ok(())
}

/// Fetch and aggregate every section. Never fails: a section whose fetch
/// fails comes back empty.
async fn build_report(cfg: &Config, stats: &StatsClient, odds_client: &OddsClient) -> ReportData {
    // --- League leaders (display) ---
    let hitting_leaders =
        fetch_boards(stats, HITTING_LEADER_STATS, StatGroup::Hitting, cfg.season, LEADER_DISPLAY_LIMIT).await;
    let pitching_leaders =
        fetch_boards(stats, PITCHING_LEADER_STATS, StatGroup::Pitching, cfg.season, LEADER_DISPLAY_LIMIT).await;

    // --- Value analysis ---
    let hitting_picks = value_picks(stats, &cfg.hitting_weights, StatGroup::Hitting, cfg.season).await;
    let pitching_picks = value_picks(stats, &cfg.pitching_weights, StatGroup::Pitching, cfg.season).await;

    // --- Moneylines ---
    let games = moneyline_games(odds_client, cfg).await;
    let moneyline_summary = odds::summarize(&games);

    // --- Player props ---
    let props = player_props(odds_client, cfg).await;

    ReportData {
        generated_at: Utc::now().with_timezone(&cfg.display_tz),
        report_date: cfg.report_date.clone(),
        tz: cfg.display_tz,
        tz_label: cfg.display_tz_label.clone(),
        games,
        moneyline_summary,
        bookmaker_key: cfg.bookmaker_key.clone(),
        prop_market: cfg.target_market.clone(),
        props,
        hitting_leaders,
        pitching_leaders,
        hitting_picks,
        pitching_picks,
    }
}

/// One board per stat, in table order. A failed stat is logged and left out.
async fn fetch_boards(
    stats: &StatsClient,
    table: &[(&str, &str)],
    group: StatGroup,
    season: i32,
    limit: usize,
) -> Vec<LeaderBoard> {
    let mut boards = Vec::with_capacity(table.len());
    for (stat, label) in table {
        match stats.fetch_leader_board(stat, label, group, season, limit).await {
            Ok(board) => boards.push(board),
            Err(e) => warn!(stat, group = %group, "[STATS] leader fetch failed: {e}"),
        }
    }
    info!(group = %group, "[STATS] {}/{} leader boards fetched", boards.len(), table.len());
    boards
}

async fn value_picks(
    stats: &StatsClient,
    weights: &[StatWeight],
    group: StatGroup,
    season: i32,
) -> Vec<AggregatedEntity> {
    let table: Vec<(&str, &str)> = weights.iter().map(|w| (w.key.as_str(), w.key.as_str())).collect();
    let boards: Vec<StatLeaders> = fetch_boards(stats, &table, group, season, VALUE_SAMPLE_LIMIT)
        .await
        .into_iter()
        .map(|b| StatLeaders {
            records: parse_leader_text(&b.text),
            stat_key: b.stat_key,
        })
        .collect();
    let picks = rank_value_picks(&boards, weights);
    info!(group = %group, "[VALUE] {} players scored", picks.len());
    picks
}

async fn moneyline_games(odds_client: &OddsClient, cfg: &Config) -> Vec<GameOddsSummary> {
    let events = match odds_client.fetch_events(MONEYLINE_MARKET, &cfg.report_date).await {
        Ok(events) => events,
        Err(e) => {
            warn!("[MONEYLINE] odds fetch failed: {e}");
            return Vec::new();
        }
    };
    let Ok(day) = validate_date(&cfg.report_date) else {
        return Vec::new();
    };
    let rows = odds::rows_on_date(odds::flatten_moneyline(&events), day, cfg.display_tz);
    let games = odds::group_moneyline(&rows);
    info!("[MONEYLINE] {} events, {} prices, {} games", events.len(), rows.len(), games.len());
    games
}

async fn player_props(odds_client: &OddsClient, cfg: &Config) -> Vec<OddsRow> {
    match odds_client.fetch_events(&cfg.target_market, &cfg.report_date).await {
        Ok(events) => {
            let rows = odds::normalize_props(&events, &cfg.bookmaker_key, &cfg.target_market);
            info!(market = %cfg.target_market, "[PROPS] {} props", rows.len());
            rows
        }
        Err(e) => {
            warn!(market = %cfg.target_market, "[PROPS] odds fetch failed: {e}");
            Vec::new()
        }
    }
}
