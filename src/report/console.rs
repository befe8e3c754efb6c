use std::fmt::Write;

use crate::config::VALUE_PICKS_SHOWN;
use crate::report::{
    format_price, format_stats, market_title, prop_outcome_label, props_by_game, ReportData, NO_DATA,
};
use crate::types::{AggregatedEntity, LeaderBoard};

const RULE: &str = "==================================================";

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{RULE}\n{title}\n{RULE}");
}

/// Plain-text rendition of the report, in the same section order as the HTML.
pub fn render_console(data: &ReportData) -> String {
    let mut out = String::new();
    leaders(&mut out, "HITTING LEADERS", &data.hitting_leaders);
    leaders(&mut out, "PITCHING LEADERS", &data.pitching_leaders);
    moneyline(&mut out, data);
    value_picks(&mut out, "TOP HITTING VALUE PICKS", &data.hitting_picks);
    value_picks(&mut out, "TOP PITCHING VALUE PICKS", &data.pitching_picks);
    props(&mut out, data);
    out
}

fn leaders(out: &mut String, title: &str, boards: &[LeaderBoard]) {
    heading(out, title);
    if boards.is_empty() {
        let _ = writeln!(out, "{NO_DATA}");
    }
    for board in boards {
        let _ = writeln!(out, "\n{}:", board.label);
        let _ = writeln!(out, "{}", board.text.trim_end());
    }
}

fn moneyline(out: &mut String, data: &ReportData) {
    heading(out, &format!("MONEYLINE ODDS FOR {}", data.report_date));
    if data.games.is_empty() {
        let _ = writeln!(out, "{NO_DATA}");
        return;
    }
    for game in &data.games {
        let _ = writeln!(
            out,
            "\n{} @ {} - {}",
            game.away_team,
            game.home_team,
            data.start_time(game.start_time)
        );
        for side in &game.sides {
            let _ = writeln!(
                out,
                "  {}: {}% ({}) - {}",
                side.team,
                side.implied_pct,
                format_price(side.price),
                side.bookmaker
            );
        }
    }
    if let Some(s) = &data.moneyline_summary {
        let _ = writeln!(
            out,
            "\n{} games, {} prices | best {} | worst {} | avg {:.1}",
            s.total_games,
            s.total_prices,
            format_price(s.best_odds),
            format_price(s.worst_odds),
            s.avg_odds
        );
    }
}

fn value_picks(out: &mut String, title: &str, picks: &[AggregatedEntity]) {
    heading(out, title);
    if picks.is_empty() {
        let _ = writeln!(out, "{NO_DATA}");
        return;
    }
    for pick in picks.iter().take(VALUE_PICKS_SHOWN) {
        let _ = writeln!(out, "\n{} ({})", pick.subject_name, pick.team);
        let _ = writeln!(out, "  Value Score: {:.2}", pick.value_score.unwrap_or_default());
        let _ = writeln!(out, "  Stats: {}", format_stats(&pick.raw_stats));
    }
}

fn props(out: &mut String, data: &ReportData) {
    heading(
        out,
        &format!("PLAYER PROPS: {} ({})", market_title(&data.prop_market).to_uppercase(), data.bookmaker_key),
    );
    let games = props_by_game(&data.props);
    if games.is_empty() {
        let _ = writeln!(out, "{NO_DATA}");
        return;
    }
    for rows in games {
        let Some(first) = rows.first() else {
            continue;
        };
        let _ = writeln!(out, "\n{} - {}", first.matchup(), data.start_time(first.start_time));
        for row in &rows {
            let _ = writeln!(
                out,
                "  {}: {} ({}) - {}",
                row.subject_name,
                prop_outcome_label(row, &data.prop_market),
                format_price(row.price),
                row.bookmaker
            );
        }
    }
}
