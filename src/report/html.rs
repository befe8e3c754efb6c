use std::fmt::Write;

use crate::config::VALUE_PICKS_SHOWN;
use crate::report::{
    format_price, format_stats, market_title, prop_outcome_label, props_by_game, ReportData, NO_DATA,
};
use crate::stats::leaders::split_columns;
use crate::types::{AggregatedEntity, GameOddsSummary, LeaderBoard, MoneylineSummary, OddsRow};

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; background: #f4f6f8; color: #1d2733; }
header { background: #0b2545; color: #fff; padding: 24px 32px; }
header p { margin: 4px 0 0; color: #b8c4d6; }
section { background: #fff; margin: 20px 32px; padding: 20px 24px; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
h2 { margin-top: 0; border-bottom: 2px solid #e3e8ee; padding-bottom: 8px; }
table { border-collapse: collapse; width: 100%; margin-bottom: 16px; }
th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #e3e8ee; }
th { background: #f0f3f7; }
.games { display: grid; grid-template-columns: repeat(auto-fill, minmax(300px, 1fr)); gap: 16px; }
.game { border: 1px solid #e3e8ee; border-radius: 6px; padding: 12px 16px; }
.game .time { color: #5b6b7f; font-size: .9em; }
.side { margin-top: 8px; }
.fav { color: #0a7d32; font-weight: 600; }
.offers { color: #5b6b7f; font-size: .85em; }
.empty { color: #8a97a8; font-style: italic; }
.boards { display: grid; grid-template-columns: repeat(auto-fill, minmax(340px, 1fr)); gap: 16px; }
"#;

/// Escape text for interpolation into HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn empty(out: &mut String) {
    let _ = writeln!(out, r#"<p class="empty">{NO_DATA}</p>"#);
}

/// Render the full report as one self-contained HTML document.
pub fn render_html(data: &ReportData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, r#"<html lang="en"><head><meta charset="utf-8">"#);
    let _ = writeln!(out, "<title>MLB Daily Report {}</title>", escape_html(&data.report_date));
    let _ = writeln!(out, "<style>{STYLE}</style></head><body>");
    let _ = writeln!(
        out,
        "<header><h1>MLB Daily Report</h1><p>Games for {} &middot; generated {} {}</p></header>",
        escape_html(&data.report_date),
        data.generated_at.format("%Y-%m-%d %I:%M %p"),
        escape_html(&data.tz_label),
    );

    games_section(&mut out, data);
    props_section(&mut out, data);
    leaders_section(&mut out, data);
    value_section(&mut out, data);

    let _ = writeln!(out, "</body></html>");
    out
}

fn games_section(out: &mut String, data: &ReportData) {
    let _ = writeln!(out, "<section id=\"games\"><h2>Today's Games</h2>");
    if data.games.is_empty() {
        empty(out);
    } else {
        let _ = writeln!(out, r#"<div class="games">"#);
        for game in &data.games {
            game_card(out, game, data);
        }
        let _ = writeln!(out, "</div>");
    }
    match &data.moneyline_summary {
        Some(summary) => summary_table(out, summary),
        None => empty(out),
    }
    let _ = writeln!(out, "</section>");
}

fn game_card(out: &mut String, game: &GameOddsSummary, data: &ReportData) {
    let _ = writeln!(out, r#"<div class="game">"#);
    let _ = writeln!(
        out,
        "<h3>{} @ {}</h3><div class=\"time\">{}</div>",
        escape_html(&game.away_team),
        escape_html(&game.home_team),
        escape_html(&data.start_time(game.start_time)),
    );
    for side in &game.sides {
        let class = if side.is_favorite { " fav" } else { "" };
        let _ = writeln!(
            out,
            "<div class=\"side{class}\">{}{}: {} ({}%) &middot; {}</div>",
            escape_html(&side.team),
            if side.is_favorite { " (favorite)" } else { "" },
            format_price(side.price),
            side.implied_pct,
            escape_html(&side.bookmaker),
        );
        let offers = side
            .offers
            .iter()
            .map(|o| format!("{} {}", escape_html(&o.bookmaker), format_price(o.price)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, r#"<div class="offers">{offers}</div>"#);
    }
    let _ = writeln!(out, "</div>");
}

fn summary_table(out: &mut String, s: &MoneylineSummary) {
    let _ = writeln!(out, "<h3>Moneyline Summary</h3><table>");
    let _ = writeln!(
        out,
        "<tr><th>Games</th><th>Prices</th><th>Best</th><th>Worst</th><th>Average</th></tr>"
    );
    let _ = writeln!(
        out,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}</td></tr>",
        s.total_games,
        s.total_prices,
        format_price(s.best_odds),
        format_price(s.worst_odds),
        s.avg_odds,
    );
    let _ = writeln!(out, "</table>");
}

fn props_section(out: &mut String, data: &ReportData) {
    let _ = writeln!(
        out,
        "<section id=\"props\"><h2>Player Props: {} ({})</h2>",
        escape_html(&market_title(&data.prop_market)),
        escape_html(&data.bookmaker_key),
    );
    let games = props_by_game(&data.props);
    if games.is_empty() {
        empty(out);
    }
    for rows in games {
        prop_table(out, &rows, data);
    }
    let _ = writeln!(out, "</section>");
}

fn prop_table(out: &mut String, rows: &[&OddsRow], data: &ReportData) {
    let Some(first) = rows.first() else {
        return;
    };
    let _ = writeln!(
        out,
        "<h3>{}</h3><div class=\"time\">{}</div>",
        escape_html(&first.matchup()),
        escape_html(&data.start_time(first.start_time)),
    );
    let _ = writeln!(out, "<table><tr><th>Player</th><th>Outcome</th><th>Price</th><th>Book</th></tr>");
    for row in rows {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.subject_name),
            escape_html(&prop_outcome_label(row, &data.prop_market)),
            format_price(row.price),
            escape_html(&row.bookmaker),
        );
    }
    let _ = writeln!(out, "</table>");
}

fn leaders_section(out: &mut String, data: &ReportData) {
    let _ = writeln!(out, "<section id=\"leaders\"><h2>League Leaders</h2>");
    for (title, boards) in [("Hitting", &data.hitting_leaders), ("Pitching", &data.pitching_leaders)] {
        let _ = writeln!(out, "<h3>{title}</h3>");
        if boards.is_empty() {
            empty(out);
            continue;
        }
        let _ = writeln!(out, r#"<div class="boards">"#);
        for board in boards {
            leader_table(out, board);
        }
        let _ = writeln!(out, "</div>");
    }
    let _ = writeln!(out, "</section>");
}

/// Data lines of a leader block with all four columns present.
fn leader_rows(text: &str) -> Vec<Vec<&str>> {
    text.trim()
        .lines()
        .skip(1)
        .map(split_columns)
        .filter(|cols| cols.len() >= 4)
        .collect()
}

fn leader_table(out: &mut String, board: &LeaderBoard) {
    let _ = writeln!(out, "<div><h4>{}</h4>", escape_html(&board.label));
    let rows = leader_rows(&board.text);
    if rows.is_empty() {
        empty(out);
    } else {
        let _ = writeln!(out, "<table><tr><th>#</th><th>Player</th><th>Team</th><th>Value</th></tr>");
        for cols in rows {
            let _ = write!(out, "<tr>");
            for col in &cols[..4] {
                let _ = write!(out, "<td>{}</td>", escape_html(col));
            }
            let _ = writeln!(out, "</tr>");
        }
        let _ = writeln!(out, "</table>");
    }
    let _ = writeln!(out, "</div>");
}

fn value_section(out: &mut String, data: &ReportData) {
    let _ = writeln!(out, "<section id=\"value\"><h2>Value Analysis</h2>");
    for (title, picks) in [("Hitting", &data.hitting_picks), ("Pitching", &data.pitching_picks)] {
        let _ = writeln!(out, "<h3>Top {title} Value</h3>");
        if picks.is_empty() {
            empty(out);
            continue;
        }
        value_table(out, &picks[..picks.len().min(VALUE_PICKS_SHOWN)]);
    }
    let _ = writeln!(out, "</section>");
}

fn value_table(out: &mut String, picks: &[AggregatedEntity]) {
    let _ = writeln!(out, "<table><tr><th>Player</th><th>Team</th><th>Value Score</th><th>Stats</th></tr>");
    for pick in picks {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
            escape_html(&pick.subject_name),
            escape_html(&pick.team),
            pick.value_score.unwrap_or_default(),
            escape_html(&format_stats(&pick.raw_stats)),
        );
    }
    let _ = writeln!(out, "</table>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::{empty_report, full_report};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">R&D</a>"#), "&lt;a href=&quot;x&quot;&gt;R&amp;D&lt;/a&gt;");
        assert_eq!(escape_html("O'Neil"), "O&#39;Neil");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn empty_inputs_render_placeholders() {
        let html = render_html(&empty_report());
        assert!(html.starts_with("<!DOCTYPE html>"));
        // games, summary, props, hitting and pitching boards, hitting and pitching picks
        assert_eq!(html.matches(NO_DATA).count(), 7);
        for heading in ["Today's Games", "Player Props", "League Leaders", "Value Analysis"] {
            assert!(html.contains(heading), "missing {heading}");
        }
    }

    #[test]
    fn full_report_renders_every_section() {
        let html = render_html(&full_report());
        assert!(html.contains("<h3>New York Yankees @ Boston Red Sox</h3>"));
        assert!(html.contains("Boston Red Sox (favorite): -130 (56.5%)"));
        assert!(html.contains("2025-06-03 05:05 PM MT"));
        assert!(html.contains("Player Props: Batter Hits (fanduel)"));
        assert!(html.contains("<td>Over 1.5</td>"));
        assert!(html.contains("<td>John &lt;Roe&gt;</td>"));
        assert!(!html.contains("John <Roe>"));
        assert!(html.contains("<td>Jane Doe</td><td>Boston Red Sox</td><td>.340</td>"));
        // value stats echo the leader table's token
        assert!(html.contains("<td>0.03</td><td>AVG: .340</td>"));
        // only the pitching boards and pitching picks are empty
        assert_eq!(html.matches(NO_DATA).count(), 2);
    }

    #[test]
    fn props_sorted_by_price_within_game() {
        let html = render_html(&full_report());
        let jane = html.find("Jane Doe</td><td>Over").unwrap();
        let john = html.find("John &lt;Roe&gt;</td>").unwrap();
        assert!(jane < john);
    }

    #[test]
    fn leader_rows_need_four_columns() {
        let text = "Rank  Name  Team  Value\n1  Jane Doe  Boston Red Sox  .340\n2  John Roe  Chicago Cubs\n";
        let rows = leader_rows(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["1", "Jane Doe", "Boston Red Sox", ".340"]);
    }
}
