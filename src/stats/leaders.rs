use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::types::{LeaderRecord, LeaderValue};

/// Columns in a leader block are separated by two or more whitespace characters.
static COLUMN_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Why a leader line was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum LineError {
    TooFewFields(usize),
    BadRank(String),
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineError::TooFewFields(n) => write!(f, "expected at least 3 columns, found {n}"),
            LineError::BadRank(r) => write!(f, "rank '{r}' is not a positive integer"),
        }
    }
}

/// Split a trimmed line on runs of 2+ whitespace characters.
pub fn split_columns(line: &str) -> Vec<&str> {
    COLUMN_GAP.split(line.trim()).collect()
}

/// Parse a ranked leader text block. The first line is a header and is discarded.
/// Blank lines are ignored; malformed lines are logged and skipped.
/// Output order matches input order.
pub fn parse_leader_text(text: &str) -> Vec<LeaderRecord> {
    let mut records = Vec::new();
    for line in text.trim().lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_leader_line(line) {
            Ok(record) => records.push(record),
            Err(e) => warn!("[LEADERS] skipping line '{}': {e}", line.trim()),
        }
    }
    records
}

/// Parse one `rank  name  team  [value]` line.
pub fn parse_leader_line(line: &str) -> Result<LeaderRecord, LineError> {
    let parts = split_columns(line);
    if parts.len() < 3 {
        return Err(LineError::TooFewFields(parts.len()));
    }

    let rank = match parts[0].parse::<u32>() {
        Ok(r) if r >= 1 => r,
        _ => return Err(LineError::BadRank(parts[0].to_string())),
    };

    let value = parts.get(3).map(|raw| match parse_decimal(raw) {
        Some(n) => LeaderValue::number(n, raw),
        None => LeaderValue::Text(raw.to_string()),
    });

    Ok(LeaderRecord {
        rank,
        subject_name: parts[1].to_string(),
        team: parts[2].to_string(),
        value,
    })
}

/// Plain decimal: optional leading '-', digits, at most one '.', at least one digit.
/// Exponents, signs elsewhere, `inf` and `NaN` are not numbers here.
fn parse_decimal(s: &str) -> Option<f64> {
    let body = s.strip_prefix('-').unwrap_or(s);
    let mut digits = 0;
    let mut dots = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    s.parse::<f64>().ok()
}
