use std::collections::HashMap;

use tracing::debug;

use crate::types::{AggregatedEntity, StatLeaders, StatWeight};

/// Mean of the numeric values on each stat board, over the fetched sample only.
/// Stats with no numeric values are absent from the map.
pub fn stat_averages(boards: &[StatLeaders]) -> HashMap<String, f64> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for board in boards {
        for value in board.records.iter().filter_map(|r| r.value.as_ref()?.as_number()) {
            let entry = sums.entry(board.stat_key.as_str()).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(k, (sum, n))| (k.to_string(), sum / n as f64))
        .collect()
}

/// Merge leader records into one entity per player name, in first-seen order.
/// The first board a player appears on fixes their team.
pub fn merge_entities(boards: &[StatLeaders]) -> Vec<AggregatedEntity> {
    let mut entities: Vec<AggregatedEntity> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for board in boards {
        for record in &board.records {
            let idx = *index.entry(record.subject_name.clone()).or_insert_with(|| {
                entities.push(AggregatedEntity {
                    subject_name: record.subject_name.clone(),
                    team: record.team.clone(),
                    stats: Default::default(),
                    raw_stats: Vec::new(),
                    value_score: None,
                });
                entities.len() - 1
            });
            let entity = &mut entities[idx];

            match record.value.as_ref().and_then(|v| v.as_number()) {
                Some(n) => {
                    entity.stats.insert(board.stat_key.clone(), n);
                }
                None => {
                    entity.stats.remove(&board.stat_key);
                }
            }
            match entity.raw_stats.iter_mut().find(|(k, _)| *k == board.stat_key) {
                Some(slot) => slot.1 = record.value.clone(),
                None => entity.raw_stats.push((board.stat_key.clone(), record.value.clone())),
            }
        }
    }
    entities
}

/// Weighted deviation from the sample average, summed over contributing stats.
/// A stat contributes when the entity has a numeric value, a weight exists and
/// the average is non-zero. None when nothing contributed.
pub fn value_score(
    entity: &AggregatedEntity,
    averages: &HashMap<String, f64>,
    weights: &[StatWeight],
) -> Option<f64> {
    let mut score = 0.0;
    let mut contributing = 0;
    for w in weights {
        let (Some(value), Some(&avg)) = (entity.stats.get(&w.key), averages.get(&w.key)) else {
            continue;
        };
        if avg == 0.0 {
            continue;
        }
        score += (value - avg) * w.weight;
        contributing += 1;
    }
    (contributing > 0).then_some(score)
}

/// Score every merged entity and return the scored ones, best first.
/// Ties keep merge order.
pub fn rank_value_picks(boards: &[StatLeaders], weights: &[StatWeight]) -> Vec<AggregatedEntity> {
    let averages = stat_averages(boards);
    let mut picks: Vec<AggregatedEntity> = merge_entities(boards)
        .into_iter()
        .filter_map(|mut entity| {
            entity.value_score = value_score(&entity, &averages, weights);
            if entity.value_score.is_none() {
                debug!(player = %entity.subject_name, "no contributing stats, not ranked");
                return None;
            }
            Some(entity)
        })
        .collect();

    picks.sort_by(|a, b| {
        let a = a.value_score.unwrap_or(f64::NEG_INFINITY);
        let b = b.value_score.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    use crate::stats::parse_leader_text;
    use crate::types::{LeaderRecord, LeaderValue};

    fn record(rank: u32, name: &str, team: &str, value: Option<LeaderValue>) -> LeaderRecord {
        LeaderRecord {
            rank,
            subject_name: name.to_string(),
            team: team.to_string(),
            value,
        }
    }

    fn num(v: f64) -> Option<LeaderValue> {
        Some(LeaderValue::number(v, &v.to_string()))
    }

    fn weight(key: &str, weight: f64) -> StatWeight {
        StatWeight { key: key.to_string(), weight }
    }

    #[test]
    fn scores_against_sample_average() {
        let avg_text = "Rank  Name  Team  Value\n1  Jane Doe  Boston Red Sox  .340\n2  John Roe  Chicago Cubs  .300\n";
        let boards = vec![StatLeaders {
            stat_key: "avg".to_string(),
            records: parse_leader_text(avg_text),
        }];

        let averages = stat_averages(&boards);
        assert_float_absolute_eq!(averages["avg"], 0.320, 1e-12);

        let picks = rank_value_picks(&boards, &[weight("avg", 1.5)]);
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].subject_name, "Jane Doe");
        assert_float_absolute_eq!(picks[0].value_score.unwrap(), 0.03, 1e-9);
        assert_eq!(picks[1].subject_name, "John Roe");
        assert_float_absolute_eq!(picks[1].value_score.unwrap(), -0.03, 1e-9);
    }

    #[test]
    fn negative_weight_rewards_lower_values() {
        let boards = vec![StatLeaders {
            stat_key: "era".to_string(),
            records: vec![
                record(1, "Ace", "A", num(2.0)),
                record(2, "Mid", "B", num(3.0)),
                record(3, "Meh", "C", num(4.0)),
            ],
        }];
        let picks = rank_value_picks(&boards, &[weight("era", -2.0)]);
        assert_eq!(picks[0].subject_name, "Ace");
        assert_float_absolute_eq!(picks[0].value_score.unwrap(), 2.0, 1e-9);
        assert_float_absolute_eq!(picks[1].value_score.unwrap(), 0.0, 1e-9);
        assert_eq!(picks[2].subject_name, "Meh");
    }

    #[test]
    fn merges_players_across_boards() {
        let boards = vec![
            StatLeaders {
                stat_key: "avg".to_string(),
                records: vec![record(1, "Jane Doe", "BOS", num(0.340)), record(2, "John Roe", "CHC", num(0.300))],
            },
            StatLeaders {
                stat_key: "homeRuns".to_string(),
                records: vec![record(1, "John Roe", "CHC", num(40.0)), record(2, "Max Poe", "NYY", num(30.0))],
            },
        ];
        let merged = merge_entities(&boards);
        let names: Vec<_> = merged.iter().map(|e| e.subject_name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "John Roe", "Max Poe"]);
        assert_eq!(merged[1].stats.len(), 2);
        assert_eq!(merged[1].stats["homeRuns"], 40.0);

        let picks = rank_value_picks(&boards, &[weight("avg", 1.5), weight("homeRuns", 2.0)]);
        // John: (0.300-0.320)*1.5 + (40-35)*2 = 9.97
        assert_eq!(picks[0].subject_name, "John Roe");
        assert_float_absolute_eq!(picks[0].value_score.unwrap(), 9.97, 1e-9);
    }

    #[test]
    fn zero_average_stat_is_excluded() {
        let boards = vec![
            StatLeaders {
                stat_key: "saves".to_string(),
                records: vec![record(1, "Closer", "A", num(0.0)), record(2, "Setup", "B", num(0.0))],
            },
            StatLeaders {
                stat_key: "wins".to_string(),
                records: vec![record(1, "Setup", "B", num(10.0)), record(2, "Starter", "C", num(6.0))],
            },
        ];
        let picks = rank_value_picks(&boards, &[weight("saves", 1.0), weight("wins", 1.2)]);
        // Closer only has saves, whose average is zero: unranked.
        assert!(picks.iter().all(|p| p.subject_name != "Closer"));
        let setup = picks.iter().find(|p| p.subject_name == "Setup").unwrap();
        assert_float_absolute_eq!(setup.value_score.unwrap(), 2.4, 1e-9);
        assert!(setup.value_score.unwrap().is_finite());
    }

    #[test]
    fn non_numeric_values_are_displayed_but_not_scored() {
        let boards = vec![StatLeaders {
            stat_key: "avg".to_string(),
            records: vec![
                record(1, "Jane Doe", "BOS", num(0.340)),
                record(2, "Hurt Guy", "CHC", Some(LeaderValue::Text("INJ".to_string()))),
                record(3, "John Roe", "NYY", num(0.300)),
            ],
        }];
        let merged = merge_entities(&boards);
        let hurt = &merged[1];
        assert!(hurt.stats.is_empty());
        assert_eq!(hurt.raw_stats, vec![("avg".to_string(), Some(LeaderValue::Text("INJ".to_string())))]);

        let averages = stat_averages(&boards);
        assert_float_absolute_eq!(averages["avg"], 0.320, 1e-12);

        let picks = rank_value_picks(&boards, &[weight("avg", 1.5)]);
        assert_eq!(picks.len(), 2);
        assert!(picks.iter().all(|p| p.subject_name != "Hurt Guy"));
    }

    #[test]
    fn unweighted_stats_do_not_score() {
        let boards = vec![StatLeaders {
            stat_key: "ops".to_string(),
            records: vec![record(1, "Jane Doe", "BOS", num(1.0))],
        }];
        assert!(rank_value_picks(&boards, &[weight("avg", 1.5)]).is_empty());
    }

    #[test]
    fn ties_keep_merge_order() {
        let boards = vec![StatLeaders {
            stat_key: "wins".to_string(),
            records: vec![
                record(1, "First", "A", num(10.0)),
                record(2, "Second", "B", num(10.0)),
                record(3, "Third", "C", num(4.0)),
            ],
        }];
        let picks = rank_value_picks(&boards, &[weight("wins", 1.0)]);
        let names: Vec<_> = picks.iter().map(|p| p.subject_name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn empty_boards_yield_no_picks() {
        assert!(rank_value_picks(&[], &[weight("avg", 1.5)]).is_empty());
    }
}
