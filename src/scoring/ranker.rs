use serde::Serialize;
use std::cmp::Ordering;

use super::points::split_points;
use crate::model::PerformanceRecord;

/// A record annotated with its computed place and points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    pub record: PerformanceRecord,
    /// None when the competitor registered no mark
    pub place: Option<u32>,
    pub score: f64,
}

/// Rank an event's records and attach points.
///
/// Final outcomes are ordered by the mark achieved, provisional ones by
/// season best. Equal marks share a place and split the points of the places
/// they occupy; the next mark's place skips past the tied block. Records
/// without a usable mark go last with no place and no points.
///
/// The output is ordered by place; ties keep their input order. Input records
/// are never modified.
pub fn rank(records: &[PerformanceRecord], ascending: bool, is_final: bool) -> Vec<RankedRecord> {
    let mut keyed: Vec<(Option<f64>, &PerformanceRecord)> = records
        .iter()
        .map(|r| (r.ranking_value(is_final), r))
        .collect();

    // sort_by is stable, so ties stay in input order
    keyed.sort_by(|a, b| compare_marks(a.0, b.0, ascending));

    let mut ranked = Vec::with_capacity(keyed.len());
    let mut start = 0;
    while start < keyed.len() {
        let Some(value) = keyed[start].0 else {
            // Everything from here on has no mark
            ranked.extend(keyed[start..].iter().map(|(_, record)| RankedRecord {
                record: (*record).clone(),
                place: None,
                score: 0.0,
            }));
            break;
        };

        let tied = keyed[start..]
            .iter()
            .take_while(|(other, _)| *other == Some(value))
            .count();
        let place = start as u32 + 1;
        let score = split_points(place, tied);

        ranked.extend(keyed[start..start + tied].iter().map(|(_, record)| RankedRecord {
            record: (*record).clone(),
            place: Some(place),
            score,
        }));
        start += tied;
    }

    ranked
}

pub(crate) fn compare_marks(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if ascending => a.total_cmp(&b),
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
