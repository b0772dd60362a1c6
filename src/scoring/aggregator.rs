use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::ranker::{compare_marks, rank, RankedRecord};
use super::selector::select_results;
use super::taxonomy::{StatusCategory, TeamRankPolicy, Taxonomy};
use crate::model::{Event, PerformanceRecord};

/// One competitor's share of a team's points in one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub competitor: String,
    pub points: f64,
}

/// A team's points in one event, with who scored them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EventPoints {
    pub points: f64,
    pub contributors: Vec<Contribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStanding {
    /// Join key: stable team id when available, otherwise the team name
    pub key: String,
    pub team_name: String,
    pub team_abbr: Option<String>,
    /// Keyed by event id. Holds an entry for every event in the aggregation.
    pub events: BTreeMap<String, EventPoints>,
    pub total_points: f64,
    pub rank: u32,
}

impl TeamStanding {
    fn new(key: &str, record: &PerformanceRecord) -> Self {
        let team_name = record
            .team_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(key)
            .to_string();
        Self {
            key: key.to_string(),
            team_name,
            team_abbr: None,
            events: BTreeMap::new(),
            total_points: 0.0,
            rank: 0,
        }
    }

    pub fn event_points(&self, event_id: &str) -> f64 {
        self.events.get(event_id).map(|e| e.points).unwrap_or(0.0)
    }
}

/// The scored outcome of a single event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventOutcome {
    pub event_id: String,
    pub event_name: String,
    /// Round the results were read from, if any
    pub round: Option<String>,
    pub is_final: bool,
    #[serde(skip)]
    pub category: StatusCategory,
    pub results: Vec<RankedRecord>,
}

/// Team standings plus the per-event outcomes they were built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standings {
    pub events: Vec<EventOutcome>,
    pub teams: Vec<TeamStanding>,
}

impl Standings {
    pub fn team(&self, name_or_key: &str) -> Option<&TeamStanding> {
        self.teams.iter().find(|t| {
            t.key.eq_ignore_ascii_case(name_or_key)
                || t.team_name.eq_ignore_ascii_case(name_or_key)
                || t.team_abbr
                    .as_deref()
                    .is_some_and(|a| a.eq_ignore_ascii_case(name_or_key))
        })
    }
}

/// Select, deduplicate and rank one event.
pub fn score_event(event: &Event, taxonomy: &Taxonomy) -> EventOutcome {
    let selection = select_results(event, taxonomy);
    let entries =
        drop_duplicate_entries(selection.records, selection.ascending, selection.is_final);
    if entries.len() != selection.records.len() {
        tracing::debug!(
            event = %event.id,
            dropped = selection.records.len() - entries.len(),
            "dropped duplicate entries"
        );
    }

    EventOutcome {
        event_id: event.id.clone(),
        event_name: event.display_name().to_string(),
        round: selection.round.map(str::to_string),
        is_final: selection.is_final,
        category: selection.category,
        results: rank(&entries, selection.ascending, selection.is_final),
    }
}

/// Start lists repeat athlete rows now and then. Keep the best-ranked row of
/// each (athlete, team) identity; relay entries without an athlete are kept
/// as-is. The result is in ranking order.
fn drop_duplicate_entries(
    records: &[PerformanceRecord],
    ascending: bool,
    is_final: bool,
) -> Vec<PerformanceRecord> {
    let mut ordered: Vec<&PerformanceRecord> = records.iter().collect();
    ordered.sort_by(|a, b| {
        compare_marks(a.ranking_value(is_final), b.ranking_value(is_final), ascending)
    });

    let mut seen = HashSet::new();
    ordered
        .into_iter()
        .filter(|r| {
            let Some(athlete) = r.athlete.as_deref().map(str::trim).filter(|a| !a.is_empty()) else {
                return true;
            };
            seen.insert((
                athlete.to_ascii_lowercase(),
                r.team_abbr.clone().unwrap_or_default(),
                r.team_name.clone().unwrap_or_default(),
            ))
        })
        .cloned()
        .collect()
}

/// Round a team total to a millionth so that split points summed in a
/// different order compare equal.
fn round_total(total: f64) -> f64 {
    (total * 1e6).round() / 1e6
}

/// Compute team standings for one meet and gender.
pub fn aggregate(events: &[Event], taxonomy: &Taxonomy) -> Vec<TeamStanding> {
    compute_standings(events, taxonomy).teams
}

/// Score every event and fold the results into ranked team standings.
///
/// Every team that scored (or entered) anywhere gets an entry for every
/// event, zero where it had nobody. Teams are ordered by total points, with
/// the team key breaking ties so repeated runs give the same order.
pub fn compute_standings(events: &[Event], taxonomy: &Taxonomy) -> Standings {
    let outcomes: Vec<EventOutcome> = events.iter().map(|e| score_event(e, taxonomy)).collect();

    let mut teams: BTreeMap<String, TeamStanding> = BTreeMap::new();
    for outcome in &outcomes {
        if outcome.results.is_empty() {
            tracing::debug!(event = %outcome.event_id, "no results selected");
            continue;
        }

        for ranked in &outcome.results {
            let record = &ranked.record;
            let Some(key) = record.team_key() else {
                tracing::debug!(
                    event = %outcome.event_id,
                    competitor = record.competitor(),
                    "skipping record without a team"
                );
                continue;
            };

            let team = teams
                .entry(key.to_string())
                .or_insert_with(|| TeamStanding::new(key, record));
            if team.team_abbr.is_none() {
                team.team_abbr = record
                    .team_abbr
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string);
            }

            let entry = team.events.entry(outcome.event_id.clone()).or_default();
            entry.points += ranked.score;
            entry.contributors.push(Contribution {
                competitor: record.competitor().to_string(),
                points: ranked.score,
            });
        }
    }

    // Fill gaps so every team reports every event
    for team in teams.values_mut() {
        for event in events {
            team.events.entry(event.id.clone()).or_default();
        }
        team.total_points = round_total(team.events.values().map(|e| e.points).sum());
    }

    let mut ordered: Vec<TeamStanding> = teams.into_values().collect();
    order_teams(&mut ordered);
    assign_ranks(&mut ordered, taxonomy.team_ranking);

    Standings {
        events: outcomes,
        teams: ordered,
    }
}

/// Highest total first; equal totals fall back to the team key
fn order_teams(teams: &mut [TeamStanding]) {
    teams.sort_by(|a, b| {
        b.total_points
            .total_cmp(&a.total_points)
            .then_with(|| a.key.cmp(&b.key))
    });
}

fn assign_ranks(teams: &mut [TeamStanding], policy: TeamRankPolicy) {
    let mut previous: Option<(f64, u32)> = None;
    for (i, team) in teams.iter_mut().enumerate() {
        let position = i as u32 + 1;
        team.rank = match (policy, previous) {
            (TeamRankPolicy::Shared, Some((total, rank))) if total == team.total_points => rank,
            _ => position,
        };
        previous = Some((team.total_points, team.rank));
    }
}
