use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A performance value as it arrives from the data source.
///
/// Upstream documents carry either a plain number (seconds or metres) or the
/// mark string printed on the results sheet ("1:52.34", "7.45m", "DNF").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mark {
    Value(f64),
    Text(String),
}

impl Mark {
    /// Numeric value used for ordering, or None when no mark was registered
    pub fn value(&self) -> Option<f64> {
        crate::scoring::marks::parse_mark(self)
    }
}

impl From<f64> for Mark {
    fn from(value: f64) -> Self {
        Mark::Value(value)
    }
}

impl From<&str> for Mark {
    fn from(value: &str) -> Self {
        Mark::Text(value.to_string())
    }
}

/// One competitor's entry in one event round.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceRecord {
    #[serde(default, alias = "name")]
    pub athlete: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub team_abbr: Option<String>,
    /// Stable team identifier, when the upstream data provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Mark achieved in the round
    #[serde(default, alias = "mark", alias = "result")]
    pub seed: Option<Mark>,
    #[serde(default, alias = "sb")]
    pub season_best: Option<Mark>,
}

impl PerformanceRecord {
    pub fn new(athlete: &str, team_name: &str) -> Self {
        Self {
            athlete: Some(athlete.to_string()),
            team_name: Some(team_name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: impl Into<Mark>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_season_best(mut self, season_best: impl Into<Mark>) -> Self {
        self.season_best = Some(season_best.into());
        self
    }

    /// Display name of the competitor. Relay entries have no athlete, so the
    /// team stands in for them.
    pub fn competitor(&self) -> &str {
        [&self.athlete, &self.team_name, &self.team_abbr]
            .into_iter()
            .filter_map(|s| non_blank(s.as_deref()))
            .next()
            .unwrap_or("(unknown)")
    }

    /// Key used to join this record to a team standing: stable id first,
    /// display name as the fallback. None means the record has no team.
    pub fn team_key(&self) -> Option<&str> {
        non_blank(self.team_id.as_deref()).or_else(|| non_blank(self.team_name.as_deref()))
    }

    /// Numeric value used to order the record, picked by outcome finality
    pub fn ranking_value(&self, is_final: bool) -> Option<f64> {
        let mark = if is_final {
            self.seed.as_ref()
        } else {
            self.season_best.as_ref()
        };
        mark.and_then(Mark::value)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// One phase of an event (prelim, semifinal, final, projection).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Round {
    #[serde(default, alias = "round_results")]
    pub records: Vec<PerformanceRecord>,
    /// true when a lower mark is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascending: Option<bool>,
}

impl Round {
    pub fn new(records: Vec<PerformanceRecord>) -> Self {
        Self {
            records,
            ascending: None,
        }
    }
}

/// One scored competition unit within a meet, for a single gender.
///
/// Rounds are read from a `rounds` object, and also from top-level keys
/// whose value carries `round_results` (`"final": {"round_results": [...]}`),
/// which is how upstream event documents store them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EventDocument")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascending: Option<bool>,
    pub rounds: BTreeMap<String, Round>,
}

/// Wire shape of an event before top-level rounds are folded in
#[derive(Deserialize)]
struct EventDocument {
    id: String,
    #[serde(default, alias = "event_name")]
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    ascending: Option<bool>,
    #[serde(default)]
    rounds: BTreeMap<String, Round>,
    #[serde(flatten)]
    other: BTreeMap<String, serde_json::Value>,
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        let mut rounds = doc.rounds;
        for (key, value) in doc.other {
            let is_round = value.get("round_results").is_some_and(|r| r.is_array());
            if !is_round || rounds.contains_key(&key) {
                continue;
            }
            match serde_json::from_value::<Round>(value) {
                Ok(round) => {
                    rounds.insert(key, round);
                }
                Err(e) => {
                    tracing::debug!(
                        event = %doc.id,
                        round = %key,
                        error = %e,
                        "skipping malformed round"
                    );
                }
            }
        }

        Self {
            id: doc.id,
            name: doc.name,
            status: doc.status,
            ascending: doc.ascending,
            rounds,
        }
    }
}

impl Event {
    pub fn new(id: &str, name: &str, status: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status: status.map(str::to_string),
            ascending: None,
            rounds: BTreeMap::new(),
        }
    }

    pub fn with_round(mut self, name: &str, records: Vec<PerformanceRecord>) -> Self {
        self.rounds.insert(name.to_string(), Round::new(records));
        self
    }

    /// Display name, falling back to the id for documents without one
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// A single competition instance. Events are partitioned by gender/division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meet {
    #[serde(alias = "id")]
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub partitions: BTreeMap<String, Vec<Event>>,
}

impl Meet {
    pub fn events(&self, gender: &str) -> &[Event] {
        self.partitions
            .get(gender)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_key_prefers_stable_id() {
        let mut record = PerformanceRecord::new("Jane Doe", "Oregon");
        assert_eq!(record.team_key(), Some("Oregon"));

        record.team_id = Some("ORE-001".to_string());
        assert_eq!(record.team_key(), Some("ORE-001"));
    }

    #[test]
    fn test_team_key_blank_is_missing() {
        let mut record = PerformanceRecord::new("Jane Doe", "   ");
        assert_eq!(record.team_key(), None);

        record.team_id = Some(String::new());
        assert_eq!(record.team_key(), None);
    }

    #[test]
    fn test_competitor_falls_back_to_team() {
        let relay = PerformanceRecord {
            team_name: Some("Stanford".to_string()),
            ..PerformanceRecord::default()
        };
        assert_eq!(relay.competitor(), "Stanford");
        assert_eq!(PerformanceRecord::default().competitor(), "(unknown)");
    }

    #[test]
    fn test_ranking_value_follows_finality() {
        let record = PerformanceRecord::new("A", "T")
            .with_seed(10.5)
            .with_season_best("10.20");
        assert_eq!(record.ranking_value(true), Some(10.5));
        assert_eq!(record.ranking_value(false), Some(10.2));
    }

    #[test]
    fn test_event_parses_upstream_document() {
        let json = r#"{
            "id": "100-m",
            "event_name": "100 M",
            "status": "scored",
            "rounds": {
                "final": {
                    "round_results": [
                        {
                            "name": "Jane Doe",
                            "team_name": "Oregon",
                            "team_abbr": "ORE",
                            "mark": "11.02"
                        }
                    ]
                }
            }
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.display_name(), "100 M");
        let final_round = &event.rounds["final"];
        assert_eq!(final_round.records.len(), 1);
        assert_eq!(final_round.records[0].athlete.as_deref(), Some("Jane Doe"));
        assert_eq!(final_round.records[0].ranking_value(true), Some(11.02));
    }

    #[test]
    fn test_event_reads_top_level_rounds() {
        let json = r#"{
            "id": "800-m",
            "event_name": "800 M",
            "status": "in-progress",
            "prelims": {
                "round_results": [
                    {"name": "Jane Doe", "team_name": "Oregon", "mark": "2:04.10", "sb": "2:03.50"}
                ]
            },
            "projections": {"round_results": []},
            "heat_count": 3,
            "notes": {"text": "wind legal"}
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = event.rounds.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["prelims", "projections"]);
        assert_eq!(event.rounds["prelims"].records[0].ranking_value(false), Some(123.5));
    }

    #[test]
    fn test_nested_round_wins_over_top_level() {
        let json = r#"{
            "id": "hj",
            "rounds": {"final": {"round_results": [{"name": "A", "mark": 1.80}]}},
            "final": {"round_results": [{"name": "B", "mark": 1.70}]}
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.rounds.len(), 1);
        assert_eq!(event.rounds["final"].records[0].athlete.as_deref(), Some("A"));
    }

    #[test]
    fn test_meet_events_missing_partition_is_empty() {
        let meet = Meet {
            key: "big-ten".to_string(),
            name: "Big Ten Outdoor".to_string(),
            year: 2025,
            season: Some("outdoor".to_string()),
            partitions: BTreeMap::new(),
        };
        assert!(meet.events("men").is_empty());
    }
}
