use serde::{Deserialize, Serialize};

/// Taxonomy schema version understood by this build
pub const TAXONOMY_VERSION: u32 = 1;

/// Status taxonomy used to interpret event documents.
///
/// Maps raw status strings to categories, lists the round names to read for
/// each category (in preference order), and groups statuses into the buckets
/// reported by the stats summary. Any field left out of a YAML override keeps
/// its built-in value.
///
/// Example YAML:
/// ```yaml
/// taxonomy:
///   version: 1
///   final_statuses: [scored, scored-protest]
///   provisional_rounds: [semifinal, prelim, projection]
///   team_ranking: shared
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Taxonomy {
    pub version: u32,

    /// Statuses whose final round holds the official result
    pub final_statuses: Vec<String>,

    /// Statuses that only have a provisional standing so far
    pub provisional_statuses: Vec<String>,

    /// Round names read for final statuses, first match wins
    pub final_rounds: Vec<String>,

    /// Round names read for provisional statuses, first match wins
    pub provisional_rounds: Vec<String>,

    /// Buckets reported by the event stats summary, in display order
    pub stats_buckets: Vec<StatsBucket>,

    /// Event name fragments where a larger mark wins (jumps, throws, multis)
    pub higher_mark_better: Vec<String>,

    pub team_ranking: TeamRankPolicy,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            version: TAXONOMY_VERSION,
            final_statuses: strings(&["scored", "scored-protest", "scored-under-review"]),
            provisional_statuses: strings(&[
                "official",
                "complete",
                "protest",
                "under-review",
                "in-progress",
                "projected",
                "scheduled",
                "standings",
            ]),
            final_rounds: strings(&["final", "scored"]),
            provisional_rounds: strings(&[
                "semifinal",
                "semis",
                "prelim",
                "prelims",
                "projection",
                "projections",
                "projected",
            ]),
            stats_buckets: vec![
                StatsBucket::new("scored", &["scored"]),
                StatsBucket::new(
                    "scored-pending",
                    &["scored-protest", "scored-under-review", "protest", "under-review"],
                ),
                StatsBucket::new("in-progress", &["in-progress"]),
                StatsBucket::new(
                    "projected",
                    &["scheduled", "official", "complete", "projected", "standings"],
                ),
            ],
            higher_mark_better: strings(&[
                "Weight",
                "Heptathlon",
                "Decathlon",
                "Pentathlon",
                "Hammer",
                "Pole Vault",
                "Javelin",
                "Long Jump",
                "Shot Put",
                "Discus",
                "High Jump",
                "Triple Jump",
            ]),
            team_ranking: TeamRankPolicy::Sequential,
        }
    }
}

/// A named group of raw statuses counted together in the stats summary.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StatsBucket {
    pub name: String,
    pub statuses: Vec<String>,
}

impl StatsBucket {
    pub fn new(name: &str, statuses: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            statuses: strings(statuses),
        }
    }
}

/// How teams level on total points are ranked.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamRankPolicy {
    /// 1, 2, 3 by standing position, even on equal totals
    #[default]
    Sequential,
    /// 1, 1, 3 (equal totals share the better rank)
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Final,
    Provisional,
    Unrecognized,
}

fn normalize(status: &str) -> String {
    status.trim().to_ascii_lowercase()
}

fn contains_status(list: &[String], status: &str) -> bool {
    list.iter().any(|s| normalize(s) == status)
}

impl Taxonomy {
    pub fn categorize(&self, status: Option<&str>) -> StatusCategory {
        let Some(status) = status.map(normalize) else {
            return StatusCategory::Unrecognized;
        };
        if contains_status(&self.final_statuses, &status) {
            StatusCategory::Final
        } else if contains_status(&self.provisional_statuses, &status) {
            StatusCategory::Provisional
        } else {
            StatusCategory::Unrecognized
        }
    }

    /// Round names to try for a category, in preference order
    pub fn round_preference(&self, category: StatusCategory) -> &[String] {
        match category {
            StatusCategory::Final => &self.final_rounds,
            StatusCategory::Provisional => &self.provisional_rounds,
            StatusCategory::Unrecognized => &[],
        }
    }

    /// Name of the stats bucket a status is counted in
    pub fn bucket_for(&self, status: Option<&str>) -> Option<&str> {
        let status = normalize(status?);
        self.stats_buckets
            .iter()
            .find(|b| contains_status(&b.statuses, &status))
            .map(|b| b.name.as_str())
    }

    pub fn higher_is_better(&self, event_name: &str) -> bool {
        let name = event_name.to_ascii_lowercase();
        self.higher_mark_better
            .iter()
            .any(|fragment| name.contains(&fragment.to_ascii_lowercase()))
    }
}
