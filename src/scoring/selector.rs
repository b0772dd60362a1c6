use super::taxonomy::{StatusCategory, Taxonomy};
use crate::model::{Event, PerformanceRecord, Round};

/// The authoritative outcome of an event as of the current snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub category: StatusCategory,
    /// Name of the round the records were read from
    pub round: Option<&'a str>,
    pub records: &'a [PerformanceRecord],
    pub ascending: bool,
    pub is_final: bool,
}

/// Pick the round whose results represent the event's current outcome.
///
/// Final statuses read the final round; provisional statuses read the first
/// populated round in the taxonomy's preference order. Rounds are never
/// merged. Unknown or missing statuses, and events with nothing populated
/// yet, select no records.
pub fn select_results<'a>(event: &'a Event, taxonomy: &Taxonomy) -> Selection<'a> {
    let category = taxonomy.categorize(event.status.as_deref());

    let found = taxonomy
        .round_preference(category)
        .iter()
        .find_map(|wanted| find_round(event, wanted));

    let ascending = found
        .and_then(|(_, round)| round.ascending)
        .or(event.ascending)
        .unwrap_or_else(|| !taxonomy.higher_is_better(event.display_name()));

    let (round, records) = match found {
        Some((name, round)) => (Some(name), round.records.as_slice()),
        None => (None, &[][..]),
    };

    Selection {
        category,
        round,
        records,
        ascending,
        is_final: category == StatusCategory::Final,
    }
}

fn find_round<'a>(event: &'a Event, wanted: &str) -> Option<(&'a str, &'a Round)> {
    let wanted = wanted.trim();
    event
        .rounds
        .iter()
        .find(|(name, round)| name.trim().eq_ignore_ascii_case(wanted) && !round.records.is_empty())
        .map(|(name, round)| (name.as_str(), round))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<PerformanceRecord> {
        (0..n)
            .map(|i| {
                PerformanceRecord::new(&format!("Athlete {}", i), "Team").with_seed(10.0 + i as f64)
            })
            .collect()
    }

    #[test]
    fn test_scored_selects_final_round() {
        let event = Event::new("100", "100 M", Some("scored"))
            .with_round("prelim", records(3))
            .with_round("final", records(2));
        let selection = select_results(&event, &Taxonomy::default());
        assert_eq!(selection.round, Some("final"));
        assert_eq!(selection.records.len(), 2);
        assert!(selection.is_final);
        assert!(selection.ascending);
    }

    #[test]
    fn test_scored_accepts_scored_round_name() {
        let event =
            Event::new("100", "100 M", Some("scored-protest")).with_round("scored", records(4));
        let selection = select_results(&event, &Taxonomy::default());
        assert_eq!(selection.round, Some("scored"));
        assert!(selection.is_final);
    }

    #[test]
    fn test_provisional_prefers_semifinal() {
        let event = Event::new("400", "400 M", Some("in-progress"))
            .with_round("projection", records(8))
            .with_round("prelim", records(6))
            .with_round("semifinal", records(4));
        let selection = select_results(&event, &Taxonomy::default());
        assert_eq!(selection.round, Some("semifinal"));
        assert_eq!(selection.records.len(), 4);
        assert!(!selection.is_final);
        assert_eq!(selection.category, StatusCategory::Provisional);
    }

    #[test]
    fn test_provisional_falls_back_to_projection() {
        let event = Event::new("800", "800 M", Some("scheduled"))
            .with_round("prelim", vec![])
            .with_round("projection", records(5));
        let selection = select_results(&event, &Taxonomy::default());
        assert_eq!(selection.round, Some("projection"));
        assert_eq!(selection.records.len(), 5);
    }

    #[test]
    fn test_provisional_ignores_final_round() {
        // Official but not yet scored: the final round is not authoritative
        let event = Event::new("200", "200 M", Some("official"))
            .with_round("final", records(8))
            .with_round("prelim", records(16));
        let selection = select_results(&event, &Taxonomy::default());
        assert_eq!(selection.round, Some("prelim"));
        assert!(!selection.is_final);
    }

    #[test]
    fn test_unknown_status_selects_nothing() {
        let event =
            Event::new("lj", "Long Jump", Some("withdrawn")).with_round("final", records(3));
        let selection = select_results(&event, &Taxonomy::default());
        assert_eq!(selection.category, StatusCategory::Unrecognized);
        assert!(selection.records.is_empty());
        assert_eq!(selection.round, None);
    }

    #[test]
    fn test_missing_status_selects_nothing() {
        let event = Event::new("lj", "Long Jump", None).with_round("projection", records(3));
        assert!(select_results(&event, &Taxonomy::default()).records.is_empty());
    }

    #[test]
    fn test_no_rounds_selects_nothing() {
        let event = Event::new("hj", "High Jump", Some("scored"));
        let selection = select_results(&event, &Taxonomy::default());
        assert!(selection.records.is_empty());
        assert!(selection.is_final);
    }

    #[test]
    fn test_field_event_defaults_to_descending() {
        let event = Event::new("sp", "Shot Put", Some("scored")).with_round("final", records(2));
        assert!(!select_results(&event, &Taxonomy::default()).ascending);
    }

    #[test]
    fn test_direction_flags_override_event_name() {
        let mut event = Event::new("x", "Shot Put", Some("scored")).with_round("final", records(2));
        event.ascending = Some(true);
        assert!(select_results(&event, &Taxonomy::default()).ascending);

        if let Some(round) = event.rounds.get_mut("final") {
            round.ascending = Some(false);
        }
        assert!(!select_results(&event, &Taxonomy::default()).ascending);
    }

    #[test]
    fn test_round_names_match_case_insensitively() {
        let event = Event::new("100", "100 M", Some("Scored")).with_round("Final", records(2));
        assert_eq!(select_results(&event, &Taxonomy::default()).round, Some("Final"));
    }
}
