use std::path::Path;

use meet_standings::scoring::{compute_standings, summarize, Taxonomy};
use meet_standings::source::SnapshotSource;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

const MEET: &str = r#"{
  "id": "conference",
  "name": "Conference Outdoor",
  "year": 2025,
  "season": "outdoor"
}"#;

const WOMEN: &str = r#"[
  {
    "id": "100-m",
    "event_name": "100 M",
    "status": "scored",
    "rounds": {
      "prelim": {"round_results": [
        {"name": "Ana Prelim", "team_name": "Alpha", "team_abbr": "ALP", "mark": "11.90"}
      ]},
      "final": {"round_results": [
        {"name": "Ana Alpha", "team_name": "Alpha", "team_abbr": "ALP", "mark": "10.2"},
        {"name": "Bea Beta", "team_name": "Beta", "team_abbr": "BET", "mark": "10.5"},
        {"name": "Cat Gamma", "team_name": "Gamma", "team_abbr": "GAM", "mark": 9.9}
      ]}
    }
  },
  {
    "id": "long-jump",
    "event_name": "Long Jump",
    "status": "in-progress",
    "rounds": {
      "projection": {"round_results": [
        {"name": "Dee Beta", "team_name": "Beta", "sb": "6.40m"},
        {"name": "Eve Gamma", "team_name": "Gamma", "sb": "6.40m"},
        {"name": "Fay Gamma", "team_name": "Gamma", "sb": "6.10m"},
        {"name": "Gia Gamma", "team_name": "Gamma", "sb": "NM"}
      ]}
    }
  },
  {
    "id": "steeple",
    "event_name": "3000 M Steeple",
    "status": "withdrawn",
    "rounds": {
      "final": {"round_results": [
        {"name": "Hal Alpha", "team_name": "Alpha", "mark": "9:58.10"}
      ]}
    }
  },
  {
    "id": "relay",
    "event_name": "4x400 M Relay",
    "rounds": {}
  }
]"#;

fn snapshot_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "years/2025/meets/conference/meet.json", MEET);
    write(dir.path(), "years/2025/meets/conference/women.json", WOMEN);
    write(dir.path(), "years/2025/meets/conference/men.json", "[]");
    dir
}

#[tokio::test]
async fn test_standings_from_snapshot() {
    let dir = snapshot_tree();
    let source = SnapshotSource::new(dir.path());
    let meet = source
        .load_snapshot(2025, "conference", &["women".to_string()])
        .await
        .unwrap();
    let standings = compute_standings(meet.events("women"), &Taxonomy::default());

    // 100 M final: Gamma 10, Alpha 8, Beta 6
    let sprint = &standings.events[0];
    assert_eq!(sprint.round.as_deref(), Some("final"));
    let places: Vec<_> = sprint
        .results
        .iter()
        .map(|r| (r.record.competitor(), r.place, r.score))
        .collect();
    assert_eq!(
        places,
        vec![
            ("Cat Gamma", Some(1), 10.0),
            ("Ana Alpha", Some(2), 8.0),
            ("Bea Beta", Some(3), 6.0),
        ]
    );

    // Long jump projection: Beta and Gamma tie for first at 6.40 (9 each),
    // Gamma's 6.10 is third (6), no mark scores nothing
    let jump = &standings.events[1];
    assert_eq!(jump.round.as_deref(), Some("projection"));
    assert!(!jump.is_final);
    assert_eq!(jump.results[3].place, None);

    let teams: Vec<_> = standings
        .teams
        .iter()
        .map(|t| (t.team_name.as_str(), t.total_points, t.rank))
        .collect();
    assert_eq!(
        teams,
        vec![("Gamma", 25.0, 1), ("Beta", 15.0, 2), ("Alpha", 8.0, 3)]
    );

    // Alpha never entered the long jump but still reports it, and the
    // withdrawn steeple adds nothing
    let alpha = standings.team("Alpha").unwrap();
    assert_eq!(alpha.events["long-jump"].points, 0.0);
    assert!(alpha.events["long-jump"].contributors.is_empty());
    assert_eq!(alpha.events["steeple"].points, 0.0);

    let ids = ["100-m", "long-jump", "relay", "steeple"];
    for team in &standings.teams {
        let keys: Vec<_> = team.events.keys().map(String::as_str).collect();
        assert_eq!(keys, ids);
    }

    // Same snapshot, same answer
    assert_eq!(standings, compute_standings(meet.events("women"), &Taxonomy::default()));
}

#[tokio::test]
async fn test_stats_for_every_partition() {
    let dir = snapshot_tree();
    let source = SnapshotSource::new(dir.path());
    let genders = source.list_genders(2025, "conference").await.unwrap();
    assert_eq!(genders, vec!["men".to_string(), "women".to_string()]);

    let meet = source.load_snapshot(2025, "conference", &genders).await.unwrap();
    let women = summarize(meet.events("women"), &Taxonomy::default());
    assert_eq!(women.total, 4);
    assert_eq!(women.classified, 2);
    assert_eq!(women.count("scored"), 1);
    assert_eq!(women.count("in-progress"), 1);

    let men = summarize(meet.events("men"), &Taxonomy::default());
    assert_eq!(men.total, 0);
    assert!(compute_standings(meet.events("men"), &Taxonomy::default()).teams.is_empty());
}

#[tokio::test]
async fn test_top_level_rounds_are_scored() {
    let dir = snapshot_tree();
    write(
        dir.path(),
        "years/2025/meets/conference/men.json",
        r#"[{
          "id": "shot-put",
          "event_name": "Shot Put",
          "status": "scored",
          "prelims": {"round_results": [
            {"name": "Ike Alpha", "team_name": "Alpha", "mark": "19.10m"}
          ]},
          "final": {"round_results": [
            {"name": "Ike Alpha", "team_name": "Alpha", "mark": "FOUL"},
            {"name": "Ike Alpha", "team_name": "Alpha", "mark": "18.75m"},
            {"name": "Jon Beta", "team_name": "Beta", "mark": "18.20m"}
          ]}
        }]"#,
    );
    let source = SnapshotSource::new(dir.path());
    let meet = source
        .load_snapshot(2025, "conference", &["men".to_string()])
        .await
        .unwrap();
    let standings = compute_standings(meet.events("men"), &Taxonomy::default());

    assert_eq!(standings.events[0].round.as_deref(), Some("final"));
    // The duplicate foul row is dropped in favour of the measured throw
    assert_eq!(standings.events[0].results.len(), 2);
    assert_eq!(standings.team("Alpha").unwrap().total_points, 10.0);
    assert_eq!(standings.team("Beta").unwrap().total_points, 8.0);
}
