use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::model::Meet;
use crate::scoring::{EventOutcome, EventStats, Standings, TeamStanding};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format points compactly: "10", "4.5", "3.33"
pub fn format_points(points: f64) -> String {
    let formatted = format!("{:.2}", points);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Short tag for the round an event's points came from
pub fn round_indicator(outcome: &EventOutcome) -> &'static str {
    let Some(round) = outcome.round.as_deref() else {
        return "";
    };
    if outcome.is_final {
        return "F";
    }
    let round = round.to_ascii_lowercase();
    if round.starts_with("semi") {
        "S"
    } else if round.starts_with("prelim") {
        "P"
    } else if round.starts_with("project") {
        "J"
    } else {
        "?"
    }
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn event_label(outcome: &EventOutcome) -> String {
    match round_indicator(outcome) {
        "" => outcome.event_name.clone(),
        tag => format!("{} [{}]", outcome.event_name, tag),
    }
}

/// Format standings as a table: rank, team, total, then one column per event.
/// Event columns that do not fit the terminal are dropped from the right.
pub fn format_standings_table(standings: &Standings, use_colors: bool) -> String {
    if standings.teams.is_empty() {
        return "No team results yet.".to_string();
    }

    let rank_width = 4;
    let team_width = standings
        .teams
        .iter()
        .map(|t| t.team_name.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 24);
    let total_width = 6;
    let separator = "  ";

    let columns: Vec<(String, usize)> = standings
        .events
        .iter()
        .map(|e| {
            let label = event_label(e);
            let width = label.chars().count().max(4);
            (label, width)
        })
        .collect();

    let fixed_width = rank_width + team_width + total_width + separator.len() * 2;
    let shown = match get_terminal_width() {
        Some(width) => {
            let mut used = fixed_width;
            columns
                .iter()
                .take_while(|(_, w)| {
                    used += w + separator.len();
                    used <= width
                })
                .count()
        }
        None => columns.len(),
    };

    let mut header = format!(
        "{:>rank_width$}{sep}{:<team_width$}{sep}{:>total_width$}",
        "#",
        "Team",
        "Points",
        sep = separator,
    );
    for (label, width) in &columns[..shown] {
        header.push_str(separator);
        header.push_str(&format!("{:>width$}", label, width = *width));
    }

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for team in &standings.teams {
        let rank = format!("{:>rank_width$}", format!("{}.", team.rank));
        let name = format!("{:<team_width$}", truncate(&team.team_name, team_width));
        let total = format!("{:>total_width$}", format_points(team.total_points));

        let mut line = if use_colors {
            format!(
                "{}{sep}{}{sep}{}",
                rank.dimmed(),
                name,
                total.bold(),
                sep = separator
            )
        } else {
            format!("{}{sep}{}{sep}{}", rank, name, total, sep = separator)
        };

        for (outcome, (_, width)) in standings.events.iter().zip(&columns).take(shown) {
            line.push_str(separator);
            line.push_str(&format!(
                "{:>width$}",
                format_points(team.event_points(&outcome.event_id)),
                width = *width
            ));
        }
        lines.push(line);
    }

    if shown < columns.len() {
        lines.push(format!(
            "({} more events not shown; use --format tsv for all columns)",
            columns.len() - shown
        ));
    }

    lines.join("\n")
}

/// Format standings as tab-separated values for scripting.
/// Header row first, then: rank, team, total, one column per event id.
pub fn format_standings_tsv(standings: &Standings) -> String {
    let mut header = vec!["rank".to_string(), "team".to_string(), "total".to_string()];
    header.extend(standings.events.iter().map(|e| e.event_id.clone()));

    let mut lines = vec![header.join("\t")];
    for team in &standings.teams {
        let mut row = vec![
            team.rank.to_string(),
            team.team_name.clone(),
            format_points(team.total_points),
        ];
        row.extend(
            standings
                .events
                .iter()
                .map(|e| format_points(team.event_points(&e.event_id))),
        );
        lines.push(row.join("\t"));
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct StandingsReport<'a> {
    meet: &'a str,
    year: i32,
    gender: &'a str,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    standings: &'a Standings,
}

/// Format standings as pretty JSON, including per-event ranked results
pub fn format_standings_json(meet: &Meet, gender: &str, standings: &Standings) -> Result<String> {
    let report = StandingsReport {
        meet: &meet.key,
        year: meet.year,
        gender,
        generated_at: Utc::now(),
        standings,
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize standings")
}

/// Per-event contributors for one team, skipping events it has nothing in
pub fn format_team_breakdown(
    team: &TeamStanding,
    standings: &Standings,
    use_colors: bool,
) -> String {
    let title = format!(
        "{}. {} - {} pts",
        team.rank,
        team.team_name,
        format_points(team.total_points)
    );
    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];

    for outcome in &standings.events {
        let Some(entry) = team.events.get(&outcome.event_id) else {
            continue;
        };
        if entry.contributors.is_empty() {
            continue;
        }
        lines.push(format!(
            "  {}: {}",
            event_label(outcome),
            format_points(entry.points)
        ));
        for contribution in &entry.contributors {
            lines.push(format!(
                "    {:<28} {:>6}",
                truncate(&contribution.competitor, 28),
                format_points(contribution.points)
            ));
        }
    }

    if lines.len() == 1 {
        lines.push("  No entries.".to_string());
    }
    lines.join("\n")
}

/// Event progress summary for one gender
pub fn format_stats(gender: &str, stats: &EventStats, use_colors: bool) -> String {
    let title = format!("{}: {} of {} events classified", gender, stats.classified, stats.total);
    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];
    for bucket in &stats.buckets {
        lines.push(format!("  {:<16}{:>4}", bucket.name, bucket.count));
    }
    lines.join("\n")
}

/// One line per meet: key, name, season
pub fn format_meet_list(meets: &[Meet], use_colors: bool) -> String {
    if meets.is_empty() {
        return "No meets found.".to_string();
    }

    meets
        .iter()
        .map(|meet| {
            let season = meet.season.as_deref().unwrap_or("-");
            if use_colors {
                format!("{}  {}  {}", meet.key.cyan(), meet.name.bold(), season.dimmed())
            } else {
                format!("{}  {}  {}", meet.key, meet.name, season)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
