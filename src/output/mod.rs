pub mod formatter;

pub use formatter::{
    format_meet_list, format_points, format_standings_json, format_standings_table,
    format_standings_tsv, format_stats, format_team_breakdown, round_indicator, should_use_colors,
};
