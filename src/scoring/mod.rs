pub mod aggregator;
pub mod marks;
pub mod points;
pub mod ranker;
pub mod selector;
pub mod stats;
pub mod taxonomy;
pub mod validation;

pub use aggregator::{
    aggregate, compute_standings, score_event, Contribution, EventOutcome, EventPoints, Standings,
    TeamStanding,
};
pub use points::{points_for_place, split_points, POINTS_TABLE};
pub use ranker::{rank, RankedRecord};
pub use selector::{select_results, Selection};
pub use stats::{summarize, BucketCount, EventStats};
pub use taxonomy::{StatsBucket, StatusCategory, Taxonomy, TeamRankPolicy, TAXONOMY_VERSION};
pub use validation::validate_taxonomy;
