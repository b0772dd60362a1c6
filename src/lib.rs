//! Live team standings for multi-event track & field meets.
//!
//! The [`scoring`] module is the engine: it picks each event's authoritative
//! round, ranks and scores the field, and folds the results into team
//! standings. Everything else loads snapshots and renders the results.

pub mod config;
pub mod logging;
pub mod model;
pub mod output;
pub mod scoring;
pub mod source;
