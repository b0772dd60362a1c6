use serde::Serialize;

use super::taxonomy::Taxonomy;
use crate::model::Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub name: String,
    pub count: usize,
}

/// Event progress for one meet and gender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventStats {
    /// One entry per taxonomy bucket, in taxonomy order, zeros included
    pub buckets: Vec<BucketCount>,
    /// Events whose status landed in some bucket
    pub classified: usize,
    /// Every event, recognized status or not
    pub total: usize,
}

impl EventStats {
    pub fn count(&self, bucket: &str) -> usize {
        self.buckets
            .iter()
            .find(|b| b.name == bucket)
            .map(|b| b.count)
            .unwrap_or(0)
    }
}

/// Count events per status bucket. Unknown or missing statuses only count
/// toward the total.
pub fn summarize(events: &[Event], taxonomy: &Taxonomy) -> EventStats {
    let mut buckets: Vec<BucketCount> = taxonomy
        .stats_buckets
        .iter()
        .map(|b| BucketCount {
            name: b.name.clone(),
            count: 0,
        })
        .collect();

    let mut classified = 0;
    for event in events {
        match taxonomy.bucket_for(event.status.as_deref()) {
            Some(name) => {
                if let Some(bucket) = buckets.iter_mut().find(|b| b.name == name) {
                    bucket.count += 1;
                    classified += 1;
                }
            }
            None => {
                tracing::debug!(
                    event = %event.id,
                    status = ?event.status,
                    "status not counted in any bucket"
                );
            }
        }
    }

    EventStats {
        buckets,
        classified,
        total: events.len(),
    }
}
