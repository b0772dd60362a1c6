use super::taxonomy::{Taxonomy, TAXONOMY_VERSION};
use std::collections::HashMap;

/// Validate a status taxonomy at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_taxonomy(taxonomy: &Taxonomy) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if taxonomy.version != TAXONOMY_VERSION {
        errors.push(format!(
            "taxonomy.version: unsupported version {} (expected {})",
            taxonomy.version, TAXONOMY_VERSION
        ));
    }

    check_names(&mut errors, "taxonomy.final_statuses", &taxonomy.final_statuses);
    check_names(&mut errors, "taxonomy.provisional_statuses", &taxonomy.provisional_statuses);
    check_names(&mut errors, "taxonomy.final_rounds", &taxonomy.final_rounds);
    check_names(&mut errors, "taxonomy.provisional_rounds", &taxonomy.provisional_rounds);

    // A status can only mean one thing
    for (i, status) in taxonomy.provisional_statuses.iter().enumerate() {
        if taxonomy
            .final_statuses
            .iter()
            .any(|f| f.trim().eq_ignore_ascii_case(status.trim()))
        {
            errors.push(format!(
                "taxonomy.provisional_statuses[{}]: '{}' is also listed as a final status",
                i, status
            ));
        }
    }

    let mut bucket_names = HashMap::new();
    let mut claimed: HashMap<String, &str> = HashMap::new();
    for (i, bucket) in taxonomy.stats_buckets.iter().enumerate() {
        let name = bucket.name.trim();
        if name.is_empty() {
            errors.push(format!("taxonomy.stats_buckets[{}].name: must not be empty", i));
        } else if let Some(first) = bucket_names.insert(name.to_ascii_lowercase(), i) {
            errors.push(format!(
                "taxonomy.stats_buckets[{}].name: '{}' duplicates stats_buckets[{}]",
                i, name, first
            ));
        }

        for (j, status) in bucket.statuses.iter().enumerate() {
            let key = status.trim().to_ascii_lowercase();
            if key.is_empty() {
                errors.push(format!(
                    "taxonomy.stats_buckets[{}].statuses[{}]: must not be blank",
                    i, j
                ));
            } else if let Some(owner) = claimed.insert(key, &bucket.name) {
                errors.push(format!(
                    "taxonomy.stats_buckets[{}].statuses[{}]: '{}' is already counted in \
                     bucket '{}'",
                    i, j, status, owner
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_names(errors: &mut Vec<String>, field: &str, names: &[String]) {
    if names.is_empty() {
        errors.push(format!("{}: must not be empty", field));
    }
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(format!("{}[{}]: must not be blank", field, i));
        }
    }
}
