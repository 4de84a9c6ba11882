use crate::types::{destination::base_name_of, Destination};
use std::collections::HashMap;

/// Outcome of [`merge_destinations`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    pub destinations: Vec<Destination>,
    /// How many records were folded into an earlier one
    pub merged: usize,
}

/// Fold destinations that share a base name into the first one seen.
///
/// Empty fields adopt the duplicate's value. List fields accumulate.
/// `why_it_fits` accumulates line by line. `description` is never
/// overwritten once set. Output keeps the order of first appearance.
pub fn merge_destinations(destinations: Vec<Destination>) -> MergeOutcome {
    let mut merged: Vec<Destination> = Vec::with_capacity(destinations.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut folded = 0;

    for destination in destinations {
        let key = base_name_of(&destination.name).to_string();
        match index.get(&key) {
            Some(&position) => {
                tracing::debug!(
                    target: "travel_parser::merger",
                    base_name = %key,
                    duplicate = %destination.name,
                    "merging duplicate destination"
                );
                absorb(&mut merged[position], destination);
                folded += 1;
            }
            None => {
                index.insert(key, merged.len());
                merged.push(destination);
            }
        }
    }

    MergeOutcome {
        destinations: merged,
        merged: folded,
    }
}

fn absorb(canonical: &mut Destination, duplicate: Destination) {
    if canonical.description.is_empty() {
        canonical.description = duplicate.description;
    }
    join_text(&mut canonical.why_it_fits, duplicate.why_it_fits);
    canonical.places_to_visit.extend(duplicate.places_to_visit);
    canonical.restaurants.extend(duplicate.restaurants);
    canonical.activities.extend(duplicate.activities);
    canonical.accommodations.extend(duplicate.accommodations);
}

fn join_text(target: &mut String, extra: String) {
    if extra.is_empty() {
        return;
    }
    if target.is_empty() {
        *target = extra;
    } else {
        target.push('\n');
        target.push_str(&extra);
    }
}
