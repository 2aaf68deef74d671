use std::collections::BTreeMap;

use super::{DiffError, DiffResult};

/// Merge the rename tables of two versions into one map from source field
/// names to destination field names.
///
/// Each table maps an original member name to its renamed field name.
/// A destination rename `A -> B` becomes `S -> B`, where `S` is the source
/// version's name for `A` (`A` itself when the source does not rename it);
/// renames both versions agree on drop out. A source rename `A -> S` with no
/// destination counterpart becomes `S -> A`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use ackgen_model::multiversion::compute_renames_delta;
///
/// let source = BTreeMap::from([("A".to_owned(), "B".to_owned())]);
/// let destination = BTreeMap::from([("A".to_owned(), "C".to_owned())]);
/// let delta = compute_renames_delta(&source, &destination).unwrap();
/// assert_eq!(delta, BTreeMap::from([("B".to_owned(), "C".to_owned())]));
/// ```
pub fn compute_renames_delta(
    source: &BTreeMap<String, String>,
    destination: &BTreeMap<String, String>,
) -> DiffResult<BTreeMap<String, String>> {
    for (source_original, source_target) in source {
        if let Some((destination_original, _)) = destination
            .iter()
            .find(|(original, target)| *target == source_target && *original != source_original)
        {
            return Err(DiffError::ConflictingRename {
                source_original: source_original.clone(),
                destination_original: destination_original.clone(),
                target: source_target.clone(),
            });
        }
    }

    let mut delta = BTreeMap::new();
    for (original, destination_target) in destination {
        match source.get(original) {
            Some(source_target) if source_target == destination_target => {}
            Some(source_target) => {
                delta.insert(source_target.clone(), destination_target.clone());
            }
            None => {
                delta.insert(original.clone(), destination_target.clone());
            }
        }
    }
    for (original, source_target) in source {
        if !destination.contains_key(original) {
            delta.insert(source_target.clone(), original.clone());
        }
    }
    Ok(delta)
}
