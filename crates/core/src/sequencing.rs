//! Ordering rules for the shots of a scene.
//!
//! Every shot carries a zero-based `order_index` that must stay dense and
//! unique within its scene. Reordering only accepts a *full* permutation of
//! the current shot ids — single-element moves are deliberately unsupported,
//! which keeps the invariant trivially checkable and avoids incremental
//! index arithmetic under concurrent edits.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Validate that `proposed` is a full permutation of `current`.
///
/// Fails with [`CoreError::InvalidPermutation`] if any id is missing,
/// duplicated, or does not belong to the scene. An empty scene accepts only
/// the empty permutation.
pub fn validate_permutation(current: &[DbId], proposed: &[DbId]) -> Result<(), CoreError> {
    if proposed.len() != current.len() {
        return Err(CoreError::InvalidPermutation(format!(
            "expected {} shot ids, got {}",
            current.len(),
            proposed.len()
        )));
    }

    let known: HashSet<DbId> = current.iter().copied().collect();
    let mut seen: HashSet<DbId> = HashSet::with_capacity(proposed.len());
    for &id in proposed {
        if !known.contains(&id) {
            return Err(CoreError::InvalidPermutation(format!(
                "shot {id} does not belong to the scene"
            )));
        }
        if !seen.insert(id) {
            return Err(CoreError::InvalidPermutation(format!(
                "shot {id} appears more than once"
            )));
        }
    }
    // Lengths match and every proposed id is a distinct member of `current`,
    // so `proposed` covers `current` exactly.
    Ok(())
}

/// Check that a scene's order indices are exactly `{0, 1, ..., n-1}`.
///
/// `indices` must come in ascending query order. A breach means the sequencer
/// was bypassed; it is surfaced as [`CoreError::ConsistencyViolation`] and
/// never repaired silently.
pub fn validate_dense_indices(indices: &[i32]) -> Result<(), CoreError> {
    for (position, &index) in indices.iter().enumerate() {
        if index != position as i32 {
            return Err(CoreError::ConsistencyViolation(format!(
                "order_index {index} found at position {position}; expected {position}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- validate_permutation ------------------------------------------------

    #[test]
    fn accepts_identity_permutation() {
        assert!(validate_permutation(&[1, 2, 3], &[1, 2, 3]).is_ok());
    }

    #[test]
    fn accepts_rotation() {
        assert!(validate_permutation(&[1, 2, 3], &[3, 1, 2]).is_ok());
    }

    #[test]
    fn accepts_empty_scene() {
        assert!(validate_permutation(&[], &[]).is_ok());
    }

    #[test]
    fn rejects_missing_id() {
        assert_matches!(
            validate_permutation(&[1, 2, 3], &[1, 2]),
            Err(CoreError::InvalidPermutation(_))
        );
    }

    #[test]
    fn rejects_duplicate_id() {
        assert_matches!(
            validate_permutation(&[1, 2, 3], &[1, 2, 2]),
            Err(CoreError::InvalidPermutation(_))
        );
    }

    #[test]
    fn rejects_foreign_id() {
        assert_matches!(
            validate_permutation(&[1, 2, 3], &[1, 2, 99]),
            Err(CoreError::InvalidPermutation(_))
        );
    }

    #[test]
    fn rejects_extra_id() {
        assert_matches!(
            validate_permutation(&[1, 2], &[1, 2, 3]),
            Err(CoreError::InvalidPermutation(_))
        );
    }

    // -- validate_dense_indices ----------------------------------------------

    #[test]
    fn dense_indices_pass() {
        assert!(validate_dense_indices(&[0, 1, 2, 3]).is_ok());
        assert!(validate_dense_indices(&[]).is_ok());
    }

    #[test]
    fn gap_is_a_consistency_violation() {
        assert_matches!(
            validate_dense_indices(&[0, 2, 3]),
            Err(CoreError::ConsistencyViolation(_))
        );
    }

    #[test]
    fn duplicate_index_is_a_consistency_violation() {
        assert_matches!(
            validate_dense_indices(&[0, 1, 1]),
            Err(CoreError::ConsistencyViolation(_))
        );
    }

    #[test]
    fn nonzero_start_is_a_consistency_violation() {
        assert_matches!(
            validate_dense_indices(&[1, 2, 3]),
            Err(CoreError::ConsistencyViolation(_))
        );
    }
}
