//! Canonical ordering of character relationships.
//!
//! A relationship between two characters is stored once per unordered pair.
//! The stored row always has `from_id < to_id`, and its two labels are kept in
//! the orientation matching that order: `relationship_type` describes the link
//! as seen from `from_id`, `reciprocal_relationship_type` as seen from `to_id`.
//!
//! Writes go through [`RelationshipEdge::canonicalize`]; reads go through
//! [`RelationshipEdge::oriented_for`] so the queried character always appears
//! as `from_id`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a relationship label, matching the `VARCHAR(100)` columns.
pub const MAX_LABEL_LEN: usize = 100;

/// A directed view of a relationship between two characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub from_id: DbId,
    pub to_id: DbId,
    pub relationship_type: String,
    pub reciprocal_relationship_type: String,
    pub visualize: bool,
}

impl RelationshipEdge {
    pub fn new(
        from_id: DbId,
        to_id: DbId,
        relationship_type: impl Into<String>,
        reciprocal_relationship_type: impl Into<String>,
        visualize: bool,
    ) -> Self {
        Self {
            from_id,
            to_id,
            relationship_type: relationship_type.into(),
            reciprocal_relationship_type: reciprocal_relationship_type.into(),
            visualize,
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.from_id < self.to_id
    }

    /// Swap both endpoints and both labels. `visualize` is orientation-independent.
    pub fn flipped(self) -> Self {
        Self {
            from_id: self.to_id,
            to_id: self.from_id,
            relationship_type: self.reciprocal_relationship_type,
            reciprocal_relationship_type: self.relationship_type,
            visualize: self.visualize,
        }
    }

    /// Return the storage orientation (`from_id < to_id`).
    pub fn canonicalize(self) -> Self {
        if self.from_id > self.to_id {
            self.flipped()
        } else {
            self
        }
    }

    /// Return the view in which `character_id` is `from_id`.
    ///
    /// Edges that do not involve `character_id` are returned unchanged.
    pub fn oriented_for(self, character_id: DbId) -> Self {
        if self.to_id == character_id && self.from_id != character_id {
            self.flipped()
        } else {
            self
        }
    }

    pub fn involves(&self, character_id: DbId) -> bool {
        self.from_id == character_id || self.to_id == character_id
    }

    /// The endpoint that is not `character_id`, if the edge involves it.
    pub fn other_end(&self, character_id: DbId) -> Option<DbId> {
        if self.from_id == character_id {
            Some(self.to_id)
        } else if self.to_id == character_id {
            Some(self.from_id)
        } else {
            None
        }
    }

    /// Whether both edges connect the same ordered pair.
    pub fn same_pair(&self, other: &Self) -> bool {
        self.from_id == other.from_id && self.to_id == other.to_id
    }

    /// Whether both edges carry the same labels and `visualize` flag.
    ///
    /// Both edges must share an orientation for the comparison to be meaningful.
    pub fn same_labels(&self, other: &Self) -> bool {
        self.relationship_type == other.relationship_type
            && self.reciprocal_relationship_type == other.reciprocal_relationship_type
            && self.visualize == other.visualize
    }

    /// Reject self-relationships and empty or oversized labels.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.from_id == self.to_id {
            return Err(CoreError::validation(
                "A character cannot have a relationship with itself",
            ));
        }
        for (field, label) in [
            ("relationship_type", &self.relationship_type),
            ("reciprocal_relationship_type", &self.reciprocal_relationship_type),
        ] {
            if label.trim().is_empty() {
                return Err(CoreError::validation(format!("{field} is required")));
            }
            if label.chars().count() > MAX_LABEL_LEN {
                return Err(CoreError::validation(format!(
                    "{field} must be at most {MAX_LABEL_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

/// Ids present in `existing` but absent from `kept`, in `existing` order.
pub fn stale_ids(existing: &[DbId], kept: &[DbId]) -> Vec<DbId> {
    existing
        .iter()
        .copied()
        .filter(|id| !kept.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn edge(from: DbId, to: DbId) -> RelationshipEdge {
        RelationshipEdge::new(from, to, "parent", "child", true)
    }

    #[test]
    fn canonicalize_keeps_ordered_pair() {
        let e = edge(1, 2).canonicalize();
        assert_eq!(e, edge(1, 2));
    }

    #[test]
    fn canonicalize_swaps_ids_and_labels_together() {
        let e = edge(9, 4).canonicalize();
        assert_eq!(e.from_id, 4);
        assert_eq!(e.to_id, 9);
        assert_eq!(e.relationship_type, "child");
        assert_eq!(e.reciprocal_relationship_type, "parent");
        assert!(e.visualize, "visualize must not be affected by orientation");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let once = edge(9, 4).canonicalize();
        let twice = once.clone().canonicalize();
        assert_eq!(once, twice);
        assert!(twice.is_canonical());
    }

    #[test]
    fn both_orientations_canonicalize_to_same_row() {
        let a = RelationshipEdge::new(3, 8, "mentor", "student", false).canonicalize();
        let b = RelationshipEdge::new(8, 3, "student", "mentor", false).canonicalize();
        assert_eq!(a, b);
    }

    #[test]
    fn oriented_views_are_complementary() {
        let stored = edge(2, 5);
        let for_low = stored.clone().oriented_for(2);
        let for_high = stored.oriented_for(5);

        assert_eq!(for_low.from_id, 2);
        assert_eq!(for_high.from_id, 5);
        assert_eq!(for_low.to_id, for_high.from_id);
        assert_eq!(for_low.relationship_type, for_high.reciprocal_relationship_type);
        assert_eq!(for_low.reciprocal_relationship_type, for_high.relationship_type);
    }

    #[test]
    fn oriented_for_unrelated_character_is_unchanged() {
        assert_eq!(edge(2, 5).oriented_for(11), edge(2, 5));
    }

    #[test]
    fn other_end_resolves_partner() {
        let e = edge(2, 5);
        assert_eq!(e.other_end(2), Some(5));
        assert_eq!(e.other_end(5), Some(2));
        assert_eq!(e.other_end(3), None);
    }

    #[test]
    fn same_labels_ignores_ids() {
        assert!(edge(1, 2).same_labels(&edge(7, 8)));
        let mut changed = edge(1, 2);
        changed.visualize = false;
        assert!(!edge(1, 2).same_labels(&changed));
    }

    #[test]
    fn validate_rejects_self_relationship() {
        assert_matches!(edge(4, 4).validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn validate_rejects_blank_label() {
        let e = RelationshipEdge::new(1, 2, "  ", "child", false);
        let err = e.validate().unwrap_err();
        assert!(err.to_string().contains("relationship_type"));
    }

    #[test]
    fn validate_rejects_oversized_label() {
        let e = RelationshipEdge::new(1, 2, "parent", "x".repeat(MAX_LABEL_LEN + 1), false);
        assert_matches!(e.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn stale_ids_excludes_kept() {
        assert_eq!(stale_ids(&[1, 2, 3, 4], &[2, 4, 9]), vec![1, 3]);
        assert_eq!(stale_ids(&[1, 2], &[]), vec![1, 2]);
        assert!(stale_ids(&[], &[1]).is_empty());
    }
}
