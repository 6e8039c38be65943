#![forbid(unsafe_code)]

//! Finalized node sequences.
//!
//! A [`Password`] is immutable. Its canonical string form (`[0-1-2]`) is the
//! identity used for equality and hashing, so two passwords are equal exactly
//! when they list the same ids in the same order.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::PasswordError;
use crate::node::NodeId;

#[derive(Debug, Clone)]
pub struct Password {
    ids: Vec<NodeId>,
    string: String,
}

impl Password {
    /// Build from ids that are already known to be on the grid (a live path).
    pub fn new(ids: impl IntoIterator<Item = NodeId>) -> Self {
        let ids: Vec<NodeId> = ids.into_iter().collect();
        let string = render(&ids);
        Self { ids, string }
    }

    /// Build from caller-supplied ids, where `None` stands for a missing value.
    ///
    /// Every id must be present and inside `[0, node_count)`. Validation
    /// happens before anything is built, so a failure has no partial effect.
    pub fn try_from_ids(
        ids: impl IntoIterator<Item = Option<i64>>,
        node_count: usize,
    ) -> Result<Self, PasswordError> {
        let mut checked = Vec::new();
        for (index, id) in ids.into_iter().enumerate() {
            let id = id.ok_or(PasswordError::NullId { index })?;
            let valid = usize::try_from(id).ok().filter(|id| *id < node_count);
            match valid {
                Some(id) => checked.push(id),
                None => {
                    return Err(PasswordError::OutOfRange {
                        index,
                        id,
                        node_count,
                    });
                }
            }
        }
        Ok(Self::new(checked))
    }

    /// Build from a slice of plain ids, checking the range.
    pub fn try_from_indices(ids: &[i64], node_count: usize) -> Result<Self, PasswordError> {
        Self::try_from_ids(ids.iter().copied().map(Some), node_count)
    }

    /// Check that every id fits a grid of `node_count` nodes.
    pub fn ensure_fits(&self, node_count: usize) -> Result<(), PasswordError> {
        match self.ids.iter().position(|id| *id >= node_count) {
            Some(index) => Err(PasswordError::OutOfRange {
                index,
                id: i64::try_from(self.ids[index]).unwrap_or(i64::MAX),
                node_count,
            }),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Canonical rendering, e.g. `[0-4-8]`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.string
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn render(ids: &[NodeId]) -> String {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("-");
    format!("[{joined}]")
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.string == other.string
    }
}

impl Eq for Password {}

impl Hash for Password {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.string.hash(state);
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(p: &Password) -> u64 {
        let mut h = DefaultHasher::new();
        p.hash(&mut h);
        h.finish()
    }

    #[test]
    fn renders_canonical_string() {
        assert_eq!(Password::new([0, 1, 2]).as_str(), "[0-1-2]");
        assert_eq!(Password::new([7]).to_string(), "[7]");
        assert_eq!(Password::new([]).as_str(), "[]");
    }

    #[test]
    fn validated_construction() {
        let p = Password::try_from_indices(&[0, 1, 2], 9).unwrap();
        assert_eq!(p.ids(), &[0, 1, 2]);
        assert_eq!(p.as_str(), "[0-1-2]");
    }

    #[test]
    fn null_id_is_rejected() {
        let err = Password::try_from_ids([Some(1), None, Some(2)], 9).unwrap_err();
        assert_eq!(err, PasswordError::NullId { index: 1 });
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        let err = Password::try_from_indices(&[-1], 9).unwrap_err();
        assert_eq!(
            err,
            PasswordError::OutOfRange {
                index: 0,
                id: -1,
                node_count: 9
            }
        );
        assert!(Password::try_from_indices(&[0, 9], 9).is_err());
        assert!(Password::try_from_indices(&[8], 9).is_ok());
    }

    #[test]
    fn equality_follows_order() {
        let a = Password::new([0, 4, 8]);
        let b = Password::try_from_indices(&[0, 4, 8], 9).unwrap();
        let c = Password::new([8, 4, 0]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn ensure_fits_checks_grid() {
        let p = Password::new([0, 15]);
        assert!(p.ensure_fits(16).is_ok());
        assert_eq!(
            p.ensure_fits(9),
            Err(PasswordError::OutOfRange {
                index: 1,
                id: 15,
                node_count: 9
            })
        );
    }
}
