//! Validator set bookkeeping and quorum arithmetic.
//!
//! A height is governed by a fixed, ordered set of validator addresses. The
//! set's order feeds proposer selection, so it must be identical on every
//! honest node; membership and size feed the quorum rules.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of matching messages that forms a quorum while tolerating
/// `faults` byzantine validators.
pub const fn required_quorum(faults: usize) -> usize {
    2 * faults + 1
}

/// Largest number of byzantine validators a set of `n` can tolerate.
pub const fn fault_tolerance(n: usize) -> usize {
    n.saturating_sub(1) / 3
}

/// Errors raised when constructing a [`ValidatorSet`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidatorSetError {
    /// A height must have at least one validator.
    #[error("validator set cannot be empty")]
    Empty,
    /// Each address may appear at most once.
    #[error("duplicate validator address {0}")]
    Duplicate(Address),
}

/// The ordered validator set for one chain height.
///
/// Construction and deserialization both go through [`ValidatorSet::new`],
/// so an instance is never empty and never holds a duplicate address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Address>", try_from = "Vec<Address>")]
pub struct ValidatorSet {
    ordered: Vec<Address>,
}

impl ValidatorSet {
    /// Build a set from an ordered address list.
    ///
    /// The given order is preserved, it is what proposer selection indexes
    /// into. Empty lists and duplicate addresses are rejected.
    pub fn new(ordered: Vec<Address>) -> Result<Self, ValidatorSetError> {
        if ordered.is_empty() {
            return Err(ValidatorSetError::Empty);
        }
        for (i, address) in ordered.iter().enumerate() {
            if ordered[..i].contains(address) {
                return Err(ValidatorSetError::Duplicate(*address));
            }
        }
        Ok(Self { ordered })
    }

    /// Whether `address` belongs to this set.
    pub fn is_validator(&self, address: &Address) -> bool {
        self.ordered.contains(address)
    }

    /// Validator at `index` in set order.
    pub fn get(&self, index: usize) -> Option<Address> {
        self.ordered.get(index).copied()
    }

    /// All validators in set order.
    pub fn addresses(&self) -> &[Address] {
        &self.ordered
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the set is empty. Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Byzantine validators this set can tolerate.
    pub fn fault_tolerance(&self) -> usize {
        fault_tolerance(self.len())
    }

    /// Quorum size for this set, `2f + 1`.
    pub fn quorum_size(&self) -> usize {
        required_quorum(self.fault_tolerance())
    }
}

impl TryFrom<Vec<Address>> for ValidatorSet {
    type Error = ValidatorSetError;

    fn try_from(ordered: Vec<Address>) -> Result<Self, Self::Error> {
        Self::new(ordered)
    }
}

impl From<ValidatorSet> for Vec<Address> {
    fn from(set: ValidatorSet) -> Self {
        set.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses(n: u8) -> Vec<Address> {
        (1..=n).map(Address::repeat_byte).collect()
    }

    #[test]
    fn test_rejects_empty_set() {
        assert_eq!(ValidatorSet::new(Vec::new()), Err(ValidatorSetError::Empty));
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut list = addresses(3);
        list.push(Address::repeat_byte(2));
        assert_eq!(
            ValidatorSet::new(list),
            Err(ValidatorSetError::Duplicate(Address::repeat_byte(2)))
        );
    }

    #[test]
    fn test_membership_and_order() {
        let set = ValidatorSet::new(addresses(3)).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.is_validator(&Address::repeat_byte(2)));
        assert!(!set.is_validator(&Address::repeat_byte(9)));
        assert_eq!(set.get(0), Some(Address::repeat_byte(1)));
        assert_eq!(set.get(3), None);
        assert_eq!(set.addresses(), addresses(3));
    }

    #[test]
    fn test_quorum_arithmetic() {
        // n = 3f + 1 tiers
        for (n, f, quorum) in [(1, 0, 1), (4, 1, 3), (7, 2, 5), (10, 3, 7)] {
            let set = ValidatorSet::new(addresses(n)).unwrap();
            assert_eq!(set.fault_tolerance(), f, "n = {n}");
            assert_eq!(set.quorum_size(), quorum, "n = {n}");
        }
        // between tiers the tolerance does not grow
        let set = ValidatorSet::new(addresses(6)).unwrap();
        assert_eq!(set.fault_tolerance(), 1);
        assert_eq!(set.quorum_size(), 3);
    }

    #[test]
    fn test_free_helpers_match_methods() {
        assert_eq!(required_quorum(0), 1);
        assert_eq!(required_quorum(2), 5);
        assert_eq!(fault_tolerance(0), 0);
        assert_eq!(fault_tolerance(4), 1);
    }

    #[test]
    fn test_deserialization_enforces_set_invariants() {
        let valid = serde_json::to_string(&addresses(3)).unwrap();
        let set: ValidatorSet = serde_json::from_str(&valid).unwrap();
        assert_eq!(set.addresses(), addresses(3));
        assert_eq!(serde_json::to_string(&set).unwrap(), valid);

        assert!(serde_json::from_str::<ValidatorSet>("[]").is_err());

        let duplicated =
            serde_json::to_string(&vec![Address::repeat_byte(2); 2]).unwrap();
        assert!(serde_json::from_str::<ValidatorSet>(&duplicated).is_err());
    }
}
