use std::collections::BTreeMap;

use chirpy_types::{ChirpId, UserId};

use crate::error::{StoreError, StoreResult};

/// An identifier that can be handed out in increasing order.
pub trait AllocatableId: Copy + Ord {
    const FIRST: Self;

    fn successor(self) -> Option<Self>;
}

impl AllocatableId for UserId {
    const FIRST: Self = UserId::FIRST;

    fn successor(self) -> Option<Self> {
        self.next()
    }
}

impl AllocatableId for ChirpId {
    const FIRST: Self = ChirpId::FIRST;

    fn successor(self) -> Option<Self> {
        self.next()
    }
}

/// The next identifier for `collection`: one past the largest key, or
/// [`AllocatableId::FIRST`] when empty.
///
/// Derived from the data rather than a counter, so numbering resumes
/// correctly after a reload. Gaps are possible; reuse is not.
pub fn next_id<K: AllocatableId, V>(collection: &BTreeMap<K, V>) -> StoreResult<K> {
    match collection.keys().next_back() {
        None => Ok(K::FIRST),
        Some(max) => max.successor().ok_or(StoreError::IdSpaceExhausted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chirp_id(raw: u64) -> ChirpId {
        ChirpId::new(raw).unwrap()
    }

    #[test]
    fn empty_collection_starts_at_one() {
        let map: BTreeMap<ChirpId, ()> = BTreeMap::new();
        assert_eq!(next_id(&map).unwrap(), ChirpId::FIRST);
    }

    #[test]
    fn continues_from_max_across_gaps() {
        let map: BTreeMap<ChirpId, ()> = [(chirp_id(1), ()), (chirp_id(7), ())].into();
        assert_eq!(next_id(&map).unwrap(), chirp_id(8));
    }

    #[test]
    fn exhausted_space_is_an_error() {
        let map: BTreeMap<UserId, ()> = [(UserId::new(u64::MAX).unwrap(), ())].into();
        assert!(matches!(next_id(&map), Err(StoreError::IdSpaceExhausted)));
    }

    proptest! {
        #[test]
        fn next_exceeds_every_existing_id(raw in proptest::collection::btree_set(1u64..1_000_000, 0..50)) {
            let map: BTreeMap<ChirpId, ()> = raw.iter().map(|r| (chirp_id(*r), ())).collect();
            let next = next_id(&map).unwrap();
            prop_assert!(map.keys().all(|k| *k < next));
        }
    }
}
