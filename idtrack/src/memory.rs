//! Short-term identity memory used for re-identification
//!
//! An identity that is not continued into the current frame is remembered at
//! its last known position. Until the entry expires it is replayed into every
//! processed frame as a [`Origin::Cached`](crate::detection::Origin::Cached)
//! detection, so it can be matched again by the next frame.

use crate::bbox::BoundingBox;
use crate::detection::{Detection, FrameIndex, Joint, PersonId};
use std::collections::{BTreeMap, HashSet};

/// Last known state of an absent identity
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub frame_index: FrameIndex,
    pub bbox: BoundingBox,
    pub joints: Vec<Joint>,
}

/// Identity cache keyed by person id.
///
/// Replay order is first-insertion order of the live entries; refreshing an
/// entry keeps its position. Greedy tie-breaking depends on that order.
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    entries: BTreeMap<PersonId, CacheEntry>,
    order: Vec<PersonId>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or refresh the entry for the detection's identity
    pub fn remember(&mut self, person_id: PersonId, detection: &Detection) {
        let entry = CacheEntry {
            frame_index: detection.frame_index,
            bbox: detection.bbox,
            joints: detection.joints().to_vec(),
        };
        if self.entries.insert(person_id, entry).is_none() {
            self.order.push(person_id);
        }
    }

    /// Drop entries last seen before `current - ttl` and entries whose
    /// identity was continued into the current frame
    pub fn prune(&mut self, current: FrameIndex, ttl: u32, continued: &HashSet<PersonId>) {
        let oldest = current.saturating_sub(ttl);
        self.entries.retain(|person_id, entry| {
            entry.frame_index >= oldest && !continued.contains(person_id)
        });
        let entries = &self.entries;
        self.order.retain(|person_id| entries.contains_key(person_id));
    }

    /// Cached detections to append to the current frame
    pub fn replay(&self) -> impl Iterator<Item = Detection> + '_ {
        self.order.iter().filter_map(|person_id| {
            self.entries.get(person_id).map(|entry| {
                Detection::cached(entry.frame_index, entry.bbox, entry.joints.clone(), *person_id)
            })
        })
    }

    pub fn get(&self, person_id: PersonId) -> Option<&CacheEntry> {
        self.entries.get(&person_id)
    }

    pub fn contains(&self, person_id: PersonId) -> bool {
        self.entries.contains_key(&person_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seen(frame: FrameIndex) -> Detection {
        Detection::new(frame, BoundingBox::new(1.0, 1.0, 5.0, 5.0))
    }

    #[test]
    fn test_remember_refreshes_entry() {
        let mut cache = IdentityCache::new();
        cache.remember(3, &seen(4));
        cache.remember(3, &seen(6));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(3).unwrap().frame_index, 6);
    }

    #[test]
    fn test_prune_keeps_entries_within_ttl() {
        let mut cache = IdentityCache::new();
        cache.remember(1, &seen(5));
        cache.remember(2, &seen(4));

        cache.prune(15, 10, &HashSet::new());
        assert!(cache.contains(1));
        assert!(!cache.contains(2));
    }

    #[test]
    fn test_prune_drops_continued_identities() {
        let mut cache = IdentityCache::new();
        cache.remember(1, &seen(5));
        cache.remember(2, &seen(5));

        cache.prune(6, 10, &HashSet::from([2]));
        assert!(cache.contains(1));
        assert!(!cache.contains(2));
    }

    #[test]
    fn test_prune_early_frames_do_not_underflow() {
        let mut cache = IdentityCache::new();
        cache.remember(1, &seen(1));
        cache.prune(3, 10, &HashSet::new());
        assert!(cache.contains(1));
    }

    #[test]
    fn test_replay_keeps_first_insertion_order() {
        let mut cache = IdentityCache::new();
        cache.remember(9, &seen(2));
        cache.remember(4, &seen(3));

        cache.remember(9, &seen(5));

        let replayed: Vec<_> = cache.replay().collect();
        assert_eq!(replayed.len(), 2);
        assert_eq!(replayed[0].person_id, Some(9));
        assert_eq!(replayed[0].frame_index, 5);
        assert_eq!(replayed[1].person_id, Some(4));
        assert!(replayed.iter().all(Detection::is_cached));
    }
}
