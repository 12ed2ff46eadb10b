use crate::board::state::StateKey;

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub key: StateKey,
    pub score: i32,
    pub tick: u64,
}

const DEFAULT_WAYS: usize = 4;
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Default, Clone, Copy)]
struct Bucket {
    slots: [Option<Entry>; DEFAULT_WAYS],
}

/// Bounded memo of leaf evaluations keyed by the full position.
///
/// The zobrist hash only picks a bucket; a hit requires the packed
/// `StateKey` to match exactly, so collisions cannot leak wrong scores.
pub struct EvalCache {
    buckets: Vec<Bucket>,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl Default for EvalCache {
    fn default() -> Self { Self::with_capacity(DEFAULT_CAPACITY) }
}

impl EvalCache {
    pub fn with_capacity(entries: usize) -> Self {
        let mut c = Self { buckets: Vec::new(), tick: 0, hits: 0, misses: 0 };
        c.set_capacity_entries(entries);
        c
    }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        let entries = cap.max(DEFAULT_WAYS);
        let buckets = (entries + DEFAULT_WAYS - 1) / DEFAULT_WAYS;
        self.buckets.clear();
        self.buckets.resize_with(buckets, Bucket::default);
    }

    pub fn capacity(&self) -> usize { self.buckets.len() * DEFAULT_WAYS }

    pub fn clear(&mut self) {
        for b in &mut self.buckets { *b = Bucket::default(); }
        self.hits = 0;
        self.misses = 0;
    }

    fn bucket_index(&self, hash: u64) -> usize {
        let mixed = hash ^ (hash >> 32);
        (mixed as usize) % self.buckets.len().max(1)
    }

    pub fn get(&mut self, hash: u64, key: &StateKey) -> Option<i32> {
        let idx = self.bucket_index(hash);
        let found = self.buckets[idx].slots.iter().flatten().find(|e| e.key == *key).map(|e| e.score);
        if found.is_some() { self.hits += 1; } else { self.misses += 1; }
        found
    }

    pub fn put(&mut self, hash: u64, key: StateKey, score: i32) {
        self.tick += 1;
        let e = Entry { key, score, tick: self.tick };
        let idx = self.bucket_index(hash);
        let g = &mut self.buckets[idx];
        for slot in &mut g.slots {
            if let Some(cur) = slot { if cur.key == key { *slot = Some(e); return; } }
        }
        for slot in &mut g.slots { if slot.is_none() { *slot = Some(e); return; } }
        // Full bucket: evict the least recently written entry
        let mut victim = 0usize;
        let mut oldest = u64::MAX;
        for (i, slot) in g.slots.iter().enumerate() {
            if let Some(cur) = slot {
                if cur.tick < oldest { oldest = cur.tick; victim = i; }
            }
        }
        g.slots[victim] = Some(e);
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.slots.iter().filter(|s| s.is_some()).count()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn hits(&self) -> u64 { self.hits }
    pub fn misses(&self) -> u64 { self.misses }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(i: u64) -> StateKey { StateKey([i, 0, 0]) }

    #[test]
    fn capacity_enforced() {
        let mut c = EvalCache::with_capacity(8);
        for i in 0..64u64 { c.put(i, key(i), i as i32); }
        assert!(c.len() <= 8, "cache size {} exceeds capacity", c.len());
    }

    #[test]
    fn hash_collision_does_not_return_foreign_score() {
        let mut c = EvalCache::with_capacity(4);
        c.put(7, key(1), 3);
        assert_eq!(c.get(7, &key(2)), None);
        assert_eq!(c.get(7, &key(1)), Some(3));
        assert_eq!((c.hits(), c.misses()), (1, 1));
    }

    #[test]
    fn oldest_entry_evicted_first() {
        let mut c = EvalCache::with_capacity(4);
        for i in 0..4u64 { c.put(0, key(i), i as i32); }
        c.put(0, key(9), 9);
        assert_eq!(c.get(0, &key(0)), None);
        assert_eq!(c.get(0, &key(1)), Some(1));
        assert_eq!(c.get(0, &key(9)), Some(9));
    }
}
