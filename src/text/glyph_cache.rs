//! Hash-chained, fixed-capacity LRU glyph cache over a square atlas of
//! `slot_size`-pixel tiles.
//!
//! Mirrors `original_source/biv/src/glyph_cache.h`: entry 0 is a sentinel
//! anchoring the LRU ring, free entries are linked through the same field
//! used for hash-chain links (`hash_chain_next` doubles as the freelist
//! `next` pointer), and eviction picks the current LRU tail
//! (`entries[0].lru_prev`), unlinking it from its hash chain before reuse.

use glam::IVec2;
use tracing::trace;

pub const NIL: u32 = u32::MAX;

/// One resident (or free) glyph-cache entry. Index 0 in the backing `Vec`
/// is reserved as the LRU sentinel and is never addressed by a real glyph.
#[derive(Debug, Clone, Copy)]
struct GlyphEntry {
    glyph_id: u32,
    tile_x: u32,
    tile_y: u32,
    uploaded: bool,
    bitmap_top_left: IVec2,
    bitmap_size: IVec2,
    lru_prev: u32,
    lru_next: u32,
    /// Hash-chain link when resident; freelist link when unallocated.
    hash_chain_next: u32,
}

impl GlyphEntry {
    const EMPTY: GlyphEntry = GlyphEntry {
        glyph_id: 0,
        tile_x: 0,
        tile_y: 0,
        uploaded: false,
        bitmap_top_left: IVec2::ZERO,
        bitmap_size: IVec2::ZERO,
        lru_prev: NIL,
        lru_next: NIL,
        hash_chain_next: NIL,
    };
}

/// Result of [`GlyphCache::request`]: resident geometry for a glyph that
/// is uploaded and ready to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidentGlyph {
    pub tile_x: u32,
    pub tile_y: u32,
    pub bitmap_top_left: IVec2,
    pub bitmap_size: IVec2,
}

/// One glyph awaiting rasterization and GPU upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingUpload {
    pub glyph_id: u32,
    pub tile_x: u32,
    pub tile_y: u32,
}

pub struct GlyphCache {
    entries: Vec<GlyphEntry>,
    hash_table: Vec<u32>,
    hash_mask: u32,
    free_head: u32,
    entry_capacity: u32,
    grid_x: u32,
    slot_size: u32,
    touched_this_frame: Vec<bool>,
    queued: Vec<bool>,
    to_upload: Vec<u32>,
}

impl GlyphCache {
    pub fn new(entry_capacity: u32, slot_size: u32) -> Self {
        assert!(entry_capacity > 0, "glyph cache needs at least one entry");
        let hash_count = entry_capacity.next_power_of_two();
        let grid_x = (entry_capacity as f64).sqrt().ceil() as u32;

        let mut entries = Vec::with_capacity(entry_capacity as usize + 1);
        entries.push(GlyphEntry::EMPTY); // sentinel
        for i in 1..=entry_capacity {
            entries.push(GlyphEntry {
                hash_chain_next: if i == entry_capacity { NIL } else { i + 1 },
                ..GlyphEntry::EMPTY
            });
        }

        let mut cache = Self {
            entries,
            hash_table: vec![NIL; hash_count as usize],
            hash_mask: hash_count - 1,
            free_head: if entry_capacity == 0 { NIL } else { 1 },
            entry_capacity,
            grid_x,
            slot_size,
            touched_this_frame: vec![false; entry_capacity as usize + 1],
            queued: vec![false; entry_capacity as usize + 1],
            to_upload: Vec::new(),
        };
        // Sentinel starts as an empty ring pointing to itself.
        cache.entries[0].lru_prev = 0;
        cache.entries[0].lru_next = 0;
        cache
    }

    pub fn entry_capacity(&self) -> u32 {
        self.entry_capacity
    }

    pub fn slot_size(&self) -> u32 {
        self.slot_size
    }

    /// Tiles per row/column of the (square) atlas grid.
    pub fn atlas_grid_size(&self) -> u32 {
        self.grid_x
    }

    /// Atlas resolution in pixels, along either axis.
    pub fn atlas_resolution(&self) -> u32 {
        self.grid_x * self.slot_size
    }

    /// Clears the per-frame "touched" bookkeeping. Call once per
    /// `new_frame`; does not evict or otherwise disturb resident entries.
    pub fn begin_frame(&mut self) {
        self.touched_this_frame.iter_mut().for_each(|t| *t = false);
    }

    fn hash_slot(&self, glyph_id: u32) -> usize {
        (glyph_id & self.hash_mask) as usize
    }

    fn find(&self, glyph_id: u32) -> Option<u32> {
        let mut idx = self.hash_table[self.hash_slot(glyph_id)];
        while idx != NIL {
            if self.entries[idx as usize].glyph_id == glyph_id {
                return Some(idx);
            }
            idx = self.entries[idx as usize].hash_chain_next;
        }
        None
    }

    fn unlink_lru(&mut self, index: u32) {
        let (prev, next) = (self.entries[index as usize].lru_prev, self.entries[index as usize].lru_next);
        self.entries[prev as usize].lru_next = next;
        self.entries[next as usize].lru_prev = prev;
    }

    /// Inserts `index` immediately after the sentinel (most-recently-used end).
    fn insert_mru(&mut self, index: u32) {
        let old_mru = self.entries[0].lru_next;
        self.entries[0].lru_next = index;
        self.entries[index as usize].lru_prev = 0;
        self.entries[index as usize].lru_next = old_mru;
        self.entries[old_mru as usize].lru_prev = index;
    }

    fn unlink_hash_chain(&mut self, glyph_id: u32, index: u32) {
        let slot = self.hash_slot(glyph_id);
        let mut cursor = self.hash_table[slot];
        if cursor == index {
            self.hash_table[slot] = self.entries[index as usize].hash_chain_next;
            return;
        }
        while cursor != NIL {
            let next = self.entries[cursor as usize].hash_chain_next;
            if next == index {
                self.entries[cursor as usize].hash_chain_next = self.entries[index as usize].hash_chain_next;
                return;
            }
            cursor = next;
        }
        unreachable!("glyph cache: entry not found in its own hash chain");
    }

    fn insert_hash_chain(&mut self, glyph_id: u32, index: u32) {
        let slot = self.hash_slot(glyph_id);
        self.entries[index as usize].hash_chain_next = self.hash_table[slot];
        self.hash_table[slot] = index;
    }

    fn tile_xy(&self, index: u32) -> (u32, u32) {
        let slot = index - 1;
        (slot % self.grid_x, slot / self.grid_x)
    }

    /// Finds the least-recently-used entry that was not touched this
    /// frame, walking the ring from the LRU tail. Returns `None` if every
    /// resident entry has already been touched (full saturation, per
    /// spec's "none may be evicted" deferral case).
    fn find_evictable(&self) -> Option<u32> {
        let mut candidate = self.entries[0].lru_prev;
        let mut steps = 0;
        while candidate != 0 && steps < self.entry_capacity {
            if !self.touched_this_frame[candidate as usize] {
                return Some(candidate);
            }
            candidate = self.entries[candidate as usize].lru_prev;
            steps += 1;
        }
        None
    }

    /// Looks up or creates a resident slot for `glyph_id`. Returns `None`
    /// only when the cache is fully saturated with glyphs already touched
    /// this frame (rasterization is deferred one frame per spec §4.2).
    pub fn get_or_create(&mut self, glyph_id: u32) -> Option<u32> {
        if let Some(index) = self.find(glyph_id) {
            self.unlink_lru(index);
            self.insert_mru(index);
            self.touched_this_frame[index as usize] = true;
            if !self.entries[index as usize].uploaded {
                self.enqueue_upload(index);
            }
            return Some(index);
        }

        let index = if self.free_head != NIL {
            let index = self.free_head;
            self.free_head = self.entries[index as usize].hash_chain_next;
            index
        } else {
            let victim = self.find_evictable()?;
            self.unlink_lru(victim);
            self.unlink_hash_chain(self.entries[victim as usize].glyph_id, victim);
            trace!(glyph_id = self.entries[victim as usize].glyph_id, "evicting glyph cache entry");
            victim
        };

        let (tile_x, tile_y) = self.tile_xy(index);
        self.entries[index as usize] = GlyphEntry {
            glyph_id,
            tile_x,
            tile_y,
            uploaded: false,
            bitmap_top_left: IVec2::ZERO,
            bitmap_size: IVec2::ZERO,
            lru_prev: NIL,
            lru_next: NIL,
            hash_chain_next: NIL,
        };
        self.insert_mru(index);
        self.insert_hash_chain(glyph_id, index);
        self.touched_this_frame[index as usize] = true;
        self.enqueue_upload(index);
        Some(index)
    }

    fn enqueue_upload(&mut self, index: u32) {
        if !self.queued[index as usize] {
            self.queued[index as usize] = true;
            self.to_upload.push(index);
        }
    }

    /// `Some` iff the glyph is resident and its bitmap has been uploaded.
    /// Queues a miss for upload and returns `None` otherwise.
    pub fn request(&mut self, glyph_id: u32) -> Option<ResidentGlyph> {
        let index = self.get_or_create(glyph_id)?;
        let entry = &self.entries[index as usize];
        if entry.uploaded {
            Some(ResidentGlyph {
                tile_x: entry.tile_x,
                tile_y: entry.tile_y,
                bitmap_top_left: entry.bitmap_top_left,
                bitmap_size: entry.bitmap_size,
            })
        } else {
            None
        }
    }

    /// Drains the set of entries awaiting rasterization, for the backend
    /// to process once per frame (spec §4.2 upload pipeline step 1).
    pub fn drain_pending_uploads(&mut self) -> Vec<PendingUpload> {
        let pending = self
            .to_upload
            .drain(..)
            .map(|index| PendingUpload {
                glyph_id: self.entries[index as usize].glyph_id,
                tile_x: self.entries[index as usize].tile_x,
                tile_y: self.entries[index as usize].tile_y,
            })
            .collect();
        self.queued.iter_mut().for_each(|q| *q = false);
        pending
    }

    /// Marks a glyph uploaded with its rasterized metrics. Zero-area
    /// bitmaps still reserve their slot (spec §4.2 step 2).
    pub fn mark_uploaded(&mut self, glyph_id: u32, bitmap_top_left: IVec2, bitmap_size: IVec2) {
        if let Some(index) = self.find(glyph_id) {
            let entry = &mut self.entries[index as usize];
            entry.uploaded = true;
            entry.bitmap_top_left = bitmap_top_left;
            entry.bitmap_size = bitmap_size;
        }
    }

    /// Test/debug hook: verifies the LRU ring and hash chains are
    /// internally consistent (spec §8 invariants 5 and 6).
    #[cfg(test)]
    fn assert_invariants(&self) {
        // LRU ring: every live entry's neighbors point back to it.
        let mut visited = vec![false; self.entries.len()];
        let mut cursor = self.entries[0].lru_next;
        let mut count = 0;
        while cursor != 0 {
            assert!(!visited[cursor as usize], "LRU ring cycle detected");
            visited[cursor as usize] = true;
            let next = self.entries[cursor as usize].lru_next;
            assert_eq!(self.entries[next as usize].lru_prev, cursor);
            cursor = next;
            count += 1;
            assert!(count <= self.entry_capacity, "LRU ring longer than capacity");
        }

        // Hash chains: every live entry reachable exactly once from its
        // chain head.
        for index in 1..self.entries.len() as u32 {
            if !visited[index as usize] {
                continue;
            }
            let glyph_id = self.entries[index as usize].glyph_id;
            let mut reached = 0;
            let mut chain = self.hash_table[self.hash_slot(glyph_id)];
            while chain != NIL {
                if chain == index {
                    reached += 1;
                }
                chain = self.entries[chain as usize].hash_chain_next;
            }
            assert_eq!(reached, 1, "entry {index} not reached exactly once via its hash chain");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_all(cache: &mut GlyphCache) {
        for pending in cache.drain_pending_uploads() {
            cache.mark_uploaded(pending.glyph_id, IVec2::ZERO, IVec2::new(1, 1));
        }
    }

    #[test]
    fn miss_then_hit_after_upload() {
        let mut cache = GlyphCache::new(4, 16);
        assert!(cache.request(10).is_none());
        upload_all(&mut cache);
        let resident = cache.request(10).expect("resident after upload");
        assert_eq!(resident.bitmap_size, IVec2::new(1, 1));
        cache.assert_invariants();
    }

    #[test]
    fn lru_eviction_matches_scenario_s5() {
        // entry_capacity = 3; request A, B, C, A, D -> {A, C, D}, B evicted.
        let mut cache = GlyphCache::new(3, 16);
        for glyph in [b'A', b'B', b'C'] {
            cache.get_or_create(glyph as u32);
        }
        upload_all(&mut cache);
        cache.begin_frame();
        cache.get_or_create(b'A' as u32); // refresh A to MRU
        cache.begin_frame();
        cache.get_or_create(b'D' as u32); // forces an eviction
        cache.assert_invariants();

        assert!(cache.find(b'A' as u32).is_some());
        assert!(cache.find(b'B' as u32).is_none(), "B should have been evicted as LRU");
        assert!(cache.find(b'C' as u32).is_some());
        assert!(cache.find(b'D' as u32).is_some());
    }

    #[test]
    fn saturation_without_eviction_candidate_defers() {
        let mut cache = GlyphCache::new(2, 16);
        cache.get_or_create(1);
        cache.get_or_create(2);
        upload_all(&mut cache);
        cache.begin_frame();
        cache.get_or_create(1);
        cache.get_or_create(2);
        // Both entries are now touched this frame; a third distinct glyph
        // cannot be created without evicting something already in use.
        assert!(cache.get_or_create(3).is_none());
    }

    #[test]
    fn hash_chain_integrity_under_collisions() {
        let mut cache = GlyphCache::new(8, 16);
        // hash_count is the next power of two >= 8, so ids spaced by it collide.
        let hash_count = cache.hash_mask + 1;
        for i in 0..6 {
            cache.get_or_create(1 + i * hash_count);
        }
        cache.assert_invariants();
    }

    #[test]
    fn repeated_request_same_frame_is_idempotent() {
        let mut cache = GlyphCache::new(4, 16);
        let a = cache.get_or_create(42).unwrap();
        let b = cache.get_or_create(42).unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.drain_pending_uploads().len(), 1, "duplicate requests queue one upload");
    }

    mod eviction_logging {
        use super::*;
        use std::fmt;
        use std::sync::{Arc, Mutex};
        use tracing::dispatcher::Dispatch;
        use tracing::field::{Field, Visit};
        use tracing::Subscriber;
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
        use tracing_subscriber::registry::Registry;

        #[derive(Clone, Default)]
        struct Capture {
            events: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
        }

        #[derive(Default)]
        struct FieldCollector {
            fields: Vec<(String, String)>,
        }

        impl Visit for FieldCollector {
            fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                self.fields.push((field.name().to_string(), format!("{:?}", value)));
            }
        }

        impl<S: Subscriber> Layer<S> for Capture {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                let mut collector = FieldCollector::default();
                event.record(&mut collector);
                self.events.lock().unwrap().push((event.metadata().name().to_string(), collector.fields));
            }
        }

        #[test]
        fn eviction_emits_a_trace_event_naming_the_evicted_glyph() {
            let capture = Capture::default();
            let events = capture.events.clone();
            let dispatch = Dispatch::new(Registry::default().with(capture));

            tracing::dispatcher::with_default(&dispatch, || {
                let mut cache = GlyphCache::new(2, 16);
                cache.get_or_create(1);
                cache.get_or_create(2);
                upload_all(&mut cache);
                cache.begin_frame();
                cache.get_or_create(3); // evicts glyph 1
            });

            let events = events.lock().unwrap();
            let evicted = events.iter().find(|(_, fields)| fields.iter().any(|(k, v)| k == "glyph_id" && v == "1"));
            assert!(evicted.is_some(), "expected a trace event naming the evicted glyph_id");
        }
    }
}
