//! Block-decomposed double-ended sequence.
//!
//! The sequence is a doubly linked list of chunks, each chunk a doubly
//! linked run of elements, both living in arenas. Chunk sizes are nudged
//! toward `sqrt(len) + 1` by three triggers that run after every edit:
//!
//! - compress: an interior chunk below half the target merges with its
//!   smaller neighbor. End chunks are exempt so they can stay small for
//!   the push_front/push_back fill pattern without oscillating.
//! - expand: a chunk above 1.75x the target splits at its midpoint.
//! - reconstruct: once the target remembered at the last reconstruction
//!   drifts outside [0.5x, 1.75x] of the current one, every chunk is
//!   concatenated and re-cut at exactly the current target.
//!
//! With target ~ sqrt(n) this makes indexed access, insert, and erase
//! O(sqrt n) amortized while push/pop at the ends stay O(1) amortized.
//! Reconstruction costs O(n) but the band guarantees O(sqrt n) operations
//! pass between reconstructions, so the amortized per-op bill stays
//! O(sqrt n); `profiling` counts the work so tests can check the bound.

use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::arena::{Arena, Idx, NULL};
use crate::chunk::{Chunk, Node};
use crate::error::{Error, Result};
use crate::profiling;

/// A chunk splits when it grows past `SPLIT_FACTOR x target`.
pub const SPLIT_FACTOR: f64 = 1.75;

/// An interior chunk merges when it shrinks below `MERGE_FACTOR x target`.
/// The pair must keep `SPLIT_FACTOR / 2 > MERGE_FACTOR >= 0.5`: a freshly
/// merged chunk then sits under the split threshold, and a merge never
/// cascades.
pub const MERGE_FACTOR: f64 = 0.5;

/// Source of container identities, so cursors can be matched to the
/// container that issued them.
static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// A double-ended sequence of chunks with O(sqrt n) random edits.
pub struct BlockDeque<T> {
    /// Element nodes, linked within chunks.
    pub(crate) nodes: Arena<Node<T>>,
    /// Chunk headers, linked into the outer list.
    pub(crate) chunks: Arena<Chunk>,
    /// First chunk, NULL when empty.
    pub(crate) first: Idx,
    /// Last chunk, NULL when empty.
    pub(crate) last: Idx,
    /// Total element count.
    pub(crate) len: usize,
    /// Target chunk size at the last reconstruction.
    pub(crate) last_target: usize,
    /// Identity checked against cursors.
    pub(crate) id: u64,
}

impl<T> BlockDeque<T> {
    pub fn new() -> BlockDeque<T> {
        return BlockDeque {
            nodes: Arena::new(),
            chunks: Arena::new(),
            first: NULL,
            last: NULL,
            len: 0,
            last_target: 1,
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        return self.len;
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// The chunk size the rebalancing policy steers toward. The `+ 1`
    /// keeps the target nonzero on an empty sequence.
    #[inline]
    pub(crate) fn target_chunk_len(&self) -> usize {
        return self.len.isqrt() + 1;
    }

    /// Drop all elements and chunks.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.chunks.clear();
        self.first = NULL;
        self.last = NULL;
        self.len = 0;
        self.last_target = 1;
    }

    // --- element access ---

    pub fn front(&self) -> Result<&T> {
        if self.len == 0 {
            return Err(Error::ContainerIsEmpty);
        }
        return Ok(&self.nodes[self.chunks[self.first].head].value);
    }

    pub fn back(&self) -> Result<&T> {
        if self.len == 0 {
            return Err(Error::ContainerIsEmpty);
        }
        return Ok(&self.nodes[self.chunks[self.last].tail].value);
    }

    pub fn front_mut(&mut self) -> Result<&mut T> {
        if self.len == 0 {
            return Err(Error::ContainerIsEmpty);
        }
        let head = self.chunks[self.first].head;
        return Ok(&mut self.nodes[head].value);
    }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        if self.len == 0 {
            return Err(Error::ContainerIsEmpty);
        }
        let tail = self.chunks[self.last].tail;
        return Ok(&mut self.nodes[tail].value);
    }

    /// Element at global index `i`. O(sqrt n) amortized: a chunk-size scan
    /// from the nearer end, then a walk inside one chunk.
    pub fn at(&self, i: usize) -> Result<&T> {
        if i >= self.len {
            return Err(Error::OutOfBounds);
        }
        let (_, node) = self.locate(i);
        return Ok(&self.nodes[node].value);
    }

    pub fn at_mut(&mut self, i: usize) -> Result<&mut T> {
        if i >= self.len {
            return Err(Error::OutOfBounds);
        }
        let (_, node) = self.locate(i);
        return Ok(&mut self.nodes[node].value);
    }

    /// Chunk and node holding global index `i`, scanning chunk sizes from
    /// whichever end is closer. Caller guarantees `i < len`.
    pub(crate) fn locate(&self, i: usize) -> (Idx, Idx) {
        debug_assert!(i < self.len);
        if i <= self.len / 2 {
            let mut chunk = self.first;
            let mut before = 0;
            loop {
                let clen = self.chunks[chunk].len;
                if i < before + clen {
                    let node = self.chunks[chunk].node_at(&self.nodes, i - before);
                    return (chunk, node);
                }
                before += clen;
                chunk = self.chunks[chunk].next;
            }
        }
        let mut chunk = self.last;
        let mut after = self.len;
        loop {
            after -= self.chunks[chunk].len;
            if i >= after {
                let node = self.chunks[chunk].node_at(&self.nodes, i - after);
                return (chunk, node);
            }
            chunk = self.chunks[chunk].prev;
        }
    }

    // --- push / pop at the ends ---

    /// Append an element. O(1) amortized.
    pub fn push_back(&mut self, value: T) {
        let target = self.target_chunk_len();
        let chunk = if self.last == NULL || self.chunks[self.last].len > target {
            self.alloc_chunk_back()
        } else {
            self.last
        };
        self.chunks[chunk].push_back(&mut self.nodes, value);
        self.len += 1;
        self.maybe_reconstruct();
    }

    /// Prepend an element. O(1) amortized.
    pub fn push_front(&mut self, value: T) {
        let target = self.target_chunk_len();
        let chunk = if self.first == NULL || self.chunks[self.first].len > target {
            self.alloc_chunk_front()
        } else {
            self.first
        };
        self.chunks[chunk].push_front(&mut self.nodes, value);
        self.len += 1;
        self.maybe_reconstruct();
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(Error::ContainerIsEmpty);
        }
        let chunk = self.last;
        let value = self.chunks[chunk].pop_back(&mut self.nodes);
        if self.chunks[chunk].is_empty() {
            self.detach_chunk(chunk);
        }
        self.len -= 1;
        self.maybe_reconstruct();
        return Ok(value);
    }

    /// Remove and return the first element.
    pub fn pop_front(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(Error::ContainerIsEmpty);
        }
        let chunk = self.first;
        let value = self.chunks[chunk].pop_front(&mut self.nodes);
        if self.chunks[chunk].is_empty() {
            self.detach_chunk(chunk);
        }
        self.len -= 1;
        self.maybe_reconstruct();
        return Ok(value);
    }

    // --- outer chunk list maintenance ---

    fn alloc_chunk_back(&mut self) -> Idx {
        let chunk = self.chunks.alloc(Chunk::new());
        self.chunks[chunk].prev = self.last;
        if self.last != NULL {
            self.chunks[self.last].next = chunk;
        } else {
            self.first = chunk;
        }
        self.last = chunk;
        return chunk;
    }

    fn alloc_chunk_front(&mut self) -> Idx {
        let chunk = self.chunks.alloc(Chunk::new());
        self.chunks[chunk].next = self.first;
        if self.first != NULL {
            self.chunks[self.first].prev = chunk;
        } else {
            self.last = chunk;
        }
        self.first = chunk;
        return chunk;
    }

    fn link_chunk_after(&mut self, chunk: Idx, after: Idx) {
        let next = self.chunks[after].next;
        self.chunks[chunk].prev = after;
        self.chunks[chunk].next = next;
        self.chunks[after].next = chunk;
        if next != NULL {
            self.chunks[next].prev = chunk;
        } else {
            self.last = chunk;
        }
    }

    /// Unlink a chunk from the outer list and release its header slot.
    /// The returned header still owns its node chain.
    fn detach_chunk(&mut self, chunk: Idx) -> Chunk {
        let mut header = self.chunks.free(chunk);
        if header.prev != NULL {
            self.chunks[header.prev].next = header.next;
        } else {
            self.first = header.next;
        }
        if header.next != NULL {
            self.chunks[header.next].prev = header.prev;
        } else {
            self.last = header.prev;
        }
        header.prev = NULL;
        header.next = NULL;
        return header;
    }

    // --- rebalancing policy ---

    /// Run compress then expand on the touched chunk, then the global
    /// reconstruction check. The touched chunk must be live and non-empty.
    pub(crate) fn rebalance(&mut self, touched: Idx) {
        let target = self.target_chunk_len();
        let mut chunk = touched;

        // Compress. End chunks are exempt, so both neighbors exist here.
        let len = self.chunks[chunk].len;
        if chunk != self.first && chunk != self.last && (len as f64) < MERGE_FACTOR * target as f64
        {
            let prev = self.chunks[chunk].prev;
            let next = self.chunks[chunk].next;
            if self.chunks[prev].len < self.chunks[next].len {
                let right = self.detach_chunk(chunk);
                self.chunks[prev].merge(&mut self.nodes, right);
                chunk = prev;
            } else {
                let right = self.detach_chunk(next);
                self.chunks[chunk].merge(&mut self.nodes, right);
            }
            profiling::merge();
            profiling::relink(1);
        }

        // Expand, on the possibly-merged chunk.
        let len = self.chunks[chunk].len;
        if (len as f64) > SPLIT_FACTOR * target as f64 {
            let mid = (len + 1) / 2;
            let at = self.chunks[chunk].node_at(&self.nodes, mid);
            let right = self.chunks[chunk].split_before(&mut self.nodes, at, mid);
            let right_idx = self.chunks.alloc(right);
            self.link_chunk_after(right_idx, chunk);
            profiling::split();
            profiling::relink(mid as u64);
        }

        self.maybe_reconstruct();
    }

    /// Rebuild the decomposition once the remembered target has drifted
    /// outside the band around the current one.
    pub(crate) fn maybe_reconstruct(&mut self) {
        let target = self.target_chunk_len();
        let last = self.last_target as f64;
        if last >= MERGE_FACTOR * target as f64 && last <= SPLIT_FACTOR * target as f64 {
            return;
        }
        self.reconstruct(target);
    }

    /// Concatenate every chunk, then re-cut the chain into chunks of
    /// exactly `target` elements (the last one keeps the remainder).
    fn reconstruct(&mut self, target: usize) {
        profiling::reconstruct();
        self.last_target = target;
        if self.first == NULL {
            return;
        }

        let mut rest: SmallVec<[Idx; 32]> = SmallVec::new();
        let mut chunk = self.chunks[self.first].next;
        while chunk != NULL {
            rest.push(chunk);
            chunk = self.chunks[chunk].next;
        }
        for idx in rest {
            let right = self.chunks.free(idx);
            self.chunks[self.first].merge(&mut self.nodes, right);
            profiling::merge();
        }
        self.chunks[self.first].next = NULL;
        self.last = self.first;
        profiling::relink(self.len as u64);

        let mut current = self.first;
        while self.chunks[current].len > target {
            let at = self.chunks[current].node_at(&self.nodes, target);
            let right = self.chunks[current].split_before(&mut self.nodes, at, target);
            let right_idx = self.chunks.alloc(right);
            self.link_chunk_after(right_idx, current);
            profiling::split();
            current = right_idx;
        }
    }

    /// Remove the element's chunk if the edit emptied it, otherwise run
    /// the rebalancing triggers on it.
    pub(crate) fn settle_after_remove(&mut self, chunk: Idx) {
        if self.chunks[chunk].is_empty() {
            self.detach_chunk(chunk);
            self.maybe_reconstruct();
        } else {
            self.rebalance(chunk);
        }
    }

    /// Number of chunks currently in the outer list.
    pub fn chunk_count(&self) -> usize {
        return self.chunks.len();
    }

    // --- iteration ---

    pub fn iter(&self) -> Iter<'_, T> {
        let (front_chunk, front_node, back_chunk, back_node) = if self.len == 0 {
            (NULL, NULL, NULL, NULL)
        } else {
            (
                self.first,
                self.chunks[self.first].head,
                self.last,
                self.chunks[self.last].tail,
            )
        };
        return Iter {
            deque: self,
            front_chunk,
            front_node,
            back_chunk,
            back_node,
            remaining: self.len,
        };
    }
}

impl<T> Default for BlockDeque<T> {
    fn default() -> Self {
        return Self::new();
    }
}

impl<T: Clone> Clone for BlockDeque<T> {
    /// Deep copy with a fresh container identity; cursors into the source
    /// do not resolve against the clone.
    fn clone(&self) -> Self {
        let mut out = BlockDeque::new();
        out.extend(self.iter().cloned());
        return out;
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for BlockDeque<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}

impl<T: PartialEq> PartialEq for BlockDeque<T> {
    fn eq(&self, other: &Self) -> bool {
        return self.len == other.len && self.iter().eq(other.iter());
    }
}

impl<T: Eq> Eq for BlockDeque<T> {}

impl<T> std::ops::Index<usize> for BlockDeque<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match self.at(i) {
            Ok(value) => value,
            Err(_) => panic!("index {} out of bounds (len {})", i, self.len),
        }
    }
}

impl<T> std::ops::IndexMut<usize> for BlockDeque<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        let len = self.len;
        match self.at_mut(i) {
            Ok(value) => value,
            Err(_) => panic!("index {} out of bounds (len {})", i, len),
        }
    }
}

impl<T> Extend<T> for BlockDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for BlockDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = BlockDeque::new();
        out.extend(iter);
        return out;
    }
}

/// Borrowed iterator over the elements in sequence order.
pub struct Iter<'a, T> {
    deque: &'a BlockDeque<T>,
    front_chunk: Idx,
    front_node: Idx,
    back_chunk: Idx,
    back_node: Idx,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let node = self.front_node;
        let next = self.deque.nodes[node].next;
        if next != NULL {
            self.front_node = next;
        } else {
            self.front_chunk = self.deque.chunks[self.front_chunk].next;
            self.front_node = if self.front_chunk != NULL {
                self.deque.chunks[self.front_chunk].head
            } else {
                NULL
            };
        }
        return Some(&self.deque.nodes[node].value);
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.remaining, Some(self.remaining));
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let node = self.back_node;
        let prev = self.deque.nodes[node].prev;
        if prev != NULL {
            self.back_node = prev;
        } else {
            self.back_chunk = self.deque.chunks[self.back_chunk].prev;
            self.back_node = if self.back_chunk != NULL {
                self.deque.chunks[self.back_chunk].tail
            } else {
                NULL
            };
        }
        return Some(&self.deque.nodes[node].value);
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> std::iter::FusedIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a BlockDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        return self.iter();
    }
}

/// Consuming iterator; drains from the front.
pub struct IntoIter<T> {
    deque: BlockDeque<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        return self.deque.pop_front().ok();
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.deque.len, Some(self.deque.len));
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        return self.deque.pop_back().ok();
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> std::iter::FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for BlockDeque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        return IntoIter { deque: self };
    }
}
