//! Cursors: positions into a [`BlockDeque`] with random-access arithmetic.
//!
//! A cursor names a (chunk, node) pair plus the identity of the container
//! that issued it, so a cursor from one deque never resolves against
//! another. The distinguished end cursor carries no chunk or node and
//! denotes "one past the last element".
//!
//! Stepping (`advance` by ±n) walks node links inside the current chunk
//! and then consumes whole chunks by size, so a walk of distance d costs
//! O(d / target + min(d, target)) and never materializes a flat index.
//! Landing exactly on the end position is legal; walking past it (or past
//! the front) is `OutOfBounds`.
//!
//! Structural edits invalidate cursors: split, merge, and reconstruction
//! relocate nodes between chunks, and erasing an element frees its node
//! slot for reuse. The mutating calls that take a cursor (`insert_at`,
//! `erase_at`) therefore hand back a corrected cursor computed from the
//! position's global index; any other cursor held across a mutation must
//! be treated as stale. Resolution validates what it can cheaply: the
//! container identity, slot liveness, and (for the O(sqrt n) calls)
//! membership of the node in its claimed chunk.

use crate::arena::{Idx, NULL};
use crate::deque::BlockDeque;
use crate::error::{Error, Result};

/// A position in a [`BlockDeque`], including the end position.
///
/// Cursors are plain copyable values; they borrow nothing. Two cursors are
/// equal when they name the same container, chunk, and node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub(crate) owner: u64,
    pub(crate) chunk: Idx,
    pub(crate) node: Idx,
}

impl Cursor {
    /// Whether this is the end position of whichever container issued it.
    #[inline(always)]
    pub fn is_end(&self) -> bool {
        return self.chunk == NULL && self.node == NULL;
    }
}

impl<T> BlockDeque<T> {
    /// Cursor at the first element, or the end cursor when empty.
    pub fn begin(&self) -> Cursor {
        if self.first == NULL {
            return self.end();
        }
        return Cursor {
            owner: self.id,
            chunk: self.first,
            node: self.chunks[self.first].head,
        };
    }

    /// The end cursor: one past the last element.
    pub fn end(&self) -> Cursor {
        return Cursor {
            owner: self.id,
            chunk: NULL,
            node: NULL,
        };
    }

    /// Cursor at global index `i`; `i == len` gives the end cursor.
    pub fn cursor_at(&self, i: usize) -> Result<Cursor> {
        if i > self.len {
            return Err(Error::OutOfBounds);
        }
        return Ok(self.cursor_from_index(i));
    }

    fn cursor_from_index(&self, i: usize) -> Cursor {
        if i == self.len {
            return self.end();
        }
        let (chunk, node) = self.locate(i);
        return Cursor {
            owner: self.id,
            chunk,
            node,
        };
    }

    /// Read the element under the cursor. The end cursor holds none.
    pub fn get(&self, cursor: Cursor) -> Result<&T> {
        self.check_live(cursor)?;
        if cursor.is_end() {
            return Err(Error::InvalidPosition);
        }
        return Ok(&self.nodes[cursor.node].value);
    }

    pub fn get_mut(&mut self, cursor: Cursor) -> Result<&mut T> {
        self.check_live(cursor)?;
        if cursor.is_end() {
            return Err(Error::InvalidPosition);
        }
        return Ok(&mut self.nodes[cursor.node].value);
    }

    /// Cheap validation: right container, live slots. Does not prove the
    /// node still sits in the claimed chunk; `resolve` does.
    fn check_live(&self, cursor: Cursor) -> Result<()> {
        if cursor.owner != self.id {
            return Err(Error::InvalidPosition);
        }
        if cursor.is_end() {
            return Ok(());
        }
        if !self.chunks.is_live(cursor.chunk) || !self.nodes.is_live(cursor.node) {
            return Err(Error::InvalidPosition);
        }
        return Ok(());
    }

    /// Global index of the cursor; the end cursor maps to `len`. Scans the
    /// outer list up to the cursor's chunk, then walks the chunk, so this
    /// both resolves and fully validates the position in O(sqrt n).
    pub(crate) fn resolve(&self, cursor: Cursor) -> Result<usize> {
        if cursor.owner != self.id {
            return Err(Error::InvalidPosition);
        }
        if cursor.chunk == NULL || cursor.node == NULL {
            if cursor.is_end() {
                return Ok(self.len);
            }
            return Err(Error::InvalidPosition);
        }
        if !self.chunks.is_live(cursor.chunk) || !self.nodes.is_live(cursor.node) {
            return Err(Error::InvalidPosition);
        }
        let mut before = 0;
        let mut chunk = self.first;
        while chunk != NULL && chunk != cursor.chunk {
            before += self.chunks[chunk].len;
            chunk = self.chunks[chunk].next;
        }
        if chunk == NULL {
            return Err(Error::InvalidPosition);
        }
        match self.chunks[chunk].index_of(&self.nodes, cursor.node) {
            Some(offset) => return Ok(before + offset),
            None => return Err(Error::InvalidPosition),
        }
    }

    /// Step the cursor by a signed offset. Landing on the end position is
    /// legal; stepping past either boundary is `OutOfBounds`.
    pub fn advance(&self, cursor: Cursor, n: isize) -> Result<Cursor> {
        self.check_live(cursor)?;
        if n >= 0 {
            return self.walk_forward(cursor, n as usize);
        }
        return self.walk_backward(cursor, n.unsigned_abs());
    }

    /// Signed distance: the steps needed to advance `a` onto `b`.
    /// Positions from two different containers do not relate.
    pub fn distance(&self, a: Cursor, b: Cursor) -> Result<isize> {
        if a.owner != self.id || b.owner != self.id {
            return Err(Error::InvalidPosition);
        }
        // Same chunk: the in-chunk offsets decide, no outer scan needed.
        if !a.is_end() && a.chunk == b.chunk {
            self.check_live(a)?;
            self.check_live(b)?;
            let chunk = &self.chunks[a.chunk];
            let ia = chunk
                .index_of(&self.nodes, a.node)
                .ok_or(Error::InvalidPosition)?;
            let ib = chunk
                .index_of(&self.nodes, b.node)
                .ok_or(Error::InvalidPosition)?;
            return Ok(ib as isize - ia as isize);
        }
        let ia = self.resolve(a)?;
        let ib = self.resolve(b)?;
        return Ok(ib as isize - ia as isize);
    }

    fn walk_forward(&self, cursor: Cursor, n: usize) -> Result<Cursor> {
        if cursor.is_end() {
            if n == 0 {
                return Ok(cursor);
            }
            return Err(Error::OutOfBounds);
        }
        // Walk node links inside the current chunk; stepping off the tail
        // leaves `node == NULL` with the remainder still to consume.
        let mut node = cursor.node;
        let mut taken = 0;
        while taken < n && node != NULL {
            node = self.nodes[node].next;
            taken += 1;
        }
        if node != NULL {
            return Ok(Cursor {
                owner: self.id,
                chunk: cursor.chunk,
                node,
            });
        }
        // Consume whole chunks by size until the remainder fits.
        let mut remaining = n - taken;
        let mut chunk = self.chunks[cursor.chunk].next;
        loop {
            if chunk == NULL {
                if remaining == 0 {
                    return Ok(self.end());
                }
                return Err(Error::OutOfBounds);
            }
            let clen = self.chunks[chunk].len;
            if remaining < clen {
                let node = self.chunks[chunk].node_at(&self.nodes, remaining);
                return Ok(Cursor {
                    owner: self.id,
                    chunk,
                    node,
                });
            }
            remaining -= clen;
            chunk = self.chunks[chunk].next;
        }
    }

    fn walk_backward(&self, cursor: Cursor, n: usize) -> Result<Cursor> {
        let (mut remaining, mut chunk) = if cursor.is_end() {
            // Drop into the last chunk: one step back from the end lands
            // on its tail.
            if n == 0 {
                return Ok(cursor);
            }
            (n, self.last)
        } else {
            let mut node = cursor.node;
            let mut taken = 0;
            while taken < n {
                let prev = self.nodes[node].prev;
                if prev == NULL {
                    break;
                }
                node = prev;
                taken += 1;
            }
            if taken == n {
                return Ok(Cursor {
                    owner: self.id,
                    chunk: cursor.chunk,
                    node,
                });
            }
            (n - taken, self.chunks[cursor.chunk].prev)
        };
        loop {
            if chunk == NULL {
                return Err(Error::OutOfBounds);
            }
            let clen = self.chunks[chunk].len;
            if remaining <= clen {
                let node = self.chunks[chunk].node_at(&self.nodes, clen - remaining);
                return Ok(Cursor {
                    owner: self.id,
                    chunk,
                    node,
                });
            }
            remaining -= clen;
            chunk = self.chunks[chunk].prev;
        }
    }

    /// Insert `value` before the cursor; the end cursor appends. Returns a
    /// cursor to the new element, corrected for any rebalancing the edit
    /// triggered.
    pub fn insert_at(&mut self, cursor: Cursor, value: T) -> Result<Cursor> {
        let index = self.resolve(cursor)?;
        if index == self.len {
            self.push_back(value);
        } else {
            self.chunks[cursor.chunk].insert_before(&mut self.nodes, cursor.node, value);
            self.len += 1;
            self.rebalance(cursor.chunk);
        }
        return Ok(self.cursor_from_index(index));
    }

    /// Erase the element under the cursor. Returns a corrected cursor to
    /// the element that followed it (the end cursor if none). Erasing the
    /// end position is a fault, as is any stale or foreign cursor.
    pub fn erase_at(&mut self, cursor: Cursor) -> Result<Cursor> {
        let index = self.resolve(cursor)?;
        if index == self.len {
            // The end cursor names no element; this also covers the empty
            // container, whose only resolvable cursor is the end.
            return Err(Error::InvalidPosition);
        }
        self.chunks[cursor.chunk].remove(&mut self.nodes, cursor.node);
        self.len -= 1;
        self.settle_after_remove(cursor.chunk);
        return Ok(self.cursor_from_index(index));
    }
}
