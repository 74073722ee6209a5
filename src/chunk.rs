//! Inner chunk: a doubly linked run of elements inside the node arena.
//!
//! A chunk owns a contiguous stretch of the sequence as a `head..tail` node
//! chain. All edits are O(1) relinks; `split_before` and `merge` move whole
//! node chains between chunks without touching element values. The chunk
//! header also carries the `prev`/`next` links of the outer chunk list, so
//! chunks chain together the same way their nodes do.
//!
//! Walk-based helpers (`node_at`, `index_of`) are O(distance) and only run
//! on the rebalancing slow path or while resolving a cursor.

use crate::arena::{Arena, Idx, NULL};

/// One element of the sequence, linked to its neighbors within a chunk.
pub struct Node<T> {
    pub value: T,
    pub prev: Idx,
    pub next: Idx,
}

/// Header of one chunk: the node chain it owns plus its outer-list links.
pub struct Chunk {
    /// First node, NULL when the chunk is empty.
    pub head: Idx,
    /// Last node, NULL when the chunk is empty.
    pub tail: Idx,
    /// Number of nodes in the chain.
    pub len: usize,
    /// Previous chunk in the outer list.
    pub prev: Idx,
    /// Next chunk in the outer list.
    pub next: Idx,
}

impl Chunk {
    pub fn new() -> Chunk {
        return Chunk {
            head: NULL,
            tail: NULL,
            len: 0,
            prev: NULL,
            next: NULL,
        };
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// Prepend a value. O(1).
    pub fn push_front<T>(&mut self, nodes: &mut Arena<Node<T>>, value: T) -> Idx {
        let node = nodes.alloc(Node {
            value,
            prev: NULL,
            next: self.head,
        });
        if self.head != NULL {
            nodes[self.head].prev = node;
        } else {
            self.tail = node;
        }
        self.head = node;
        self.len += 1;
        return node;
    }

    /// Append a value. O(1).
    pub fn push_back<T>(&mut self, nodes: &mut Arena<Node<T>>, value: T) -> Idx {
        let node = nodes.alloc(Node {
            value,
            prev: self.tail,
            next: NULL,
        });
        if self.tail != NULL {
            nodes[self.tail].next = node;
        } else {
            self.head = node;
        }
        self.tail = node;
        self.len += 1;
        return node;
    }

    /// Insert a value before `at`; `at == NULL` appends. O(1).
    /// Returns the new node.
    pub fn insert_before<T>(&mut self, nodes: &mut Arena<Node<T>>, at: Idx, value: T) -> Idx {
        if at == NULL {
            return self.push_back(nodes, value);
        }
        let prev = nodes[at].prev;
        let node = nodes.alloc(Node { value, prev, next: at });
        nodes[at].prev = node;
        if prev != NULL {
            nodes[prev].next = node;
        } else {
            self.head = node;
        }
        self.len += 1;
        return node;
    }

    /// Unlink and free `at`. O(1).
    /// Returns the value and the node that followed it (NULL if none).
    pub fn remove<T>(&mut self, nodes: &mut Arena<Node<T>>, at: Idx) -> (T, Idx) {
        let Node { value, prev, next } = nodes.free(at);
        if prev != NULL {
            nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NULL {
            nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.len -= 1;
        return (value, next);
    }

    /// Remove the first value. Caller guarantees the chunk is non-empty.
    pub fn pop_front<T>(&mut self, nodes: &mut Arena<Node<T>>) -> T {
        let (value, _) = self.remove(nodes, self.head);
        return value;
    }

    /// Remove the last value. Caller guarantees the chunk is non-empty.
    pub fn pop_back<T>(&mut self, nodes: &mut Arena<Node<T>>) -> T {
        let (value, _) = self.remove(nodes, self.tail);
        return value;
    }

    /// Detach `[index, len)` into a new chunk, leaving `[0, index)` behind.
    /// `at` must be the node at `index`. O(1): only the boundary links move,
    /// never the element values.
    pub fn split_before<T>(&mut self, nodes: &mut Arena<Node<T>>, at: Idx, index: usize) -> Chunk {
        debug_assert!(at != NULL && index < self.len);
        let right = Chunk {
            head: at,
            tail: self.tail,
            len: self.len - index,
            prev: NULL,
            next: NULL,
        };
        let left_tail = nodes[at].prev;
        nodes[at].prev = NULL;
        if left_tail != NULL {
            nodes[left_tail].next = NULL;
        }
        self.tail = left_tail;
        if index == 0 {
            self.head = NULL;
        }
        self.len = index;
        return right;
    }

    /// Concatenate `right`'s chain after this chunk. O(1).
    /// `right` must already be unlinked from the outer list.
    pub fn merge<T>(&mut self, nodes: &mut Arena<Node<T>>, right: Chunk) {
        if right.len == 0 {
            return;
        }
        if self.len == 0 {
            self.head = right.head;
            self.tail = right.tail;
        } else {
            nodes[self.tail].next = right.head;
            nodes[right.head].prev = self.tail;
            self.tail = right.tail;
        }
        self.len += right.len;
    }

    /// Node at in-chunk index `i`, walking from the nearer end.
    pub fn node_at<T>(&self, nodes: &Arena<Node<T>>, i: usize) -> Idx {
        debug_assert!(i < self.len);
        if i <= self.len / 2 {
            let mut node = self.head;
            for _ in 0..i {
                node = nodes[node].next;
            }
            return node;
        }
        let mut node = self.tail;
        for _ in 0..(self.len - 1 - i) {
            node = nodes[node].prev;
        }
        return node;
    }

    /// In-chunk index of `target`, or None if the node is not in this chain.
    /// O(k) from the chunk head; rebalance / cursor-resolution path only.
    pub fn index_of<T>(&self, nodes: &Arena<Node<T>>, target: Idx) -> Option<usize> {
        let mut node = self.head;
        let mut i = 0;
        while node != NULL {
            if node == target {
                return Some(i);
            }
            node = nodes[node].next;
            i += 1;
        }
        return None;
    }
}
