//! Slot arena with stable u32 indices and a vacancy free-list.
//!
//! Both the element nodes and the chunk headers live in arenas, so every
//! link in the structure is an index rather than a pointer. Freed slots are
//! chained through `Slot::Vacant` and reused before the backing Vec grows.

/// Arena slot index. u32 saves space vs usize on 64-bit.
pub type Idx = u32;

/// Sentinel index for "no slot": list ends, empty free-list, end cursors.
pub const NULL: Idx = Idx::MAX;

/// A slot either holds a live value or links to the next vacant slot.
enum Slot<V> {
    Occupied(V),
    Vacant(Idx),
}

/// A growable arena of slots addressed by stable indices.
pub struct Arena<V> {
    slots: Vec<Slot<V>>,
    free_head: Idx,
    live: usize,
}

impl<V> Arena<V> {
    pub fn new() -> Arena<V> {
        return Arena {
            slots: Vec::new(),
            free_head: NULL,
            live: 0,
        };
    }

    /// Number of live slots.
    #[inline(always)]
    pub fn len(&self) -> usize {
        return self.live;
    }

    /// Store a value, reusing a vacant slot if one exists.
    pub fn alloc(&mut self, value: V) -> Idx {
        self.live += 1;
        if self.free_head != NULL {
            let idx = self.free_head;
            match self.slots[idx as usize] {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => unreachable!("free-list points at a live slot"),
            }
            self.slots[idx as usize] = Slot::Occupied(value);
            return idx;
        }
        let idx = self.slots.len() as Idx;
        self.slots.push(Slot::Occupied(value));
        return idx;
    }

    /// Release a slot and return its value. Panics if the slot is vacant.
    pub fn free(&mut self, idx: Idx) -> V {
        let slot = std::mem::replace(&mut self.slots[idx as usize], Slot::Vacant(self.free_head));
        match slot {
            Slot::Occupied(value) => {
                self.free_head = idx;
                self.live -= 1;
                return value;
            }
            Slot::Vacant(_) => panic!("freeing a vacant arena slot"),
        }
    }

    /// Whether `idx` currently names a live slot.
    #[inline]
    pub fn is_live(&self, idx: Idx) -> bool {
        if idx == NULL {
            return false;
        }
        return matches!(self.slots.get(idx as usize), Some(Slot::Occupied(_)));
    }

    /// Drop every value and reset the free-list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NULL;
        self.live = 0;
    }
}

impl<V> std::ops::Index<Idx> for Arena<V> {
    type Output = V;

    #[inline(always)]
    fn index(&self, idx: Idx) -> &V {
        match &self.slots[idx as usize] {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => panic!("indexing a vacant arena slot"),
        }
    }
}

impl<V> std::ops::IndexMut<Idx> for Arena<V> {
    #[inline(always)]
    fn index_mut(&mut self, idx: Idx) -> &mut V {
        match &mut self.slots[idx as usize] {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => panic!("indexing a vacant arena slot"),
        }
    }
}
