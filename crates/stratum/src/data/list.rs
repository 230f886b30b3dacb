//! Doubly linked queues over a shared slot arena.
//!
//! Each list is a circular chain through its own sentinel slot. Entries are allocated once and
//! can move between lists of the same arena: `enqueue` unlinks an entry from wherever it is and
//! pushes it at the front, `dequeue` pops from the back. Both are O(1).

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

#[derive(Debug, Clone)]
struct Slot<T> {
    // `None` for sentinels.
    value: Option<T>,
    prev: usize,
    next: usize,
    // Sentinel of the list this entry is linked into.
    owner: Option<usize>,
    // Only meaningful for sentinels.
    len: usize,
}

#[derive(Debug, Clone)]
pub struct ListArena<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for ListArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListArena<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn new_list(&mut self) -> ListId {
        let ix = self.slots.len();
        self.slots.push(Slot {
            value: None,
            prev: ix,
            next: ix,
            owner: None,
            len: 0,
        });
        ListId(ix)
    }

    /// Allocates an entry that is not yet linked into any list.
    pub fn insert(&mut self, value: T) -> EntryId {
        let ix = self.slots.len();
        self.slots.push(Slot {
            value: Some(value),
            prev: ix,
            next: ix,
            owner: None,
            len: 0,
        });
        EntryId(ix)
    }

    pub fn get(&self, entry: EntryId) -> Option<&T> {
        self.slots.get(entry.0).and_then(|s| s.value.as_ref())
    }

    pub fn get_mut(&mut self, entry: EntryId) -> Option<&mut T> {
        self.slots.get_mut(entry.0).and_then(|s| s.value.as_mut())
    }

    /// List the entry is currently linked into.
    pub fn list_of(&self, entry: EntryId) -> Option<ListId> {
        self.slots.get(entry.0).and_then(|s| s.owner).map(ListId)
    }

    /// Pushes `entry` at the front of `list`, unlinking it first if it is already in a list.
    pub fn enqueue(&mut self, list: ListId, entry: EntryId) {
        if entry.0 >= self.slots.len() || self.slots[entry.0].value.is_none() {
            return;
        }
        self.unlink(entry);

        let sentinel = list.0;
        let first = self.slots[sentinel].next;
        self.slots[entry.0].next = first;
        self.slots[entry.0].prev = sentinel;
        self.slots[entry.0].owner = Some(sentinel);
        self.slots[first].prev = entry.0;
        self.slots[sentinel].next = entry.0;
        self.slots[sentinel].len += 1;
    }

    /// Pops the entry at the back of `list`.
    pub fn dequeue(&mut self, list: ListId) -> Option<EntryId> {
        let last = self.slots.get(list.0)?.prev;
        if last == list.0 {
            return None;
        }
        let entry = EntryId(last);
        self.unlink(entry);
        Some(entry)
    }

    /// Removes `entry` from its list; no-op if it is not linked.
    pub fn unlink(&mut self, entry: EntryId) {
        let Some(owner) = self.slots.get(entry.0).and_then(|s| s.owner) else {
            return;
        };
        let (prev, next) = (self.slots[entry.0].prev, self.slots[entry.0].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
        let slot = &mut self.slots[entry.0];
        slot.prev = entry.0;
        slot.next = entry.0;
        slot.owner = None;
        self.slots[owner].len -= 1;
    }

    pub fn len(&self, list: ListId) -> usize {
        self.slots.get(list.0).map_or(0, |s| s.len)
    }

    pub fn is_empty(&self, list: ListId) -> bool {
        self.len(list) == 0
    }

    /// Values in dequeue order (back to front).
    pub fn iter(&self, list: ListId) -> impl Iterator<Item = &T> + '_ {
        let sentinel = list.0;
        let mut cur = self.slots.get(sentinel).map_or(sentinel, |s| s.prev);
        std::iter::from_fn(move || {
            if cur == sentinel {
                return None;
            }
            let slot = &self.slots[cur];
            cur = slot.prev;
            slot.value.as_ref()
        })
    }

    pub fn display(&self, list: ListId) -> ListDisplay<'_, T> {
        ListDisplay { arena: self, list }
    }
}

/// Renders a list as `[v1, v2, ...]` in dequeue order, each value as JSON.
pub struct ListDisplay<'a, T> {
    arena: &'a ListArena<T>,
    list: ListId,
}

impl<T: Serialize> fmt::Display for ListDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.arena.iter(self.list).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let json = serde_json::to_string(value).map_err(|_| fmt::Error)?;
            f.write_str(&json)?;
        }
        f.write_str("]")
    }
}
