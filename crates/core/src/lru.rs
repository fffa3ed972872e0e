//! Fixed-capacity least-recently-used map.
//!
//! Entries live in an arena of nodes addressed by index. The recency list is
//! threaded through the nodes as `prev`/`next` indices (head = most recent),
//! freed slots are recycled through a free list, and each node keeps its own
//! key so eviction can drop the map entry for a node found by position.
//!
//! Every operation is O(1). The structure is not synchronized; callers that
//! share it wrap it in a mutex.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded recency-ordered map.
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: NonZeroUsize,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    lookup: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            free: Vec::new(),
            lookup: HashMap::with_capacity(capacity.get()),
            head: None,
            tail: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup.contains_key(key)
    }

    /// Look up a value and mark it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.lookup.get(key)?;
        self.detach(idx);
        self.push_front(idx);
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    /// Look up a value without touching recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.lookup.get(key)?;
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    /// Insert or replace a value and mark it most recently used.
    ///
    /// Returns the entry evicted to stay within capacity, if any. A put adds at
    /// most one entry, so at most one entry is ever evicted.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.lookup.get(&key) {
            if let Some(node) = self.slots[idx].as_mut() {
                node.value = value;
            }
            self.detach(idx);
            self.push_front(idx);
            return None;
        }

        let node = Node { key: key.clone(), value, prev: None, next: None };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.push_front(idx);
        self.lookup.insert(key, idx);

        if self.lookup.len() > self.capacity.get() { self.evict_tail() } else { None }
    }

    /// Remove an entry. Absent keys are a no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.lookup.remove(key)?;
        self.release(idx).map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.lookup.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.slots[cursor?].as_ref()?;
            cursor = node.next;
            Some(&node.key)
        })
    }

    fn evict_tail(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        let (key, value) = self.release(idx)?;
        self.lookup.remove(&key);
        Some((key, value))
    }

    /// Unlink a slot, free it, and hand back its contents.
    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        self.detach(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        Some((node.key, node.value))
    }

    fn detach(&mut self, idx: usize) {
        let Some(node) = self.slots[idx].as_mut() else {
            return;
        };
        let (prev, next) = (node.prev.take(), node.next.take());

        match prev {
            Some(p) => {
                if let Some(prev_node) = self.slots[p].as_mut() {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(next_node) = self.slots[n].as_mut() {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(head_node) = self.slots[h].as_mut() {
                    head_node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}
