//! Min-priority queue keyed by a caller-supplied function.
//!
//! The payload type does not need to be orderable: the queue derives each
//! item's priority once, at push time, through the key function given at
//! construction. The lowest key is retrieved first; equal keys come out in
//! insertion order.

use crate::error::{Result, SettleError};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry. Ordered by `(key, seq)` reversed, so that `BinaryHeap` (a
/// max-heap) yields the smallest key first.
struct Entry<K, T> {
    key: K,
    seq: u64,
    item: T,
}

impl<K: Ord, T> PartialEq for Entry<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord, T> Eq for Entry<K, T> {}

impl<K: Ord, T> PartialOrd for Entry<K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, T> Ord for Entry<K, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A binary-heap priority queue over arbitrary items.
///
/// # Examples
///
/// ```
/// use settle_up::PriorityQueue;
/// use std::cmp::Reverse;
///
/// // Longest word first.
/// let mut queue = PriorityQueue::new(|w: &&str| Reverse(w.len()));
/// queue.push("fig");
/// queue.push("banana");
/// queue.push("kiwi");
///
/// assert_eq!(queue.pop().unwrap(), "banana");
/// assert_eq!(queue.into_iter().collect::<Vec<_>>(), vec!["kiwi", "fig"]);
/// ```
pub struct PriorityQueue<T, K, F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    heap: BinaryHeap<Entry<K, T>>,
    key_fn: F,
    next_seq: u64,
}

impl<T, K, F> PriorityQueue<T, K, F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    /// Creates an empty queue ordered by `key_fn`.
    pub fn new(key_fn: F) -> Self {
        PriorityQueue {
            heap: BinaryHeap::new(),
            key_fn,
            next_seq: 0,
        }
    }

    /// Builds a queue from `items` in one heapify pass.
    pub fn from_items<I>(items: I, key_fn: F) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let entries: Vec<Entry<K, T>> = items
            .into_iter()
            .enumerate()
            .map(|(seq, item)| Entry {
                key: key_fn(&item),
                seq: seq as u64,
                item,
            })
            .collect();
        let next_seq = entries.len() as u64;

        PriorityQueue {
            heap: BinaryHeap::from(entries),
            key_fn,
            next_seq,
        }
    }

    /// Adds an item, deriving its priority from the key function.
    pub fn push(&mut self, item: T) {
        let key = (self.key_fn)(&item);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { key, seq, item });
    }

    /// Removes and returns the item with the lowest key.
    pub fn pop(&mut self) -> Result<T> {
        self.heap
            .pop()
            .map(|entry| entry.item)
            .ok_or(SettleError::EmptyContainer)
    }

    /// Returns the item with the lowest key without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.heap.peek().map(|entry| &entry.item)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Draining iterator returned by `PriorityQueue::into_iter`.
pub struct Drain<T, K, F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    queue: PriorityQueue<T, K, F>,
}

impl<T, K, F> Iterator for Drain<T, K, F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl<T, K, F> IntoIterator for PriorityQueue<T, K, F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    type Item = T;
    type IntoIter = Drain<T, K, F>;

    /// Consumes the queue, yielding every item in priority order.
    fn into_iter(self) -> Self::IntoIter {
        Drain { queue: self }
    }
}
