//! Binary min-heap used to pick the two lightest nodes during tree construction.
//!
//! Entries are keyed on `(weight, sequence)`: among equal weights the entry
//! inserted first comes out first, so tree construction is reproducible.

use crate::error::Result;

const INITIAL_CAPACITY: usize = 8;

pub trait Weighted {
    fn weight(&self) -> u64;
}

#[derive(Debug)]
struct Entry<T> {
    weight: u64,
    seq: u64,
    item: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (u64, u64) {
        (self.weight, self.seq)
    }
}

#[derive(Debug)]
pub struct MinQueue<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.entries[a].key() < self.entries[b].key()
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = Self::parent(i);
            if !self.less(i, parent) {
                break;
            }
            self.entries.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < self.len() && self.less(l, smallest) {
                smallest = l;
            }
            if r < self.len() && self.less(r, smallest) {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.entries.swap(i, smallest);
            i = smallest;
        }
    }

    // doubles the backing storage when full
    fn grow(&mut self) -> Result<()> {
        if self.entries.len() == self.entries.capacity() {
            let extra = self.entries.capacity().max(INITIAL_CAPACITY);
            self.entries.try_reserve_exact(extra)?;
        }
        Ok(())
    }

    /// Removes and returns the lightest item, or `None` when the queue is empty.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let min = self.entries.pop()?;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        if self.entries.is_empty() {
            self.entries = Vec::new();
        }
        Some(min.item)
    }
}

impl<T: Weighted> MinQueue<T> {
    pub fn insert(&mut self, item: T) -> Result<()> {
        self.grow()?;
        let entry = Entry {
            weight: item.weight(),
            seq: self.next_seq,
            item,
        };
        self.next_seq += 1;
        self.entries.push(entry);
        self.sift_up(self.entries.len() - 1);
        Ok(())
    }
}
