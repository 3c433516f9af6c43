//! Hash-consing storage for network nodes.

use std::ops::Index;

use log::trace;

use crate::utils::NodeHash;

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    next: Option<u32>,
}

/// Append-only table storing each distinct value once.
///
/// A value's id is its insertion position. Each bucket heads a chain of slots
/// linked through `next`; the bucket array doubles whenever the table holds
/// twice as many values as buckets.
#[derive(Debug, Clone)]
pub struct StrashTable<T> {
    slots: Vec<Slot<T>>,
    buckets: Vec<Option<u32>>,
}

impl<T> StrashTable<T> {
    /// Create an empty table with `2^bits` buckets.
    pub fn with_bucket_bits(bits: u32) -> Self {
        assert!(bits <= 30, "Bucket bits should be in the range 0..=30");
        Self {
            slots: Vec::new(),
            buckets: vec![None; 1 << bits],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(id as usize).map(|slot| &slot.value)
    }

    /// Values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().map(|slot| &slot.value)
    }
}

impl<T: NodeHash + Eq> StrashTable<T> {
    fn bucket_of(&self, value: &T) -> usize {
        (value.node_hash() as usize) & (self.buckets.len() - 1)
    }

    fn chain(&self, bucket: usize) -> impl Iterator<Item = u32> + '_ {
        std::iter::successors(self.buckets[bucket], move |&id| self.slots[id as usize].next)
    }

    pub fn find(&self, value: &T) -> Option<u32> {
        self.chain(self.bucket_of(value))
            .find(|&id| self.slots[id as usize].value == *value)
    }

    /// Return the id of `value`, inserting it if needed, and whether it is new.
    pub fn insert(&mut self, value: T) -> (u32, bool) {
        if let Some(id) = self.find(&value) {
            return (id, false);
        }
        if self.slots.len() >= 2 * self.buckets.len() {
            self.grow();
        }

        let bucket = self.bucket_of(&value);
        let id = self.slots.len() as u32;
        self.slots.push(Slot {
            value,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = Some(id);
        (id, true)
    }

    fn grow(&mut self) {
        let size = self.buckets.len() * 2;
        trace!("strash table: {} values, growing to {} buckets", self.slots.len(), size);
        self.buckets = vec![None; size];
        for id in 0..self.slots.len() {
            let bucket = self.bucket_of(&self.slots[id].value);
            self.slots[id].next = self.buckets[bucket];
            self.buckets[bucket] = Some(id as u32);
        }
    }
}

impl<T> Index<u32> for StrashTable<T> {
    type Output = T;

    fn index(&self, id: u32) -> &Self::Output {
        &self.slots[id as usize].value
    }
}
