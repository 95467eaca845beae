use std::ops::{Index, IndexMut};

use get_size::GetSize;

use crate::error::{IndexError, RangeError};
use crate::index::ChunkIndexer;
use crate::strategy::Strategy;

/// A one-dimensional array addressed by `u64` indices, grown on demand and
/// stored as a sequence of fixed-capacity chunks.
///
/// A single `Vec` tops out long before the 64-bit index space does, so the
/// container spreads its elements over many inner vectors and routes every
/// access through a chunk/offset split. The [`Strategy`] chosen at
/// construction fixes the chunk capacity and the addressable maximum.
///
/// Growth never moves existing elements, and the container never shrinks.
/// Cloning copies the chunk storage element by element; for
/// reference-counted element types that copies handles while payloads stay
/// shared.
#[derive(Debug, Clone, PartialEq, Eq, GetSize)]
pub struct ExaArray1<T> {
    pub(crate) strategy: Strategy,
    pub(crate) indexer: ChunkIndexer,
    pub(crate) len: u64,
    pub(crate) chunks: Vec<Vec<T>>,
}

impl<T> ExaArray1<T> {
    /// Creates an empty array with the default [`Strategy::MaxPerformance`].
    pub fn new() -> Self {
        Self::with_strategy(Strategy::default())
    }

    /// Creates an empty array chunked according to `strategy`.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            indexer: ChunkIndexer::new(strategy.chunk_capacity()),
            len: 0,
            chunks: vec![Vec::new()],
        }
    }

    /// Test-only constructor with an arbitrary chunk capacity. Bounds still
    /// follow `strategy`, only the chunk geometry shrinks.
    #[cfg(test)]
    pub(crate) fn with_chunk_capacity(strategy: Strategy, capacity: u64) -> Self {
        Self {
            strategy,
            indexer: ChunkIndexer::new(capacity),
            len: 0,
            chunks: vec![Vec::new()],
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Current logical length.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Upper bound on the length under the array's strategy. The bound is
    /// exclusive, see [`Strategy::max_elements`].
    pub fn max_elements(&self) -> u64 {
        self.strategy.max_elements()
    }

    /// Number of chunks currently backing the array. At least one, even
    /// when empty.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Ordered chunk contents. Every chunk but the last is at full
    /// capacity; the last holds the remainder.
    pub fn chunks(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.chunks.iter().map(Vec::as_slice)
    }

    /// Borrows the element at `index`.
    ///
    /// Fails with [`IndexError::OutOfRange`] when the index can never be
    /// valid under the strategy, and [`IndexError::Unallocated`] when it is
    /// beyond the grown length.
    pub fn get(&self, index: u64) -> Result<&T, IndexError> {
        let max = self.max_elements();
        if index >= max {
            return Err(IndexError::OutOfRange { index, max });
        }
        let pos = self.indexer.split(index);
        self.chunks
            .get(pos.chunk as usize)
            .and_then(|chunk| chunk.get(pos.offset as usize))
            .ok_or(IndexError::Unallocated {
                index,
                len: self.len,
            })
    }

    /// Mutably borrows the element at `index`, with the same error
    /// contract as [`get`](Self::get).
    pub fn get_mut(&mut self, index: u64) -> Result<&mut T, IndexError> {
        let max = self.max_elements();
        if index >= max {
            return Err(IndexError::OutOfRange { index, max });
        }
        let len = self.len;
        let pos = self.indexer.split(index);
        self.chunks
            .get_mut(pos.chunk as usize)
            .and_then(|chunk| chunk.get_mut(pos.offset as usize))
            .ok_or(IndexError::Unallocated { index, len })
    }

    /// Overwrites the element at `index`. Writing never grows the array,
    /// the index must already be allocated.
    pub fn set(&mut self, index: u64, value: T) -> Result<(), IndexError> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Iterates every element in logical index order. The iterator is lazy
    /// and can be obtained again for another pass.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.chunks.iter().flatten()
    }
}

impl<T: Default + Clone> ExaArray1<T> {
    /// Grows the logical length by `by` elements, each reading as
    /// `T::default()` until written.
    ///
    /// The tail chunk is filled up to the chunk capacity first; any surplus
    /// is carved into freshly appended chunks, all but the last at full
    /// capacity. Existing elements keep their indices.
    ///
    /// Fails with [`RangeError::CapacityExceeded`] when the new length
    /// would reach [`max_elements`](Self::max_elements). The bound is
    /// exclusive: the length can come arbitrarily close to it but never
    /// equal it. On failure nothing is changed.
    pub fn grow(&mut self, by: u64) -> Result<(), RangeError> {
        let max = self.max_elements();
        // `by > max` is tested first so the sum below cannot overflow.
        if by > max || self.len + by >= max {
            return Err(RangeError::CapacityExceeded {
                len: self.len,
                by,
                max,
            });
        }
        self.len += by;

        let capacity = self.indexer.capacity();
        let tail_len = self.chunks.last().map_or(0, |chunk| chunk.len()) as u64;
        let mut remaining = by;

        let take = remaining.min(capacity - tail_len);
        if take > 0 {
            if let Some(tail) = self.chunks.last_mut() {
                tail.resize((tail_len + take) as usize, T::default());
            }
            remaining -= take;
        }
        while remaining > 0 {
            let take = remaining.min(capacity);
            self.chunks.push(vec![T::default(); take as usize]);
            remaining -= take;
        }
        Ok(())
    }

    /// Builds an array from a sequence of unknown length, growing one
    /// element per item. Prefer
    /// [`from_sequence_with_len`](Self::from_sequence_with_len) whenever
    /// the length is known up front.
    pub fn from_sequence<I>(sequence: I, strategy: Strategy) -> Result<Self, RangeError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut array = Self::with_strategy(strategy);
        for item in sequence {
            array.grow(1)?;
            // The freshly grown element is the last one of the last chunk.
            if let Some(slot) = array.chunks.last_mut().and_then(|chunk| chunk.last_mut()) {
                *slot = item;
            }
        }
        Ok(array)
    }

    /// Builds an array of exactly `len` elements, grown in one step and
    /// filled from `sequence` in index order. Missing items stay
    /// `T::default()`, surplus items are dropped.
    pub fn from_sequence_with_len<I>(
        sequence: I,
        len: u64,
        strategy: Strategy,
    ) -> Result<Self, RangeError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut array = Self::with_strategy(strategy);
        array.grow(len)?;
        let slots = array.chunks.iter_mut().flatten();
        for (slot, item) in slots.zip(sequence) {
            *slot = item;
        }
        Ok(array)
    }
}

impl<T> Default for ExaArray1<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<u64> for ExaArray1<T> {
    type Output = T;

    /// Panics where [`get`](ExaArray1::get) would return an error.
    fn index(&self, index: u64) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<u64> for ExaArray1<T> {
    fn index_mut(&mut self, index: u64) -> &mut T {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: Default + Clone> FromIterator<T> for ExaArray1<T> {
    /// Collects with the default strategy. Iterators reporting an exact
    /// size are laid out in one growth step, everything else goes through
    /// the element-by-element path.
    ///
    /// Panics if the sequence outgrows the strategy's bound.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let result = match iter.size_hint() {
            (lower, Some(upper)) if lower == upper => {
                Self::from_sequence_with_len(iter, lower as u64, Strategy::default())
            }
            _ => Self::from_sequence(iter, Strategy::default()),
        };
        match result {
            Ok(array) => array,
            Err(err) => panic!("{err}"),
        }
    }
}
