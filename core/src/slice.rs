//! Copying an inclusive index range out of an array, re-chunked from
//! scratch.

use tracing::instrument;

use crate::array1d::ExaArray1;
use crate::error::IndexError;
use crate::index::ChunkPos;

impl<T: Clone> ExaArray1<T> {
    /// Copies the inclusive logical range `[from, to]` into a fresh array.
    ///
    /// The copy keeps the source's strategy but is re-chunked from scratch:
    /// its first element lands at chunk 0, offset 0 no matter where `from`
    /// falls in the source, and every chunk but the last comes out at full
    /// capacity. Chunks are allocated as they fill, not up front.
    ///
    /// Fails with [`IndexError::InvertedRange`] when `to < from`, and with
    /// [`IndexError::Unallocated`] when either bound lies past the grown
    /// length. Runs in O(n) over the copied elements.
    #[instrument(skip(self), fields(len = self.len))]
    pub fn clone_range(&self, from: u64, to: u64) -> Result<Self, IndexError> {
        if to < from {
            return Err(IndexError::InvertedRange { from, to });
        }
        if from >= self.len || to >= self.len {
            let index = if from >= self.len { from } else { to };
            return Err(IndexError::Unallocated {
                index,
                len: self.len,
            });
        }

        let capacity = self.indexer.capacity();
        let span = to - from + 1;
        let mut chunks: Vec<Vec<T>> = Vec::with_capacity(self.indexer.chunks_for(span) as usize);

        let ChunkPos { chunk, offset } = self.indexer.split(from);
        let mut src_chunk = chunk as usize;
        let mut src_offset = offset as usize;
        let mut remaining = span;

        while remaining > 0 {
            let source = &self.chunks[src_chunk];
            let src_run = (source.len() - src_offset) as u64;
            let dest_room = match chunks.last() {
                Some(open) if (open.len() as u64) < capacity => capacity - open.len() as u64,
                _ => capacity,
            };
            // One step copies the longest run the source chunk, the
            // destination chunk and the range end all permit.
            let take = remaining.min(src_run).min(dest_room) as usize;
            let run = &source[src_offset..src_offset + take];

            match chunks.last_mut() {
                Some(open) if (open.len() as u64) < capacity => {
                    open.reserve_exact(take);
                    open.extend_from_slice(run);
                }
                _ => {
                    let mut fresh = Vec::with_capacity(take);
                    fresh.extend_from_slice(run);
                    chunks.push(fresh);
                }
            }

            remaining -= take as u64;
            src_offset += take;
            // Move to the next source chunk only once this one is spent; a
            // single step may well stop mid-chunk.
            if src_offset == source.len() {
                src_chunk += 1;
                src_offset = 0;
            }
        }

        Ok(Self {
            strategy: self.strategy,
            indexer: self.indexer,
            len: span,
            chunks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::strategy::Strategy;

    fn array_with(capacity: u64, len: u64) -> ExaArray1<u64> {
        let mut array = ExaArray1::with_chunk_capacity(Strategy::MaxPerformance, capacity);
        array.grow(len).unwrap();
        for index in 0..len {
            array.set(index, index).unwrap();
        }
        array
    }

    fn values(array: &ExaArray1<u64>) -> Vec<u64> {
        array.iter().copied().collect()
    }

    fn chunk_lens(array: &ExaArray1<u64>) -> Vec<usize> {
        array.chunks.iter().map(Vec::len).collect()
    }

    #[test]
    fn copies_within_a_single_chunk() {
        let array = array_with(4, 4);
        let copy = array.clone_range(1, 2).unwrap();
        assert_eq!(copy.len(), 2);
        assert_eq!(values(&copy), vec![1, 2]);
        assert_eq!(chunk_lens(&copy), vec![2]);
        assert_eq!(copy.strategy(), array.strategy());
    }

    #[test]
    fn copies_a_single_element() {
        let array = array_with(4, 10);
        for index in [0, 2, 9] {
            let copy = array.clone_range(index, index).unwrap();
            assert_eq!(values(&copy), vec![index]);
            assert_eq!(chunk_lens(&copy), vec![1]);
        }
    }

    #[test]
    fn copies_ranges_aligned_with_chunk_boundaries() {
        let array = array_with(4, 12);
        let copy = array.clone_range(4, 11).unwrap();
        assert_eq!(values(&copy), (4..=11).collect::<Vec<_>>());
        assert_eq!(chunk_lens(&copy), vec![4, 4]);
    }

    #[test]
    fn copies_a_misaligned_start_across_many_chunks() {
        // Every source chunk is entered mid-way, so each one is drained in
        // two steps. Nothing may be skipped in between.
        let array = array_with(4, 20);
        let copy = array.clone_range(2, 17).unwrap();
        assert_eq!(copy.len(), 16);
        assert_eq!(values(&copy), (2..=17).collect::<Vec<_>>());
        assert_eq!(chunk_lens(&copy), vec![4, 4, 4, 4]);
    }

    #[test]
    fn copies_are_re_chunked_from_offset_zero() {
        let array = array_with(4, 10);
        let copy = array.clone_range(5, 9).unwrap();
        assert_eq!(values(&copy), (5..=9).collect::<Vec<_>>());
        // The source held these elements at chunk 1 offset 1 onwards, the
        // copy starts over at chunk 0 offset 0.
        assert_eq!(chunk_lens(&copy), vec![4, 1]);
    }

    #[test]
    fn full_range_copy_equals_a_clone() {
        let array = array_with(4, 10);
        let copy = array.clone_range(0, 9).unwrap();
        assert_eq!(copy, array.clone());
    }

    #[test]
    fn bounds_are_validated() {
        let array = array_with(4, 6);
        assert_eq!(
            array.clone_range(5, 2),
            Err(IndexError::InvertedRange { from: 5, to: 2 })
        );
        assert_eq!(
            array.clone_range(6, 8),
            Err(IndexError::Unallocated { index: 6, len: 6 })
        );
        assert_eq!(
            array.clone_range(2, 6),
            Err(IndexError::Unallocated { index: 6, len: 6 })
        );

        let empty: ExaArray1<u64> = ExaArray1::new();
        assert_eq!(
            empty.clone_range(0, 0),
            Err(IndexError::Unallocated { index: 0, len: 0 })
        );
    }

    #[test]
    fn small_ranges_under_the_default_strategy() {
        let mut array: ExaArray1<u8> = ExaArray1::new();
        array.grow(3).unwrap();
        array.set(0, 1).unwrap();
        array.set(1, 2).unwrap();
        array.set(2, 3).unwrap();

        let head = array.clone_range(0, 1).unwrap();
        assert_eq!(head.len(), 2);
        assert_eq!(head.iter().copied().collect::<Vec<_>>(), vec![1, 2]);

        let tail = array.clone_range(2, 2).unwrap();
        assert_eq!(tail.iter().copied().collect::<Vec<_>>(), vec![3]);

        let all = array.clone_range(0, 2).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn the_copy_is_independent_of_the_source() {
        let array = array_with(4, 8);
        let mut copy = array.clone_range(2, 5).unwrap();
        copy.set(0, 999).unwrap();
        assert_eq!(*array.get(2).unwrap(), 2);
        assert_eq!(values(&copy), vec![999, 3, 4, 5]);
    }
}
