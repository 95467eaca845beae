//! Portable records of an array's logical state.
//!
//! A snapshot carries everything needed to rebuild a container, its
//! strategy, its length and the ordered chunk contents, and nothing about
//! how those bytes should travel. Byte encodings live elsewhere and go
//! through these records in both directions. Reconstruction re-validates
//! every structural invariant, a snapshot by itself guarantees nothing.

use get_size::GetSize;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::array1d::ExaArray1;
use crate::array2d::ExaArray2;
use crate::index::ChunkIndexer;
use crate::strategy::Strategy;

/// The logical record of a one-dimensional array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, GetSize)]
pub struct Snapshot<T> {
    pub strategy: Strategy,
    pub len: u64,
    pub chunks: Vec<Vec<T>>,
}

/// The logical record of a two-dimensional array: the overall element
/// total plus the row list recorded as a snapshot of row snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, GetSize)]
pub struct Snapshot2<T> {
    pub len: u64,
    pub rows: Snapshot<Option<Snapshot<T>>>,
}

/// Structural defects found while rebuilding an array from a snapshot.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    /// Even an empty array records one (empty) chunk.
    #[error("snapshot holds no chunks, an empty array still records one")]
    NoChunks,

    #[error("chunk {chunk} holds {len} elements, above the chunk capacity of {capacity}")]
    OversizedChunk { chunk: usize, len: u64, capacity: u64 },

    /// Only the final chunk may be partially filled.
    #[error("chunk {chunk} holds {len} elements but every chunk before the last must hold {capacity}")]
    ShortChunk { chunk: usize, len: u64, capacity: u64 },

    #[error("the final chunk of a multi-chunk snapshot is empty")]
    EmptyTailChunk,

    #[error("recorded length {recorded} does not match the {actual} elements stored")]
    LengthMismatch { recorded: u64, actual: u64 },

    #[error("recorded length {len} is not addressable under {strategy:?}, the maximum is {max}")]
    TooLong {
        len: u64,
        strategy: Strategy,
        max: u64,
    },

    #[error("recorded total {recorded} does not match the {actual} elements across all rows")]
    TotalMismatch { recorded: u64, actual: u64 },
}

impl<T> ExaArray1<T> {
    /// Decomposes the array into its portable record, handing the chunk
    /// storage over without copying.
    pub fn into_snapshot(self) -> Snapshot<T> {
        Snapshot {
            strategy: self.strategy,
            len: self.len,
            chunks: self.chunks,
        }
    }

    /// Records the array's state, cloning the chunk contents.
    pub fn to_snapshot(&self) -> Snapshot<T>
    where
        T: Clone,
    {
        self.clone().into_snapshot()
    }

    /// Rebuilds an array from a record, re-validating the chunk geometry:
    /// at least one chunk, every chunk before the last at full capacity,
    /// the recorded length matching the stored elements and staying below
    /// the strategy's bound.
    pub fn from_snapshot(snapshot: Snapshot<T>) -> Result<Self, SnapshotError> {
        let Snapshot {
            strategy,
            len,
            chunks,
        } = snapshot;
        let capacity = strategy.chunk_capacity();
        let max = strategy.max_elements();

        if chunks.is_empty() {
            return Err(SnapshotError::NoChunks);
        }
        if len >= max {
            return Err(SnapshotError::TooLong { len, strategy, max });
        }
        if chunks.len() > 1 && chunks.last().map_or(false, |chunk| chunk.is_empty()) {
            return Err(SnapshotError::EmptyTailChunk);
        }

        let tail = chunks.len() - 1;
        let mut actual = 0u64;
        for (index, chunk) in chunks.iter().enumerate() {
            let chunk_len = chunk.len() as u64;
            if chunk_len > capacity {
                return Err(SnapshotError::OversizedChunk {
                    chunk: index,
                    len: chunk_len,
                    capacity,
                });
            }
            if index < tail && chunk_len < capacity {
                return Err(SnapshotError::ShortChunk {
                    chunk: index,
                    len: chunk_len,
                    capacity,
                });
            }
            actual = actual.saturating_add(chunk_len);
        }
        if actual != len {
            return Err(SnapshotError::LengthMismatch {
                recorded: len,
                actual,
            });
        }

        Ok(Self {
            strategy,
            indexer: ChunkIndexer::new(capacity),
            len,
            chunks,
        })
    }
}

impl<T> ExaArray2<T> {
    /// Decomposes the array into its portable record. Unallocated rows are
    /// recorded as `None` and stay unallocated after a rebuild.
    pub fn into_snapshot(self) -> Snapshot2<T> {
        let Self { rows, total_len } = self;
        let Snapshot {
            strategy,
            len,
            chunks,
        } = rows.into_snapshot();
        let chunks = chunks
            .into_iter()
            .map(|chunk| {
                chunk
                    .into_iter()
                    .map(|slot| slot.map(ExaArray1::into_snapshot))
                    .collect()
            })
            .collect();
        Snapshot2 {
            len: total_len,
            rows: Snapshot {
                strategy,
                len,
                chunks,
            },
        }
    }

    /// Records the array's state, cloning all cell contents.
    pub fn to_snapshot(&self) -> Snapshot2<T>
    where
        T: Clone,
    {
        self.clone().into_snapshot()
    }

    /// Rebuilds a two-dimensional array, validating every row record, the
    /// row list itself and the recorded element total.
    pub fn from_snapshot(snapshot: Snapshot2<T>) -> Result<Self, SnapshotError> {
        let Snapshot2 { len, rows } = snapshot;
        let Snapshot {
            strategy,
            len: row_count,
            chunks,
        } = rows;

        let mut actual = 0u64;
        let mut rebuilt: Vec<Vec<Option<ExaArray1<T>>>> = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let mut slots = Vec::with_capacity(chunk.len());
            for slot in chunk {
                slots.push(match slot {
                    Some(row) => {
                        let row = ExaArray1::from_snapshot(row)?;
                        actual = actual.saturating_add(row.len());
                        Some(row)
                    }
                    None => None,
                });
            }
            rebuilt.push(slots);
        }

        let rows = ExaArray1::from_snapshot(Snapshot {
            strategy,
            len: row_count,
            chunks: rebuilt,
        })?;
        if actual != len {
            return Err(SnapshotError::TotalMismatch {
                recorded: len,
                actual,
            });
        }
        Ok(Self {
            rows,
            total_len: len,
        })
    }
}
