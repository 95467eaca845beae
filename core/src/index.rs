use derive_more::Constructor;
use get_size::GetSize;

/// Location of one logical element inside the chunk sequence.
#[derive(Constructor, Debug, Clone, Copy, PartialEq, Eq, GetSize)]
pub struct ChunkPos {
    pub chunk: u64,
    pub offset: u64,
}

/// Maps 64-bit logical indices onto [`ChunkPos`] pairs for a fixed chunk
/// capacity. Pure arithmetic, holds no state beyond the capacity itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, GetSize)]
pub struct ChunkIndexer {
    capacity: u64,
}

impl ChunkIndexer {
    /// `capacity` must be non-zero.
    pub const fn new(capacity: u64) -> Self {
        Self { capacity }
    }

    pub const fn capacity(self) -> u64 {
        self.capacity
    }

    /// Splits a logical index into its chunk number and in-chunk offset.
    pub const fn split(self, index: u64) -> ChunkPos {
        let chunk = index / self.capacity;
        ChunkPos {
            chunk,
            offset: index - chunk * self.capacity,
        }
    }

    /// Inverse of [`split`](Self::split) for positions within the
    /// addressable range.
    pub const fn compose(self, pos: ChunkPos) -> u64 {
        pos.chunk * self.capacity + pos.offset
    }

    /// Number of chunks needed to hold `len` elements. An empty array
    /// still keeps one (empty) chunk around.
    pub const fn chunks_for(self, len: u64) -> u64 {
        if len == 0 {
            1
        } else {
            (len - 1) / self.capacity + 1
        }
    }
}
