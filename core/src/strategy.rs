use get_size::GetSize;
use serde::{Deserialize, Serialize};

/// Chunk sizing policy of an array. Chosen at construction time and fixed
/// for the lifetime of the container.
///
/// The policy trades top-end capacity against index arithmetic cost: every
/// element access splits a logical index into a chunk number and an offset,
/// so the chunk capacity decides whether that split is a power-of-two
/// operation or a full integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, GetSize)]
pub enum Strategy {
    /// Chunks of `2^30` elements. Splitting an index degenerates into cheap
    /// bit operations, at the cost of a lower overall capacity. This is the
    /// default.
    MaxPerformance,

    /// The largest chunks a single backing buffer can be pushed to, for an
    /// overall capacity of roughly `4.6 * 10^18` elements. Every element
    /// access pays for a full 64-bit division.
    MaxElements,
}

const CAPACITY_PERFORMANCE: u64 = 1_073_741_824;
const CAPACITY_ELEMENTS: u64 = 2_146_435_071;

const MAX_PERFORMANCE: u64 = 1_152_921_504_606_850_000;
const MAX_ELEMENTS: u64 = 4_607_183_514_018_780_000;

impl Strategy {
    /// Number of elements a single chunk holds when full.
    pub const fn chunk_capacity(self) -> u64 {
        match self {
            Strategy::MaxPerformance => CAPACITY_PERFORMANCE,
            Strategy::MaxElements => CAPACITY_ELEMENTS,
        }
    }

    /// Upper bound on the total element count under this policy.
    ///
    /// The bound is exclusive: growth stops one element short of it, so a
    /// container never reaches this length exactly.
    pub const fn max_elements(self) -> u64 {
        match self {
            Strategy::MaxPerformance => MAX_PERFORMANCE,
            Strategy::MaxElements => MAX_ELEMENTS,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::MaxPerformance
    }
}
