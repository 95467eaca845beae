use thiserror::Error;

/// Rejected growth. The container is left untouched when one of these is
/// returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// Growing by `by` would take the length to or past the strategy's
    /// upper bound. The bound is exclusive, `len + by == max` is already
    /// out.
    #[error("cannot grow by {by}: length {len} would reach the limit of {max} elements")]
    CapacityExceeded { len: u64, by: u64, max: u64 },

    /// Growing one row by `by` would push the element total across all
    /// rows past `max`.
    #[error("cannot grow a row by {by}: the total across all rows would exceed {max} elements")]
    TotalCapacityExceeded { by: u64, max: u64 },
}

/// Rejected element access.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// The index can never be valid under the array's strategy.
    #[error("index {index} is beyond the addressable maximum of {max}")]
    OutOfRange { index: u64, max: u64 },

    /// The index is addressable but lies past the grown length.
    #[error("index {index} has not been allocated, the current length is {len}")]
    Unallocated { index: u64, len: u64 },

    /// A range was given with its end before its start.
    #[error("range end {to} lies before range start {from}")]
    InvertedRange { from: u64, to: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = RangeError::CapacityExceeded {
            len: 10,
            by: 5,
            max: 12,
        };
        assert_eq!(
            err.to_string(),
            "cannot grow by 5: length 10 would reach the limit of 12 elements"
        );

        let err = IndexError::Unallocated { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "index 7 has not been allocated, the current length is 3"
        );
    }
}
