use get_size::GetSize;

use crate::array1d::ExaArray1;
use crate::error::RangeError;
use crate::strategy::Strategy;

/// A two-dimensional array of independently grown rows, tracking the total
/// element count across all rows in constant time.
///
/// The row list and every row are chunked arrays themselves, so both
/// dimensions reach into the quintillions. Rows come into existence
/// lazily: writing to row 7 allocates nothing for rows 0 through 6, and
/// reading any cell that was never written yields `T::default()` without
/// allocating.
#[derive(Debug, Clone, PartialEq, Eq, GetSize)]
pub struct ExaArray2<T> {
    pub(crate) rows: ExaArray1<Option<ExaArray1<T>>>,
    pub(crate) total_len: u64,
}

impl<T> ExaArray2<T> {
    /// Upper bound on the total element count across all rows.
    pub const MAX_TOTAL_ELEMENTS: u64 = u64::MAX;

    /// Total number of elements across all rows. Constant time.
    pub fn len(&self) -> u64 {
        self.total_len
    }

    pub fn is_empty(&self) -> bool {
        self.total_len == 0
    }

    /// The row list itself: a chunked array of lazily allocated rows.
    pub fn rows(&self) -> &ExaArray1<Option<ExaArray1<T>>> {
        &self.rows
    }
}

impl<T: Default + Clone> ExaArray2<T> {
    pub fn new() -> Self {
        Self {
            rows: ExaArray1::with_strategy(Strategy::MaxPerformance),
            total_len: 0,
        }
    }

    /// Reads the cell at `(row, col)`. Cells outside the grown extent,
    /// including entire rows that were never written, read as
    /// `T::default()`. Reading never allocates.
    pub fn get(&self, row: u64, col: u64) -> T {
        match self.rows.get(row) {
            Ok(Some(cells)) => match cells.get(col) {
                Ok(value) => value.clone(),
                Err(_) => T::default(),
            },
            _ => T::default(),
        }
    }

    /// Writes `value` at `(row, col)`, growing the row list and the
    /// addressed row as needed.
    ///
    /// Only the addressed row is materialized, intermediate rows stay
    /// unallocated. Fails with [`RangeError::CapacityExceeded`] when the
    /// addressed row cannot hold `col`, and with
    /// [`RangeError::TotalCapacityExceeded`] when the grown cells would
    /// push the overall total past
    /// [`MAX_TOTAL_ELEMENTS`](Self::MAX_TOTAL_ELEMENTS). A rejected write
    /// leaves every cell untouched, though the row list may already have
    /// been lengthened and the addressed row slot filled with an empty
    /// row.
    pub fn set(&mut self, row: u64, col: u64, value: T) -> Result<(), RangeError> {
        if row >= self.rows.len() {
            let by = row.saturating_sub(self.rows.len()).saturating_add(1);
            self.rows.grow(by)?;
        }
        let cells = self.rows[row].get_or_insert_with(ExaArray1::new);

        if col >= cells.len() {
            let by = col.saturating_sub(cells.len()).saturating_add(1);
            if by > Self::MAX_TOTAL_ELEMENTS - self.total_len {
                return Err(RangeError::TotalCapacityExceeded {
                    by,
                    max: Self::MAX_TOTAL_ELEMENTS,
                });
            }
            cells.grow(by)?;
            self.total_len += by;
        }
        cells[col] = value;
        Ok(())
    }
}

impl<T: Default + Clone> Default for ExaArray2<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_array_reads_defaults_everywhere() {
        let array: ExaArray2<u32> = ExaArray2::new();
        assert_eq!(array.len(), 0);
        assert!(array.is_empty());
        assert_eq!(array.get(0, 0), 0);
        assert_eq!(array.get(1_000_000, 1_000_000), 0);
        // Reading never allocates.
        assert_eq!(array.len(), 0);
        assert_eq!(array.rows().len(), 0);
    }

    #[test]
    fn writing_grows_the_addressed_row_only() {
        let mut array: ExaArray2<u32> = ExaArray2::new();
        array.set(500, 500, 4756).unwrap();

        assert_eq!(array.len(), 501);
        assert_eq!(array.get(500, 500), 4756);
        assert_eq!(array.get(500, 0), 0);
        // Rows before the written one stay unallocated but readable.
        assert_eq!(array.get(499, 0), 0);
        assert_eq!(array.get(0, 0), 0);
    }

    #[test]
    fn overwriting_does_not_change_the_total() {
        let mut array: ExaArray2<u32> = ExaArray2::new();
        array.set(500, 500, 4756).unwrap();
        array.set(500, 500, 4757).unwrap();
        assert_eq!(array.len(), 501);
        assert_eq!(array.get(500, 500), 4757);

        // Writing below the row's length does not grow either.
        array.set(500, 499, 48).unwrap();
        assert_eq!(array.len(), 501);
        assert_eq!(array.get(500, 499), 48);
    }

    #[test]
    fn extending_an_existing_row() {
        let mut array: ExaArray2<u32> = ExaArray2::new();
        array.set(500, 500, 4757).unwrap();
        array.set(500, 1000, 6).unwrap();

        assert_eq!(array.len(), 1001);
        assert_eq!(array.get(500, 1000), 6);
        assert_eq!(array.get(500, 500), 4757);
        assert_eq!(array.get(500, 999), 0);
    }

    #[test]
    fn rows_grow_independently() {
        let mut array: ExaArray2<u64> = ExaArray2::new();
        array.set(0, 2, 10).unwrap();
        assert_eq!(array.len(), 3);

        array.set(3, 0, 20).unwrap();
        assert_eq!(array.len(), 4);

        assert_eq!(array.get(0, 2), 10);
        assert_eq!(array.get(3, 0), 20);
        // Rows 1 and 2 exist as slots but hold no cells.
        assert_eq!(array.get(1, 0), 0);
        assert_eq!(array.get(2, 0), 0);
    }

    #[test]
    fn the_total_bound_is_enforced() {
        let mut array: ExaArray2<u32> = ExaArray2::new();
        array.set(0, 1_000_000, 47).unwrap();
        assert_eq!(array.len(), 1_000_001);

        let err = array.set(1, u64::MAX - 1, 6);
        assert_eq!(
            err,
            Err(RangeError::TotalCapacityExceeded {
                by: u64::MAX,
                max: u64::MAX,
            })
        );
        // The failed write allocated no cells.
        assert_eq!(array.len(), 1_000_001);
        assert_eq!(array.get(1, 0), 0);
    }

    #[test]
    fn the_per_row_bound_is_enforced() {
        let row_max = Strategy::MaxPerformance.max_elements();
        let mut array: ExaArray2<u8> = ExaArray2::new();

        assert!(matches!(
            array.set(0, row_max, 1),
            Err(RangeError::CapacityExceeded { .. })
        ));
        assert!(matches!(
            array.set(0, u64::MAX, 1),
            Err(RangeError::CapacityExceeded { .. })
        ));
        assert_eq!(array.len(), 0);
    }
}
