//! Arrays that keep growing long after a `Vec` would have given up.
//!
//! Storage is spread over fixed-capacity chunks and addressed through a
//! single `u64` index, with an upper bound of roughly `4.6 * 10^18`
//! elements depending on the chosen [`Strategy`]. [`ExaArray1`] is the
//! flat container, [`ExaArray2`] layers lazily allocated rows on top of
//! it, and [`Snapshot`]/[`Snapshot2`] carry array state across process
//! boundaries.
//!
//! Containers are not synchronized. Wrap one in a lock if it has to cross
//! threads.

#![warn(clippy::complexity)]
#![warn(clippy::correctness)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::suspicious)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]

pub mod array1d;
pub mod array2d;
pub mod error;
pub mod index;
mod slice;
pub mod snapshot;
pub mod strategy;

pub use array1d::ExaArray1;
pub use array2d::ExaArray2;
pub use error::{IndexError, RangeError};
pub use snapshot::{Snapshot, Snapshot2, SnapshotError};
pub use strategy::Strategy;
