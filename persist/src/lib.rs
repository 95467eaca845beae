//! Byte-stream persistence for exa arrays.
//!
//! Format "v1" is a little-endian dump of an array's snapshot record
//! behind a length-prefixed version tag:
//!
//! ```text
//! u32    version tag length, then that many UTF-8 bytes ("v1")
//! u8     strategy, 1 for MaxPerformance and 2 for MaxElements
//! u64    logical length
//! u64    chunk count
//! per chunk:
//!   u64  element count, then the fixed-width elements
//! ```
//!
//! A two-dimensional stream carries the overall element total right after
//! the version tag, then the row list in the same layout with every slot
//! led by a marker byte, 0 for an absent row and 1 for a present row
//! followed by that row's body.
//!
//! The encoding carries no compression, no integrity check and no
//! authenticity check. Only restore streams you trust, such as local
//! checkpoints this crate wrote itself. Streams are borrowed, written or
//! read to completion and never closed; flushing is the caller's
//! business.

#![warn(clippy::complexity)]
#![warn(clippy::correctness)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::suspicious)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]

mod element;

pub use element::StoreElement;

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;
use tracing::instrument;

use exa_array_core::{ExaArray1, ExaArray2, Snapshot, Snapshot2, SnapshotError, Strategy};

const VERSION_TAG: &str = "v1";

const ROW_ABSENT: u8 = 0;
const ROW_PRESENT: u8 = 1;

/// Failures while rebuilding an array from a byte stream.
#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("IO error {0}")]
    Io(#[from] io::Error),

    #[error("version tag is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unsupported format version {0:?}")]
    UnsupportedVersion(String),

    #[error("unknown strategy tag {0}")]
    UnknownStrategy(u8),

    #[error("unknown row marker {0}")]
    UnknownRowMarker(u8),

    #[error("defective array record in stream: {0}")]
    Invalid(#[from] SnapshotError),
}

/// Writes a one-dimensional array to `writer` in format v1.
#[instrument(skip(array, writer), fields(len = array.len()))]
pub fn store<T, W>(array: &ExaArray1<T>, writer: &mut W) -> io::Result<()>
where
    T: StoreElement,
    W: Write,
{
    write_tag(writer)?;
    write_array(array, writer)
}

/// Reads a one-dimensional array back from a v1 stream.
///
/// The stream only carries a claim about the chunk geometry. The claim is
/// re-validated before an array is handed back, so a tampered or
/// truncated stream fails instead of yielding a defective container.
#[instrument(skip(reader))]
pub fn restore<T, R>(reader: &mut R) -> Result<ExaArray1<T>, RestoreError>
where
    T: StoreElement,
    R: Read,
{
    read_tag(reader)?;
    Ok(ExaArray1::from_snapshot(read_snapshot(reader)?)?)
}

/// Writes a two-dimensional array to `writer` in format v1. An
/// unallocated row costs a single marker byte.
#[instrument(skip(array, writer), fields(len = array.len()))]
pub fn store2<T, W>(array: &ExaArray2<T>, writer: &mut W) -> io::Result<()>
where
    T: StoreElement,
    W: Write,
{
    write_tag(writer)?;
    writer.write_u64::<LittleEndian>(array.len())?;

    let rows = array.rows();
    writer.write_u8(strategy_tag(rows.strategy()))?;
    writer.write_u64::<LittleEndian>(rows.len())?;
    writer.write_u64::<LittleEndian>(rows.chunk_count() as u64)?;
    for chunk in rows.chunks() {
        writer.write_u64::<LittleEndian>(chunk.len() as u64)?;
        for slot in chunk {
            match slot {
                Some(cells) => {
                    writer.write_u8(ROW_PRESENT)?;
                    write_array(cells, writer)?;
                }
                None => writer.write_u8(ROW_ABSENT)?,
            }
        }
    }
    Ok(())
}

/// Reads a two-dimensional array back from a v1 stream, with the same
/// validation as [`restore`].
#[instrument(skip(reader))]
pub fn restore2<T, R>(reader: &mut R) -> Result<ExaArray2<T>, RestoreError>
where
    T: StoreElement,
    R: Read,
{
    read_tag(reader)?;
    let len = reader.read_u64::<LittleEndian>()?;

    let strategy = strategy_from_tag(reader.read_u8()?)?;
    let row_count = reader.read_u64::<LittleEndian>()?;
    let chunk_count = reader.read_u64::<LittleEndian>()?;
    let mut chunks = Vec::with_capacity(chunk_count as usize);
    for _ in 0..chunk_count {
        let chunk_len = reader.read_u64::<LittleEndian>()?;
        let mut chunk = Vec::with_capacity(chunk_len as usize);
        for _ in 0..chunk_len {
            chunk.push(match reader.read_u8()? {
                ROW_ABSENT => None,
                ROW_PRESENT => Some(read_snapshot(reader)?),
                other => return Err(RestoreError::UnknownRowMarker(other)),
            });
        }
        chunks.push(chunk);
    }

    let snapshot = Snapshot2 {
        len,
        rows: Snapshot {
            strategy,
            len: row_count,
            chunks,
        },
    };
    Ok(ExaArray2::from_snapshot(snapshot)?)
}

fn strategy_tag(strategy: Strategy) -> u8 {
    match strategy {
        Strategy::MaxPerformance => 1,
        Strategy::MaxElements => 2,
    }
}

fn strategy_from_tag(tag: u8) -> Result<Strategy, RestoreError> {
    match tag {
        1 => Ok(Strategy::MaxPerformance),
        2 => Ok(Strategy::MaxElements),
        other => Err(RestoreError::UnknownStrategy(other)),
    }
}

fn write_tag(writer: &mut impl Write) -> io::Result<()> {
    writer.write_u32::<LittleEndian>(VERSION_TAG.len() as u32)?;
    writer.write_all(VERSION_TAG.as_bytes())
}

fn read_tag(reader: &mut impl Read) -> Result<(), RestoreError> {
    let len = reader.read_u32::<LittleEndian>()? as usize;
    let mut buf = vec![0; len];
    reader.read_exact(&mut buf)?;
    let version = String::from_utf8(buf)?;
    if version != VERSION_TAG {
        return Err(RestoreError::UnsupportedVersion(version));
    }
    Ok(())
}

fn write_array<T: StoreElement>(array: &ExaArray1<T>, writer: &mut impl Write) -> io::Result<()> {
    writer.write_u8(strategy_tag(array.strategy()))?;
    writer.write_u64::<LittleEndian>(array.len())?;
    writer.write_u64::<LittleEndian>(array.chunk_count() as u64)?;
    for chunk in array.chunks() {
        writer.write_u64::<LittleEndian>(chunk.len() as u64)?;
        for element in chunk {
            element.write_to(writer)?;
        }
    }
    Ok(())
}

fn read_snapshot<T: StoreElement>(reader: &mut impl Read) -> Result<Snapshot<T>, RestoreError> {
    let strategy = strategy_from_tag(reader.read_u8()?)?;
    let len = reader.read_u64::<LittleEndian>()?;
    let chunk_count = reader.read_u64::<LittleEndian>()?;
    let mut chunks = Vec::with_capacity(chunk_count as usize);
    for _ in 0..chunk_count {
        let chunk_len = reader.read_u64::<LittleEndian>()?;
        let mut chunk = Vec::with_capacity(chunk_len as usize);
        for _ in 0..chunk_len {
            chunk.push(T::read_from(reader)?);
        }
        chunks.push(chunk);
    }
    Ok(Snapshot {
        strategy,
        len,
        chunks,
    })
}
