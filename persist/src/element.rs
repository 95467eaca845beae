//! Fixed-width element codecs for the byte format.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// An element type that can travel through the byte format.
///
/// Implementations write a fixed-width little-endian encoding and read
/// back exactly the bytes they wrote.
pub trait StoreElement: Sized {
    fn write_to(&self, writer: &mut impl Write) -> io::Result<()>;
    fn read_from(reader: &mut impl Read) -> io::Result<Self>;
}

macro_rules! wide_element {
    ($($ty:ty: $write:ident $read:ident),+ $(,)?) => {
        $(
            impl StoreElement for $ty {
                fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
                    writer.$write::<LittleEndian>(*self)
                }

                fn read_from(reader: &mut impl Read) -> io::Result<Self> {
                    reader.$read::<LittleEndian>()
                }
            }
        )+
    };
}

wide_element!(
    u16: write_u16 read_u16,
    u32: write_u32 read_u32,
    u64: write_u64 read_u64,
    u128: write_u128 read_u128,
    i16: write_i16 read_i16,
    i32: write_i32 read_i32,
    i64: write_i64 read_i64,
    i128: write_i128 read_i128,
    f32: write_f32 read_f32,
    f64: write_f64 read_f64,
);

impl StoreElement for u8 {
    fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_u8(*self)
    }

    fn read_from(reader: &mut impl Read) -> io::Result<Self> {
        reader.read_u8()
    }
}

impl StoreElement for i8 {
    fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_i8(*self)
    }

    fn read_from(reader: &mut impl Read) -> io::Result<Self> {
        reader.read_i8()
    }
}

impl StoreElement for bool {
    fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_u8(u8::from(*self))
    }

    fn read_from(reader: &mut impl Read) -> io::Result<Self> {
        Ok(reader.read_u8()? != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T: StoreElement + PartialEq + std::fmt::Debug>(value: T) {
        let mut buf = Vec::new();
        value.write_to(&mut buf).unwrap();
        let mut reader = buf.as_slice();
        assert_eq!(T::read_from(&mut reader).unwrap(), value);
        assert!(reader.is_empty());
    }

    #[test]
    fn codecs_round_trip() {
        round_trip(0xABu8);
        round_trip(-5i8);
        round_trip(0x1234u16);
        round_trip(0x1234_5678u32);
        round_trip(u64::MAX - 1);
        round_trip(1u128 << 100);
        round_trip(-40_000i32);
        round_trip(i64::MIN);
        round_trip(-1i128);
        round_trip(1.5f32);
        round_trip(-0.25f64);
        round_trip(true);
        round_trip(false);
    }

    #[test]
    fn integers_are_little_endian() {
        let mut buf = Vec::new();
        0x1234_5678u32.write_to(&mut buf).unwrap();
        assert_eq!(buf, vec![0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn any_nonzero_byte_reads_as_true() {
        let buf = [2u8];
        let mut reader = buf.as_slice();
        assert!(bool::read_from(&mut reader).unwrap());
    }
}
