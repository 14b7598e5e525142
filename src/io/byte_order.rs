//! Byte order handling for TIFF headers
//!
//! Strategy pattern for reading little-endian (`II`) and big-endian (`MM`)
//! TIFF structures through a single interface.

use byteorder::{BigEndian, ByteOrder as Endianness, LittleEndian, ReadBytesExt};
use std::io::{Cursor, Result};
use std::marker::PhantomData;

use crate::errors::{ClipError, ClipResult};
use crate::io::seekable::SeekableReader;

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the first two bytes of a TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> ClipResult<Self> {
        let marker = reader.read_u16::<LittleEndian>()?;
        match marker {
            0x4949 => Ok(ByteOrder::LittleEndian),
            0x4D4D => Ok(ByteOrder::BigEndian),
            _ => Err(ClipError::InvalidRaster(format!("invalid byte order marker {:#06x}", marker))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "II",
            ByteOrder::BigEndian => "MM",
        }
    }

    /// Creates the handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler::new()),
            ByteOrder::BigEndian => Box::new(BigEndianHandler::new()),
        }
    }
}

/// Reads TIFF scalars in a fixed byte order
pub trait ByteOrderHandler {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;

    /// Decode a u16 stored inline in an IFD entry value field
    fn inline_u16(&self, raw: &[u8; 8]) -> Result<u16> {
        self.read_u16(&mut Cursor::new(&raw[..]))
    }

    /// Decode a u32 stored inline in an IFD entry value field
    fn inline_u32(&self, raw: &[u8; 8]) -> Result<u32> {
        self.read_u32(&mut Cursor::new(&raw[..]))
    }

    /// Decode a u64 stored inline in a BigTIFF IFD entry value field
    fn inline_u64(&self, raw: &[u8; 8]) -> Result<u64> {
        self.read_u64(&mut Cursor::new(&raw[..]))
    }
}

/// Handler reading through one `byteorder` endianness
#[derive(Debug)]
pub struct EndianHandler<E> {
    endian: PhantomData<E>,
}

impl<E> EndianHandler<E> {
    pub const fn new() -> Self {
        EndianHandler { endian: PhantomData }
    }
}

impl<E> Default for EndianHandler<E> {
    fn default() -> Self {
        EndianHandler::new()
    }
}

pub type LittleEndianHandler = EndianHandler<LittleEndian>;
pub type BigEndianHandler = EndianHandler<BigEndian>;

impl<E: Endianness> ByteOrderHandler for EndianHandler<E> {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<E>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<E>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<E>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<E>()
    }
}
