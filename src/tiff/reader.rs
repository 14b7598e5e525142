//! TIFF/BigTIFF header reader
//!
//! Reads just enough of a TIFF file to reach the first IFD and decode the
//! values of selected tags. Pixel data is never touched.

use log::debug;
use std::io::{Cursor, Read, SeekFrom};

use crate::errors::{ClipError, ClipResult};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_types, header};
use crate::tiff::ifd::{Ifd, IfdEntry};

/// Upper bound on entries in one IFD, guards against corrupt counts
const MAX_IFD_ENTRIES: u64 = 4096;

/// Reader bound to one file's byte order and TIFF flavour
pub struct TiffHeaderReader {
    handler: Box<dyn ByteOrderHandler>,
    byte_order: ByteOrder,
    is_big_tiff: bool,
}

impl TiffHeaderReader {
    /// Parse the TIFF header and the first IFD
    ///
    /// # Arguments
    /// * `reader` - Reader positioned anywhere; it is rewound to the start
    ///
    /// # Returns
    /// The bound header reader together with the first IFD
    pub fn open(reader: &mut dyn SeekableReader) -> ClipResult<(Self, Ifd)> {
        reader.seek(SeekFrom::Start(0))?;
        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        let handler = byte_order.create_handler();

        let version = handler.read_u16(reader)?;
        let (is_big_tiff, first_ifd_offset) = match version {
            header::TIFF_VERSION => (false, handler.read_u32(reader)? as u64),
            header::BIG_TIFF_VERSION => {
                let offset_size = handler.read_u16(reader)?;
                let reserved = handler.read_u16(reader)?;
                if offset_size != header::BIGTIFF_OFFSET_SIZE || reserved != 0 {
                    return Err(ClipError::InvalidRaster("invalid BigTIFF header".to_string()));
                }
                (true, handler.read_u64(reader)?)
            },
            _ => return Err(ClipError::InvalidRaster(format!("unsupported TIFF version {}", version))),
        };
        debug!("TIFF version {}, first IFD at offset {}", version, first_ifd_offset);

        if first_ifd_offset == 0 {
            return Err(ClipError::InvalidRaster("TIFF file has no image directory".to_string()));
        }

        let header_reader = TiffHeaderReader { handler, byte_order, is_big_tiff };
        let ifd = header_reader.read_ifd(reader, first_ifd_offset)?;
        Ok((header_reader, ifd))
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64) -> ClipResult<Ifd> {
        reader.seek(SeekFrom::Start(offset))?;
        let entry_count = if self.is_big_tiff {
            self.handler.read_u64(reader)?
        } else {
            self.handler.read_u16(reader)? as u64
        };

        if entry_count > MAX_IFD_ENTRIES {
            return Err(ClipError::InvalidRaster(format!("implausible IFD entry count {}", entry_count)));
        }

        let mut ifd = Ifd::new(offset);
        for _ in 0..entry_count {
            let tag = self.handler.read_u16(reader)?;
            let field_type = self.handler.read_u16(reader)?;
            let count = if self.is_big_tiff {
                self.handler.read_u64(reader)?
            } else {
                self.handler.read_u32(reader)? as u64
            };

            let mut value = [0u8; 8];
            let width = if self.is_big_tiff { 8 } else { 4 };
            reader.read_exact(&mut value[..width])?;

            ifd.add_entry(IfdEntry::new(tag, field_type, count, value));
        }

        debug!("Read IFD at offset {} with {} entries", offset, ifd.entry_count());
        Ok(ifd)
    }

    /// Position a reader at an entry's values, inline or at their offset
    fn value_reader<'r>(
        &self,
        reader: &'r mut dyn SeekableReader,
        entry: &IfdEntry,
    ) -> ClipResult<Box<dyn SeekableReader + 'r>> {
        if entry.is_value_inline(self.is_big_tiff) {
            return Ok(Box::new(Cursor::new(entry.value)));
        }

        let offset = if self.is_big_tiff {
            self.handler.inline_u64(&entry.value)?
        } else {
            self.handler.inline_u32(&entry.value)? as u64
        };
        reader.seek(SeekFrom::Start(offset))?;
        Ok(Box::new(reader))
    }

    /// Read a single unsigned integer (SHORT, LONG or LONG8)
    pub fn read_unsigned(&self, reader: &mut dyn SeekableReader, entry: &IfdEntry) -> ClipResult<u64> {
        if entry.count == 0 {
            return Err(ClipError::InvalidRaster(format!("tag {} has no value", entry.tag)));
        }
        let mut values = self.value_reader(reader, entry)?;
        let value = match entry.field_type {
            field_types::SHORT => self.handler.read_u16(&mut values)? as u64,
            field_types::LONG => self.handler.read_u32(&mut values)? as u64,
            field_types::LONG8 => self.handler.read_u64(&mut values)?,
            other => {
                return Err(ClipError::InvalidRaster(format!(
                    "tag {} has non-integer field type {}", entry.tag, other
                )))
            }
        };
        Ok(value)
    }

    /// Read all values of a DOUBLE entry
    pub fn read_doubles(&self, reader: &mut dyn SeekableReader, entry: &IfdEntry) -> ClipResult<Vec<f64>> {
        if entry.field_type != field_types::DOUBLE {
            return Err(ClipError::InvalidRaster(format!(
                "tag {} expected DOUBLE values, found field type {}", entry.tag, entry.field_type
            )));
        }
        let mut values = self.value_reader(reader, entry)?;
        (0..entry.count)
            .map(|_| self.handler.read_f64(&mut values).map_err(ClipError::from))
            .collect()
    }

    /// Read all values of a SHORT entry
    pub fn read_shorts(&self, reader: &mut dyn SeekableReader, entry: &IfdEntry) -> ClipResult<Vec<u16>> {
        if entry.field_type != field_types::SHORT {
            return Err(ClipError::InvalidRaster(format!(
                "tag {} expected SHORT values, found field type {}", entry.tag, entry.field_type
            )));
        }
        let mut values = self.value_reader(reader, entry)?;
        (0..entry.count)
            .map(|_| self.handler.read_u16(&mut values).map_err(ClipError::from))
            .collect()
    }
}
