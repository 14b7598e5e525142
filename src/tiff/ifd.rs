//! Image File Directory (IFD) structures
//!
//! Entries keep their raw value field so inline values can be decoded with
//! the file's byte order once the field type is known.

use std::collections::HashMap;
use log::trace;

use crate::tiff::constants::field_types;

/// An entry in an Image File Directory
#[derive(Debug, Clone, PartialEq)]
pub struct IfdEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Raw value field: 4 significant bytes for TIFF, 8 for BigTIFF
    pub value: [u8; 8],
}

impl IfdEntry {
    pub fn new(tag: u16, field_type: u16, count: u64, value: [u8; 8]) -> Self {
        IfdEntry { tag, field_type, count, value }
    }

    /// Size in bytes of one value of this entry's type
    pub fn field_type_size(&self) -> usize {
        match self.field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
            _ => 1,
        }
    }

    /// Whether the values fit inside the entry's value field
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let total_size = self.field_type_size() as u64 * self.count;
        let inline_size = if is_big_tiff { 8 } else { 4 };
        total_size <= inline_size
    }
}

/// The first Image File Directory of a TIFF file
#[derive(Debug, Clone, Default)]
pub struct Ifd {
    /// Offset of this IFD in the file
    pub offset: u64,
    entries: HashMap<u16, IfdEntry>,
}

impl Ifd {
    pub fn new(offset: u64) -> Self {
        Ifd { offset, entries: HashMap::new() }
    }

    pub fn add_entry(&mut self, entry: IfdEntry) {
        trace!("IFD entry: tag={}, type={}, count={}", entry.tag, entry.field_type, entry.count);
        self.entries.insert(entry.tag, entry);
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IfdEntry> {
        self.entries.get(&tag)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
