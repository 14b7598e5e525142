//! Seekable reader trait

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
///
/// Lets the header reader accept files, buffered files and in-memory
/// cursors through one `&mut dyn` parameter.
pub trait SeekableReader: Read + Seek {}

impl<T: Read + Seek> SeekableReader for T {}
