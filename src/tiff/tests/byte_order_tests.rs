//! Tests for byte order detection and inline decoding

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};

#[test]
fn test_byte_order_detection_little_endian() {
    let mut cursor = Cursor::new(b"II".to_vec());
    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::LittleEndian);
}

#[test]
fn test_byte_order_detection_big_endian() {
    let mut cursor = Cursor::new(b"MM".to_vec());
    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    let mut cursor = Cursor::new(buffer);
    assert!(ByteOrder::detect(&mut cursor).is_err());
}

#[test]
fn test_inline_short_uses_leading_bytes() {
    let mut le = Vec::new();
    le.write_u16::<LittleEndian>(4326).unwrap();
    le.resize(8, 0);
    let mut be = Vec::new();
    be.write_u16::<BigEndian>(4326).unwrap();
    be.resize(8, 0);

    let le_raw: [u8; 8] = le.try_into().unwrap();
    let be_raw: [u8; 8] = be.try_into().unwrap();
    assert_eq!(LittleEndianHandler::new().inline_u16(&le_raw).unwrap(), 4326);
    assert_eq!(BigEndianHandler::new().inline_u16(&be_raw).unwrap(), 4326);
}
