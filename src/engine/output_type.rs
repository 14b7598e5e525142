//! Output pixel sample types

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ClipError;

/// Pixel sample type of the output raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputType {
    Byte,
    Int8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
    CInt16,
    CInt32,
    CFloat32,
    CFloat64,
}

impl OutputType {
    pub const ALL: [OutputType; 12] = [
        OutputType::Byte,
        OutputType::Int8,
        OutputType::Int16,
        OutputType::UInt16,
        OutputType::Int32,
        OutputType::UInt32,
        OutputType::Float32,
        OutputType::Float64,
        OutputType::CInt16,
        OutputType::CInt32,
        OutputType::CFloat32,
        OutputType::CFloat64,
    ];

    /// GDAL spelling of the type
    pub fn gdal_name(&self) -> &'static str {
        match self {
            OutputType::Byte => "Byte",
            OutputType::Int8 => "Int8",
            OutputType::Int16 => "Int16",
            OutputType::UInt16 => "UInt16",
            OutputType::Int32 => "Int32",
            OutputType::UInt32 => "UInt32",
            OutputType::Float32 => "Float32",
            OutputType::Float64 => "Float64",
            OutputType::CInt16 => "CInt16",
            OutputType::CInt32 => "CInt32",
            OutputType::CFloat32 => "CFloat32",
            OutputType::CFloat64 => "CFloat64",
        }
    }
}

lazy_static! {
    static ref OUTPUT_TYPES: HashMap<String, OutputType> = OutputType::ALL
        .iter()
        .map(|t| (t.gdal_name().to_lowercase(), *t))
        .collect();
}

impl FromStr for OutputType {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OUTPUT_TYPES
            .get(&s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| ClipError::InvalidOutputType(s.to_string()))
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gdal_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("float32".parse::<OutputType>().unwrap(), OutputType::Float32);
        assert_eq!("CINT16".parse::<OutputType>().unwrap(), OutputType::CInt16);
        assert_eq!(" Byte ".parse::<OutputType>().unwrap(), OutputType::Byte);
    }

    #[test]
    fn test_every_type_roundtrips_through_its_name() {
        for t in OutputType::ALL {
            assert_eq!(t.gdal_name().parse::<OutputType>().unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!("Float16x".parse::<OutputType>(), Err(ClipError::InvalidOutputType(_))));
        assert!(matches!("".parse::<OutputType>(), Err(ClipError::InvalidOutputType(_))));
    }
}
