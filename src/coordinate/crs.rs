//! Coordinate Reference System handling

use std::fmt;

use crate::errors::{ClipError, ClipResult};

/// Identifier for a coordinate reference system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateSystem {
    /// WGS 84 (EPSG:4326)
    WGS84,
    /// Web Mercator (EPSG:3857)
    WebMercator,
    /// UTM Zone (EPSG:326xx for northern hemisphere, 327xx for southern)
    UTM(u8, bool),
    /// Other EPSG code
    Other(u32),
    /// A descriptor that is not an EPSG reference, compared verbatim
    Named(String),
}

impl CoordinateSystem {
    /// EPSG code, if this system has one
    pub fn epsg_code(&self) -> Option<u32> {
        match self {
            CoordinateSystem::WGS84 => Some(4326),
            CoordinateSystem::WebMercator => Some(3857),
            CoordinateSystem::UTM(zone, is_northern) => {
                if *is_northern {
                    Some(32600 + *zone as u32)
                } else {
                    Some(32700 + *zone as u32)
                }
            },
            CoordinateSystem::Other(code) => Some(*code),
            CoordinateSystem::Named(_) => None,
        }
    }

    /// Serialized spatial-reference descriptor (`EPSG:n` where possible)
    pub fn to_crs_name(&self) -> String {
        match (self.epsg_code(), self) {
            (Some(code), _) => format!("EPSG:{}", code),
            (None, CoordinateSystem::Named(name)) => name.clone(),
            (None, _) => String::new(),
        }
    }

    /// Get a description of this coordinate system
    pub fn description(&self) -> String {
        match self {
            CoordinateSystem::WGS84 => "WGS 84 (EPSG:4326)".to_string(),
            CoordinateSystem::WebMercator => "Web Mercator (EPSG:3857)".to_string(),
            CoordinateSystem::UTM(zone, is_northern) => format!(
                "UTM Zone {}{} ({})",
                zone,
                if *is_northern { "N" } else { "S" },
                self.to_crs_name()
            ),
            CoordinateSystem::Other(code) => format!("EPSG:{}", code),
            CoordinateSystem::Named(name) => name.clone(),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Factory for creating coordinate systems
pub struct CoordinateSystemFactory;

impl CoordinateSystemFactory {
    /// Create a coordinate system from an EPSG code
    pub fn from_epsg(epsg: u32) -> CoordinateSystem {
        match epsg {
            4326 => CoordinateSystem::WGS84,
            3857 => CoordinateSystem::WebMercator,
            32601..=32660 => CoordinateSystem::UTM((epsg - 32600) as u8, true),
            32701..=32760 => CoordinateSystem::UTM((epsg - 32700) as u8, false),
            _ => CoordinateSystem::Other(epsg),
        }
    }

    /// Parse a coordinate system descriptor
    ///
    /// Accepts `EPSG:n`, a bare EPSG number, OGC URNs such as
    /// `urn:ogc:def:crs:EPSG::n` and `urn:ogc:def:crs:OGC:1.3:CRS84`.
    /// Other non-empty descriptors are kept verbatim as [`CoordinateSystem::Named`].
    pub fn from_string(crs_str: &str) -> ClipResult<CoordinateSystem> {
        let trimmed = crs_str.trim();
        if trimmed.is_empty() {
            return Err(ClipError::InvalidArgument("Empty CRS descriptor".to_string()));
        }
        let upper = trimmed.to_uppercase();

        if upper.ends_with(":CRS84") || upper == "CRS84" {
            return Ok(CoordinateSystem::WGS84);
        }

        let code = if let Some(code) = upper.strip_prefix("EPSG:") {
            Some(code)
        } else if upper.starts_with("URN:OGC:DEF:CRS:EPSG:") {
            upper.rsplit(':').next()
        } else if upper.chars().all(|c| c.is_ascii_digit()) {
            Some(upper.as_str())
        } else {
            None
        };

        match code {
            Some(code) => code
                .parse::<u32>()
                .map(Self::from_epsg)
                .map_err(|_| ClipError::InvalidArgument(format!("Invalid EPSG code: {}", code))),
            None => Ok(CoordinateSystem::Named(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epsg_variants() {
        assert_eq!(CoordinateSystemFactory::from_string("EPSG:4326").unwrap(), CoordinateSystem::WGS84);
        assert_eq!(CoordinateSystemFactory::from_string("epsg:3857").unwrap(), CoordinateSystem::WebMercator);
        assert_eq!(CoordinateSystemFactory::from_string("32633").unwrap(), CoordinateSystem::UTM(33, true));
        assert_eq!(
            CoordinateSystemFactory::from_string("urn:ogc:def:crs:EPSG::32718").unwrap(),
            CoordinateSystem::UTM(18, false)
        );
        assert_eq!(
            CoordinateSystemFactory::from_string("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap(),
            CoordinateSystem::WGS84
        );
    }

    #[test]
    fn test_named_descriptor_roundtrips_verbatim() {
        let crs = CoordinateSystemFactory::from_string("ESRI:102003").unwrap();
        assert_eq!(crs, CoordinateSystem::Named("ESRI:102003".to_string()));
        assert_eq!(crs.to_crs_name(), "ESRI:102003");
    }

    #[test]
    fn test_invalid_epsg_code() {
        assert!(CoordinateSystemFactory::from_string("EPSG:abc").is_err());
        assert!(CoordinateSystemFactory::from_string("  ").is_err());
    }

    #[test]
    fn test_crs_name() {
        assert_eq!(CoordinateSystem::UTM(33, true).to_crs_name(), "EPSG:32633");
        assert_eq!(CoordinateSystem::Other(2056).to_crs_name(), "EPSG:2056");
    }
}
