//! Vector features and feature collections
//!
//! Features are read from GeoJSON. Only polygonal geometry is kept; other
//! geometry types become null geometries and are skipped downstream.

use geo::{BoundingRect, Geometry, MultiPolygon, Polygon};
use geojson::{GeoJson, JsonObject};
use log::{debug, warn};
use serde_json::{json, Value as JsonValue};

use crate::coordinate::{BoundingRectangle, CoordinateSystem, CoordinateSystemFactory};
use crate::errors::{ClipError, ClipResult};

/// A single vector feature
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Position of the feature in its source collection
    pub index: usize,
    /// Polygonal geometry, `None` for null or non-polygonal geometries
    pub geometry: Option<MultiPolygon<f64>>,
    /// Attribute values
    pub properties: JsonObject,
    /// Coordinate system the geometry is expressed in
    pub crs: Option<CoordinateSystem>,
}

impl Feature {
    pub fn new(index: usize, geometry: Option<MultiPolygon<f64>>) -> Self {
        Feature {
            index,
            geometry,
            properties: JsonObject::new(),
            crs: None,
        }
    }

    pub fn with_property(mut self, name: &str, value: JsonValue) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    pub fn with_crs(mut self, crs: Option<CoordinateSystem>) -> Self {
        self.crs = crs;
        self
    }

    /// Envelope of the feature's geometry
    pub fn envelope(&self) -> Option<BoundingRectangle> {
        self.geometry
            .as_ref()
            .and_then(|geometry| geometry.bounding_rect())
            .map(BoundingRectangle::from)
    }

    /// Attribute value, field names compared case-insensitively as OGR does
    pub fn property(&self, name: &str) -> Option<&JsonValue> {
        self.properties.get(name).or_else(|| {
            self.properties
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
    }
}

/// An ordered collection of features forming one layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    /// Layer name, used by `SELECT ... FROM <layer>` queries
    pub name: Option<String>,
    /// Collection-level coordinate system
    pub crs: Option<CoordinateSystem>,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(name: Option<String>, crs: Option<CoordinateSystem>, features: Vec<Feature>) -> Self {
        FeatureCollection { name, crs, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Parse a GeoJSON document
    ///
    /// A bare Feature or Geometry document becomes a single-feature
    /// collection. Features without a `crs` member inherit the collection's.
    pub fn from_geojson(text: &str) -> ClipResult<Self> {
        let document = text
            .parse::<GeoJson>()
            .map_err(|e| ClipError::InvalidArgument(format!("Invalid GeoJSON: {}", e)))?;

        let (raw_features, foreign_members) = match document {
            GeoJson::FeatureCollection(collection) => (collection.features, collection.foreign_members),
            GeoJson::Feature(feature) => (vec![feature], None),
            GeoJson::Geometry(geometry) => (
                vec![geojson::Feature {
                    bbox: None,
                    geometry: Some(geometry),
                    id: None,
                    properties: None,
                    foreign_members: None,
                }],
                None,
            ),
        };

        let collection_crs = foreign_members.as_ref().and_then(crs_member);
        let name = foreign_members
            .as_ref()
            .and_then(|members| members.get("name"))
            .and_then(|name| name.as_str())
            .map(str::to_string);

        let features = raw_features
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let crs = raw.foreign_members.as_ref().and_then(crs_member).or_else(|| collection_crs.clone());
                let geometry = raw.geometry.and_then(|geometry| match Geometry::<f64>::try_from(geometry.value) {
                    Ok(geometry) => polygonal(geometry),
                    Err(e) => {
                        warn!("Feature {} has an unreadable geometry: {}", index, e);
                        None
                    }
                });
                Feature {
                    index,
                    geometry,
                    properties: raw.properties.unwrap_or_default(),
                    crs,
                }
            })
            .collect::<Vec<_>>();

        debug!("Parsed {} features (layer {:?})", features.len(), name);
        Ok(FeatureCollection::new(name, collection_crs, features))
    }

    /// Declare a coordinate system for the layer, keeping the current one when `crs` is `None`
    pub fn with_crs(mut self, crs: Option<CoordinateSystem>) -> Self {
        if crs.is_some() {
            self.crs = crs;
        }
        self
    }

    /// Serialize to a GeoJSON FeatureCollection with a legacy `crs` member
    pub fn to_geojson(&self) -> geojson::FeatureCollection {
        let features = self
            .features
            .iter()
            .map(|feature| geojson::Feature {
                bbox: None,
                geometry: feature
                    .geometry
                    .as_ref()
                    .map(|geometry| geojson::Geometry::new(geojson::Value::from(geometry))),
                id: None,
                properties: Some(feature.properties.clone()),
                foreign_members: None,
            })
            .collect();

        let mut members = JsonObject::new();
        if let Some(name) = &self.name {
            members.insert("name".to_string(), json!(name));
        }
        if let Some(crs) = &self.crs {
            members.insert(
                "crs".to_string(),
                json!({ "type": "name", "properties": { "name": crs.to_crs_name() } }),
            );
        }

        geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: if members.is_empty() { None } else { Some(members) },
        }
    }
}

/// Read a legacy `crs` member (`name` or `EPSG` flavour)
fn crs_member(members: &JsonObject) -> Option<CoordinateSystem> {
    let crs = members.get("crs")?;
    let properties = crs.get("properties")?;
    let descriptor = match (properties.get("name"), properties.get("code")) {
        (Some(JsonValue::String(name)), _) => name.clone(),
        (_, Some(code)) => code.to_string(),
        _ => return None,
    };

    match CoordinateSystemFactory::from_string(&descriptor) {
        Ok(crs) => Some(crs),
        Err(e) => {
            warn!("Ignoring unreadable crs member {}: {}", descriptor, e);
            None
        }
    }
}

/// Polygonal part of a geometry, `None` when there is none
fn polygonal(geometry: Geometry<f64>) -> Option<MultiPolygon<f64>> {
    let polygons: Vec<Polygon<f64>> = match geometry {
        Geometry::Polygon(polygon) => vec![polygon],
        Geometry::MultiPolygon(multi) => multi.0,
        Geometry::Rect(rect) => vec![rect.to_polygon()],
        Geometry::GeometryCollection(collection) => collection
            .0
            .into_iter()
            .filter_map(polygonal)
            .flat_map(|multi| multi.0)
            .collect(),
        _ => Vec::new(),
    };

    if polygons.is_empty() {
        None
    } else {
        Some(MultiPolygon::new(polygons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "name": "parcels",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::32633" } },
        "features": [
            { "type": "Feature", "properties": { "id": 1 },
              "geometry": { "type": "Polygon", "coordinates": [[[2,2],[4,2],[4,4],[2,4],[2,2]]] } },
            { "type": "Feature", "properties": { "id": 2 },
              "geometry": { "type": "Point", "coordinates": [1, 1] } },
            { "type": "Feature", "properties": { "id": 3 }, "geometry": null }
        ]
    }"#;

    #[test]
    fn test_parse_collection() {
        let collection = FeatureCollection::from_geojson(COLLECTION).unwrap();

        assert_eq!(collection.name.as_deref(), Some("parcels"));
        assert_eq!(collection.crs, Some(CoordinateSystem::UTM(33, true)));
        assert_eq!(collection.len(), 3);
        assert!(collection.features[0].geometry.is_some());
        assert!(collection.features[1].geometry.is_none());
        assert!(collection.features[2].geometry.is_none());
        assert_eq!(collection.features[2].crs, Some(CoordinateSystem::UTM(33, true)));
        assert_eq!(
            collection.features[0].envelope(),
            Some(BoundingRectangle::from_bounds(2.0, 2.0, 4.0, 4.0))
        );
    }

    #[test]
    fn test_geometry_collection_keeps_polygons() {
        let text = r#"{ "type": "GeometryCollection", "geometries": [
            { "type": "Point", "coordinates": [0, 0] },
            { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] }
        ] }"#;
        let collection = FeatureCollection::from_geojson(text).unwrap();
        assert_eq!(collection.features[0].geometry.as_ref().map(|g| g.0.len()), Some(1));
    }

    #[test]
    fn test_geojson_roundtrip_keeps_crs_and_name() {
        let collection = FeatureCollection::from_geojson(COLLECTION).unwrap();
        let text = serde_json::to_string(&collection.to_geojson()).unwrap();
        let reparsed = FeatureCollection::from_geojson(&text).unwrap();

        assert_eq!(reparsed.name, collection.name);
        assert_eq!(reparsed.crs, collection.crs);
        assert_eq!(reparsed.features[0].geometry, collection.features[0].geometry);
    }

    #[test]
    fn test_invalid_geojson() {
        assert!(FeatureCollection::from_geojson("{ not json").is_err());
    }
}
