use std::collections::BTreeMap;

use foundation::math::LatLng;
use serde_json::{Map, Value};

/// One closed ring of vertices. A closing duplicate vertex is dropped.
pub type Ring = Vec<LatLng>;
/// Outer ring followed by hole rings.
pub type PolygonRings = Vec<Ring>;

/// Administrative area geometry keyed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRecord {
    pub name: String,
    pub polygons: Vec<PolygonRings>,
}

impl BoundaryRecord {
    pub fn vertices(&self) -> impl Iterator<Item = &LatLng> {
        self.polygons.iter().flatten().flatten()
    }
}

/// Parsed boundary dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryCollection {
    /// Name-ordered records. Features sharing a name are merged.
    pub records: Vec<BoundaryRecord>,
    /// Features that had no usable name or no polygon geometry.
    pub skipped: usize,
}

/// Property keys tried, in order, for the feature name.
pub const DEFAULT_NAME_KEYS: &[&str] = &["name", "pro_th", "PROV_NAMT", "province", "NAME_1"];

#[derive(Debug)]
pub enum BoundaryParseError {
    Json(serde_json::Error),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for BoundaryParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryParseError::Json(e) => write!(f, "JSON parse error: {e}"),
            BoundaryParseError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryParseError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoundaryParseError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl BoundaryCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryParseError> {
        Self::from_geojson_str_with_keys(payload, DEFAULT_NAME_KEYS)
    }

    pub fn from_geojson_str_with_keys(
        payload: &str,
        name_keys: &[&str],
    ) -> Result<Self, BoundaryParseError> {
        let value: Value = serde_json::from_str(payload).map_err(BoundaryParseError::Json)?;
        Self::from_geojson_value(&value, name_keys)
    }

    pub fn from_geojson_value(value: &Value, name_keys: &[&str]) -> Result<Self, BoundaryParseError> {
        let obj = value
            .as_object()
            .ok_or(BoundaryParseError::NotAFeatureCollection)?;
        if obj.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(BoundaryParseError::NotAFeatureCollection);
        }
        let features = obj
            .get("features")
            .and_then(Value::as_array)
            .ok_or(BoundaryParseError::NotAFeatureCollection)?;

        let mut by_name: BTreeMap<String, Vec<PolygonRings>> = BTreeMap::new();
        let mut skipped = 0usize;

        for (index, feat) in features.iter().enumerate() {
            let feat = feat.as_object().ok_or(BoundaryParseError::InvalidFeature {
                index,
                reason: "feature must be an object".to_string(),
            })?;

            let Some(name) = feature_name(feat, name_keys) else {
                skipped += 1;
                continue;
            };

            let Some(geometry) = feat.get("geometry").filter(|g| !g.is_null()) else {
                skipped += 1;
                continue;
            };
            let polygons = parse_polygonal(geometry)
                .map_err(|reason| BoundaryParseError::InvalidFeature { index, reason })?;
            if polygons.is_empty() {
                skipped += 1;
                continue;
            }

            by_name.entry(name).or_default().extend(polygons);
        }

        Ok(Self {
            records: by_name
                .into_iter()
                .map(|(name, polygons)| BoundaryRecord { name, polygons })
                .collect(),
            skipped,
        })
    }

    pub fn get(&self, name: &str) -> Option<&BoundaryRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

fn feature_name(feat: &Map<String, Value>, name_keys: &[&str]) -> Option<String> {
    let props = feat.get("properties").and_then(Value::as_object)?;
    name_keys
        .iter()
        .filter_map(|k| props.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Polygon and MultiPolygon become polygon lists; other geometry types yield
/// an empty list (they cannot be highlighted).
fn parse_polygonal(value: &Value) -> Result<Vec<PolygonRings>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry missing type".to_string())?;

    match ty {
        "Polygon" => {
            let coords = coordinates(obj)?;
            let poly = parse_polygon(coords)?;
            Ok(if poly.is_empty() { vec![] } else { vec![poly] })
        }
        "MultiPolygon" => {
            let coords = coordinates(obj)?;
            let polys = coords
                .as_array()
                .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
            let mut out = Vec::with_capacity(polys.len());
            for poly in polys {
                let poly = parse_polygon(poly)?;
                if !poly.is_empty() {
                    out.push(poly);
                }
            }
            Ok(out)
        }
        "GeometryCollection" => {
            let geoms = obj
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or("GeometryCollection missing geometries".to_string())?;
            let mut out = Vec::new();
            for g in geoms {
                out.extend(parse_polygonal(g)?);
            }
            Ok(out)
        }
        _ => Ok(Vec::new()),
    }
}

fn coordinates(obj: &Map<String, Value>) -> Result<&Value, String> {
    obj.get("coordinates")
        .ok_or("geometry missing coordinates".to_string())
}

/// Rings with fewer than three distinct vertices are dropped; a polygon whose
/// outer ring is dropped is empty.
fn parse_polygon(coords: &Value) -> Result<PolygonRings, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    let mut out: PolygonRings = Vec::with_capacity(rings.len());
    for (i, ring) in rings.iter().enumerate() {
        let mut pts = parse_ring(ring)?;
        drop_closing_duplicate(&mut pts);
        if pts.len() < 3 {
            if i == 0 {
                return Ok(Vec::new());
            }
            continue;
        }
        out.push(pts);
    }
    Ok(out)
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        let pos = item
            .as_array()
            .ok_or("position must be an array".to_string())?;
        if pos.len() < 2 {
            return Err("position must have [lon, lat]".to_string());
        }
        let lng = pos[0].as_f64().ok_or("lon must be a number".to_string())?;
        let lat = pos[1].as_f64().ok_or("lat must be a number".to_string())?;
        out.push(LatLng::new(lat, lng));
    }
    Ok(out)
}

fn drop_closing_duplicate(points: &mut Ring) {
    if let (Some(&first), Some(&last)) = (points.first(), points.last())
        && points.len() >= 2
        && (first.lat - last.lat).abs() < 1e-12
        && (first.lng - last.lng).abs() < 1e-12
    {
        points.pop();
    }
}
