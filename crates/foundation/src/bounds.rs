use serde::{Deserialize, Serialize};

use crate::math::LatLng;

/// Axis-aligned latitude/longitude box in degrees.
///
/// Boxes never wrap the antimeridian; everything this engine draws sits well
/// inside a single hemisphere.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        GeoBounds {
            south,
            west,
            north,
            east,
        }
    }

    /// Degenerate box around a single point.
    pub fn from_point(p: LatLng) -> Self {
        GeoBounds::new(p.lat, p.lng, p.lat, p.lng)
    }

    /// Smallest box containing every finite point, or `None` if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LatLng>) -> Option<Self> {
        let mut out: Option<GeoBounds> = None;
        for p in points {
            if !p.is_finite() {
                continue;
            }
            out = Some(match out {
                None => GeoBounds::from_point(*p),
                Some(b) => b.extended(*p),
            });
        }
        out
    }

    pub fn extended(self, p: LatLng) -> Self {
        GeoBounds {
            south: self.south.min(p.lat),
            west: self.west.min(p.lng),
            north: self.north.max(p.lat),
            east: self.east.max(p.lng),
        }
    }

    pub fn union(self, other: GeoBounds) -> Self {
        GeoBounds {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) * 0.5,
            (self.west + self.east) * 0.5,
        )
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }

    pub fn lat_span(&self) -> f64 {
        (self.north - self.south).max(0.0)
    }

    pub fn lng_span(&self) -> f64 {
        (self.east - self.west).max(0.0)
    }
}
