use foundation::bounds::GeoBounds;
use foundation::math::{LatLng, circle_bounds, haversine_m};
use serde::{Deserialize, Serialize};

/// Geometry of a drawn shape, in the form picking needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeGeometry {
    /// Outer ring first, then holes. Rings are implicitly closed.
    Polygon { rings: Vec<Vec<LatLng>> },
    Circle { center: LatLng, radius_m: f64 },
}

impl ShapeGeometry {
    pub fn contains(&self, p: LatLng) -> bool {
        match self {
            ShapeGeometry::Polygon { rings } => point_in_polygon(p, rings),
            ShapeGeometry::Circle { center, radius_m } => point_in_circle(p, *center, *radius_m),
        }
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        match self {
            ShapeGeometry::Polygon { rings } => {
                GeoBounds::from_points(rings.first().into_iter().flatten())
            }
            ShapeGeometry::Circle { center, radius_m } => {
                Some(circle_bounds(*center, *radius_m))
            }
        }
    }
}

/// Even-odd ray cast in lat/lng space.
pub fn point_in_ring(p: LatLng, ring: &[LatLng]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let x = (b.lng - a.lng) * (p.lat - a.lat) / (b.lat - a.lat) + a.lng;
            if p.lng < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Inside the outer ring and outside every hole.
pub fn point_in_polygon(p: LatLng, rings: &[Vec<LatLng>]) -> bool {
    let Some((outer, holes)) = rings.split_first() else {
        return false;
    };
    point_in_ring(p, outer) && !holes.iter().any(|h| point_in_ring(p, h))
}

pub fn point_in_circle(p: LatLng, center: LatLng, radius_m: f64) -> bool {
    haversine_m(p, center) <= radius_m
}

/// Index of the first geometry containing `p`.
///
/// Ordering contract: when geometries overlap, the lowest index wins.
pub fn pick_first<'a>(
    p: LatLng,
    geometries: impl IntoIterator<Item = &'a ShapeGeometry>,
) -> Option<usize> {
    if !p.is_finite() {
        return None;
    }
    geometries.into_iter().position(|g| g.contains(p))
}
