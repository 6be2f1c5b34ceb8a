//! Axis-aligned bounding box in latitude/longitude space

use serde::{Deserialize, Serialize};

use super::GeoLocation;

/// Smallest box containing a set of coordinates
///
/// Used to tell the map renderer which area to fit into its viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// South-west corner
    pub south_west: GeoLocation,
    /// North-east corner
    pub north_east: GeoLocation,
}

impl BoundingBox {
    /// Build the box enclosing every point, or `None` for an empty input
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoLocation>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_lat, mut max_lat) = (first.latitude(), first.latitude());
        let (mut min_lon, mut max_lon) = (first.longitude(), first.longitude());

        for point in iter {
            min_lat = min_lat.min(point.latitude());
            max_lat = max_lat.max(point.latitude());
            min_lon = min_lon.min(point.longitude());
            max_lon = max_lon.max(point.longitude());
        }

        Some(Self {
            south_west: GeoLocation::new_unchecked(min_lat, min_lon),
            north_east: GeoLocation::new_unchecked(max_lat, max_lon),
        })
    }

    /// Whether the point lies inside or on the edge of the box
    #[must_use]
    pub fn contains(&self, point: &GeoLocation) -> bool {
        (self.south_west.latitude()..=self.north_east.latitude()).contains(&point.latitude())
            && (self.south_west.longitude()..=self.north_east.longitude())
                .contains(&point.longitude())
    }

    /// Center of the box
    #[must_use]
    pub fn center(&self) -> GeoLocation {
        GeoLocation::new_unchecked(
            f64::midpoint(self.south_west.latitude(), self.north_east.latitude()),
            f64::midpoint(self.south_west.longitude(), self.north_east.longitude()),
        )
    }
}
