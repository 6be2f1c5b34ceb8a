//! Driving route results

use serde::{Deserialize, Serialize};

use crate::value_objects::{BoundingBox, GeoLocation};

/// Viewport instruction for the map renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewportFit {
    /// Fit both endpoints and the drawn path
    EndpointsAndPath {
        /// Area to fit
        bounds: BoundingBox,
    },
    /// Fit only the two endpoints, no path is drawn
    EndpointsOnly {
        /// Area to fit
        bounds: BoundingBox,
    },
}

impl ViewportFit {
    /// Area the renderer should fit
    #[must_use]
    pub const fn bounds(&self) -> &BoundingBox {
        match self {
            Self::EndpointsAndPath { bounds } | Self::EndpointsOnly { bounds } => bounds,
        }
    }
}

/// Driving distance and duration reported by the routing service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Driving distance in meters
    pub distance_meters: f64,
    /// Expected driving time in seconds
    pub duration_seconds: f64,
}

/// Result of a route computation
///
/// An empty `path` means routing failed; the consumer still gets a viewport
/// that contains both endpoints so the directions intent is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Route origin
    pub from: GeoLocation,
    /// Route destination
    pub to: GeoLocation,
    /// Ordered path coordinates, empty when routing failed
    pub path: Vec<GeoLocation>,
    /// How the renderer should frame the result
    pub viewport: ViewportFit,
    /// Distance and duration when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RouteSummary>,
}

impl RouteResult {
    /// Successful route; the viewport covers endpoints and path
    #[must_use]
    pub fn with_path(
        from: GeoLocation,
        to: GeoLocation,
        path: Vec<GeoLocation>,
        summary: Option<RouteSummary>,
    ) -> Self {
        if path.is_empty() {
            return Self::endpoints_only(from, to);
        }

        let bounds = BoundingBox::from_points([&from, &to].into_iter().chain(path.iter()))
            .unwrap_or_else(|| endpoint_bounds(from, to));

        Self {
            from,
            to,
            path,
            viewport: ViewportFit::EndpointsAndPath { bounds },
            summary,
        }
    }

    /// Degraded result: no path, fit only the endpoints
    #[must_use]
    pub fn endpoints_only(from: GeoLocation, to: GeoLocation) -> Self {
        Self {
            from,
            to,
            path: Vec::new(),
            viewport: ViewportFit::EndpointsOnly {
                bounds: endpoint_bounds(from, to),
            },
            summary: None,
        }
    }

    /// Whether a path can be drawn
    #[must_use]
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}

fn endpoint_bounds(from: GeoLocation, to: GeoLocation) -> BoundingBox {
    BoundingBox::from_points([&from, &to]).unwrap_or(BoundingBox {
        south_west: from,
        north_east: to,
    })
}
