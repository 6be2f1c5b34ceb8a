//! Overpass JSON response models

use std::collections::BTreeMap;

use domain::entities::{ElementKind, RawElement};
use domain::value_objects::GeoLocation;
use serde::Deserialize;

use crate::error::OverpassError;

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    elements: Vec<RawOverpassElement>,
    /// Set by the server when the query hit a runtime limit
    #[serde(default)]
    remark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOverpassElement {
    #[serde(rename = "type")]
    element_type: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<RawCenter>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawCenter {
    lat: f64,
    lon: f64,
}

impl RawOverpassElement {
    fn into_element(self) -> Option<RawElement> {
        let kind = match self.element_type.as_str() {
            "node" => ElementKind::Node,
            "way" => ElementKind::Way,
            "relation" => ElementKind::Relation,
            _ => return None,
        };

        let location = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => GeoLocation::new(lat, lon).ok(),
            (_, _, Some(center)) => GeoLocation::new(center.lat, center.lon).ok(),
            _ => None,
        };

        Some(RawElement {
            kind,
            id: self.id,
            location,
            tags: self.tags,
        })
    }
}

/// Parse an Overpass JSON body into raw elements
///
/// Elements of unknown type are skipped. Ways and relations take their
/// coordinate from the `center` object.
///
/// # Errors
///
/// Returns [`OverpassError::ParseError`] if the body is not an Overpass JSON
/// document.
pub fn parse_response(body: &str) -> Result<Vec<RawElement>, OverpassError> {
    let raw: RawResponse =
        serde_json::from_str(body).map_err(|e| OverpassError::ParseError(e.to_string()))?;

    if let Some(remark) = raw.remark.as_deref() {
        tracing::warn!(%remark, "Overpass returned a remark");
    }

    Ok(raw
        .elements
        .into_iter()
        .filter_map(RawOverpassElement::into_element)
        .collect())
}
