//! Nominatim reverse response models and label assembly

use serde::Deserialize;

/// Body of a `/reverse?format=jsonv2` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseResult {
    /// Full comma-separated place name
    #[serde(default)]
    pub display_name: Option<String>,

    /// Structured address parts
    #[serde(default)]
    pub address: Option<AddressBreakdown>,

    /// Set instead of a place when nothing was found
    #[serde(default)]
    pub error: Option<String>,
}

/// The address parts used to build an area label
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressBreakdown {
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub quarter: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
}

impl AddressBreakdown {
    /// `"<district>, <locality>"`, or whichever of the two is present
    #[must_use]
    pub fn label(&self) -> Option<String> {
        let district = first_present(&[&self.suburb, &self.neighbourhood, &self.quarter]);
        let locality = first_present(&[&self.city, &self.town, &self.village, &self.county]);

        match (district, locality) {
            (Some(d), Some(l)) if d != l => Some(format!("{d}, {l}")),
            (Some(d), _) => Some(d.to_string()),
            (None, Some(l)) => Some(l.to_string()),
            (None, None) => None,
        }
    }
}

impl ReverseResult {
    /// Short area label for display
    ///
    /// Prefers the structured address, then the first two parts of
    /// `display_name`.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }

        if let Some(label) = self.address.as_ref().and_then(AddressBreakdown::label) {
            return Some(label);
        }

        let display_name = self.display_name.as_deref()?;
        let parts: Vec<&str> = display_name
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .take(2)
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}
