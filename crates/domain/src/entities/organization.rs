//! Charitable organization records and their map projection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{Distance, GeoLocation};

/// Placeholder for contact fields the source does not carry
pub const NOT_LISTED: &str = "Not listed";

/// Placeholder when no address fragment is tagged
pub const ADDRESS_NOT_LISTED: &str = "Address not listed";

/// Semantic category of an organization
///
/// Categories are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgCategory {
    /// Food banks, soup kitchens, general charities
    FoodSupport,
    /// Schools, madrasas, Quran teaching
    Education,
    /// Clinics, hospitals, pharmacies
    Health,
    /// Mosques and community centres
    Community,
}

/// Kind of Islamic giving an organization accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GivingType {
    /// Obligatory almsgiving
    Zakat,
    /// Voluntary charity
    Sadaqah,
}

impl OrgCategory {
    /// Every category, in display order
    pub const ALL: [Self; 4] = [
        Self::FoodSupport,
        Self::Education,
        Self::Health,
        Self::Community,
    ];

    /// Giving types accepted by organizations in this category
    #[must_use]
    pub const fn giving_types(&self) -> &'static [GivingType] {
        match self {
            Self::Community | Self::Education => &[GivingType::Zakat, GivingType::Sadaqah],
            Self::FoodSupport | Self::Health => &[GivingType::Sadaqah],
        }
    }

    /// Description used when the source carries none
    #[must_use]
    pub const fn default_description(&self) -> &'static str {
        match self {
            Self::FoodSupport => "Charitable organization providing food and basic support",
            Self::Education => "Islamic education and learning centre",
            Self::Health => "Health and medical support facility",
            Self::Community => "Mosque and community centre",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FoodSupport => "Food Support",
            Self::Education => "Education",
            Self::Health => "Health",
            Self::Community => "Community",
        }
    }
}

impl fmt::Display for OrgCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrgCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "food_support" | "food" => Ok(Self::FoodSupport),
            "education" => Ok(Self::Education),
            "health" => Ok(Self::Health),
            "community" => Ok(Self::Community),
            other => Err(DomainError::ValidationError(format!(
                "Unknown category: {other}"
            ))),
        }
    }
}

impl fmt::Display for GivingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zakat => write!(f, "Zakat"),
            Self::Sadaqah => write!(f, "Sadaqah"),
        }
    }
}

impl std::str::FromStr for GivingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zakat" => Ok(Self::Zakat),
            "sadaqah" | "sadaqa" => Ok(Self::Sadaqah),
            other => Err(DomainError::ValidationError(format!(
                "Unknown giving type: {other}"
            ))),
        }
    }
}

/// A classified charitable organization
///
/// Always carries a non-empty name. Built once by the classifier and not
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    id: i64,
    name: String,
    description: String,
    address: String,
    phone: String,
    email: String,
    website: String,
    distance: Distance,
    distance_label: String,
    category: OrgCategory,
    giving_types: Vec<GivingType>,
    verified: bool,
    location: GeoLocation,
}

impl Organization {
    /// Create an organization with default description and contact fields
    ///
    /// # Errors
    ///
    /// Returns a validation error if `name` is blank.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        location: GeoLocation,
        category: OrgCategory,
        distance: Distance,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::ValidationError(
                "Organization name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id,
            name,
            description: category.default_description().to_string(),
            address: ADDRESS_NOT_LISTED.to_string(),
            phone: NOT_LISTED.to_string(),
            email: NOT_LISTED.to_string(),
            website: NOT_LISTED.to_string(),
            distance_label: distance.label(),
            distance,
            category,
            giving_types: category.giving_types().to_vec(),
            verified: false,
            location,
        })
    }

    /// Set the description (ignored when blank)
    #[must_use]
    pub fn with_description(mut self, description: Option<&str>) -> Self {
        if let Some(d) = non_blank(description) {
            self.description = d;
        }
        self
    }

    /// Set the assembled address (ignored when blank)
    #[must_use]
    pub fn with_address(mut self, address: Option<&str>) -> Self {
        if let Some(a) = non_blank(address) {
            self.address = a;
        }
        self
    }

    /// Set contact details; missing values keep the "Not listed" placeholder
    #[must_use]
    pub fn with_contact(
        mut self,
        phone: Option<&str>,
        email: Option<&str>,
        website: Option<&str>,
    ) -> Self {
        if let Some(p) = non_blank(phone) {
            self.phone = p;
        }
        if let Some(e) = non_blank(email) {
            self.email = e;
        }
        if let Some(w) = non_blank(website) {
            self.website = w;
        }
        self
    }

    /// Set the verification flag
    #[must_use]
    pub const fn with_verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    /// Source element id
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Address or "Address not listed"
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Phone or "Not listed"
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Email or "Not listed"
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Website or "Not listed"
    #[must_use]
    pub fn website(&self) -> &str {
        &self.website
    }

    /// Distance from the user
    #[must_use]
    pub const fn distance(&self) -> Distance {
        self.distance
    }

    /// Formatted distance such as `"1.2 km"`
    #[must_use]
    pub fn distance_label(&self) -> &str {
        &self.distance_label
    }

    /// Category
    #[must_use]
    pub const fn category(&self) -> OrgCategory {
        self.category
    }

    /// Accepted giving types
    #[must_use]
    pub fn giving_types(&self) -> &[GivingType] {
        &self.giving_types
    }

    /// Whether the organization accepts the given type of giving
    #[must_use]
    pub fn accepts(&self, giving_type: GivingType) -> bool {
        self.giving_types.contains(&giving_type)
    }

    /// Heuristic verification flag
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.verified
    }

    /// Coordinate
    #[must_use]
    pub const fn location(&self) -> GeoLocation {
        self.location
    }

    /// Projection handed to the map renderer
    #[must_use]
    pub fn to_marker(&self) -> MapMarker {
        MapMarker {
            id: self.id,
            name: self.name.clone(),
            location: self.location,
            description: self.description.clone(),
            category: self.category,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Minimal projection of an [`Organization`] for map rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    /// Organization id
    pub id: i64,
    /// Organization name
    pub name: String,
    /// Marker position
    pub location: GeoLocation,
    /// Popup text
    pub description: String,
    /// Category, used for marker styling
    pub category: OrgCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(category: OrgCategory) -> Organization {
        Organization::new(
            42,
            "Central Mosque",
            GeoLocation::accra(),
            category,
            Distance::from_meters(1234.0),
        )
        .unwrap()
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = Organization::new(
            1,
            "   ",
            GeoLocation::accra(),
            OrgCategory::Community,
            Distance::from_meters(0.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn defaults_are_filled_in() {
        let org = sample(OrgCategory::Health);
        assert_eq!(org.address(), ADDRESS_NOT_LISTED);
        assert_eq!(org.phone(), NOT_LISTED);
        assert_eq!(org.email(), NOT_LISTED);
        assert_eq!(org.website(), NOT_LISTED);
        assert_eq!(org.description(), OrgCategory::Health.default_description());
        assert_eq!(org.distance_label(), "1.2 km");
        assert!(!org.is_verified());
    }

    #[test]
    fn giving_types_follow_category() {
        assert_eq!(
            sample(OrgCategory::Community).giving_types(),
            &[GivingType::Zakat, GivingType::Sadaqah]
        );
        assert_eq!(
            sample(OrgCategory::Education).giving_types(),
            &[GivingType::Zakat, GivingType::Sadaqah]
        );
        assert_eq!(
            sample(OrgCategory::FoodSupport).giving_types(),
            &[GivingType::Sadaqah]
        );
        assert!(!sample(OrgCategory::Health).accepts(GivingType::Zakat));
    }

    #[test]
    fn blank_overrides_keep_placeholders() {
        let org = sample(OrgCategory::Community)
            .with_description(Some(" "))
            .with_contact(Some("+233 30 000 0000"), None, Some(""));
        assert_eq!(org.description(), OrgCategory::Community.default_description());
        assert_eq!(org.phone(), "+233 30 000 0000");
        assert_eq!(org.email(), NOT_LISTED);
        assert_eq!(org.website(), NOT_LISTED);
    }

    #[test]
    fn marker_projection() {
        let org = sample(OrgCategory::Community).with_description(Some("Friday prayers"));
        let marker = org.to_marker();
        assert_eq!(marker.id, 42);
        assert_eq!(marker.name, "Central Mosque");
        assert_eq!(marker.description, "Friday prayers");
        assert_eq!(marker.category, OrgCategory::Community);
        assert_eq!(marker.location, GeoLocation::accra());
    }

    #[test]
    fn category_parsing() {
        assert_eq!("food-support".parse::<OrgCategory>().unwrap(), OrgCategory::FoodSupport);
        assert_eq!("Education".parse::<OrgCategory>().unwrap(), OrgCategory::Education);
        assert!("temple".parse::<OrgCategory>().is_err());
    }

    #[test]
    fn giving_type_parsing() {
        assert_eq!("ZAKAT".parse::<GivingType>().unwrap(), GivingType::Zakat);
        assert_eq!("sadaqa".parse::<GivingType>().unwrap(), GivingType::Sadaqah);
        assert!("tithe".parse::<GivingType>().is_err());
    }

    #[test]
    fn serializes_snake_case_category() {
        let json = serde_json::to_string(&sample(OrgCategory::FoodSupport)).unwrap();
        assert!(json.contains("\"category\":\"food_support\""));
        assert!(json.contains("\"distance_label\":\"1.2 km\""));
    }
}
