//! Organization classifier
//!
//! Turns raw OpenStreetMap features into typed [`Organization`] records:
//! name and address extraction, religious-affiliation filtering, keyword
//! based category inference and the verification heuristic.
//!
//! Keyword matching uses pre-compiled Aho-Corasick automatons built from a
//! [`KeywordTable`], so the same table always yields the same result.

use aho_corasick::AhoCorasick;
use domain::entities::{OrgCategory, Organization, RawElement};
use domain::value_objects::{Distance, GeoLocation};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ApplicationError;

/// Minimum number of distinct tags for an organization to count as verified
pub const VERIFIED_MIN_TAGS: usize = 4;

const EDUCATION_AMENITIES: &[&str] = &["school", "college", "university", "kindergarten"];
const HEALTH_AMENITIES: &[&str] = &["clinic", "hospital", "doctors", "pharmacy"];
const FOOD_AMENITIES: &[&str] = &["food_bank", "soup_kitchen"];

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

fn default_education() -> Vec<String> {
    to_strings(&[
        "school",
        "madrasa",
        "madrassa",
        "institute",
        "college",
        "education",
        "quran",
        "islamic school",
        "academy",
        "university",
    ])
}

fn default_health() -> Vec<String> {
    to_strings(&[
        "clinic", "hospital", "health", "medical", "pharmacy", "maternity",
    ])
}

fn default_food_support() -> Vec<String> {
    to_strings(&[
        "food",
        "feeding",
        "hunger",
        "soup kitchen",
        "charity",
        "relief",
        "welfare",
        "orphan",
        "shelter",
        "foundation",
        "community service",
    ])
}

fn default_islamic_markers() -> Vec<String> {
    to_strings(&["mosque", "masjid", "islamic", "central prayer"])
}

fn default_non_islamic_markers() -> Vec<String> {
    to_strings(&["church", "cathedral", "chapel", "ministry"])
}

/// Keyword lists that drive classification
///
/// Every list has a compiled-in default. A list given in configuration
/// replaces its default; [`KeywordAdditions`] extends them instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    /// Words that mark an education provider
    #[serde(default = "default_education")]
    pub education: Vec<String>,

    /// Words that mark a health provider
    #[serde(default = "default_health")]
    pub health: Vec<String>,

    /// Words that mark food, charity or community-service work
    #[serde(default = "default_food_support")]
    pub food_support: Vec<String>,

    /// Words in a worship place's name that mark it as Islamic
    #[serde(default = "default_islamic_markers")]
    pub islamic_markers: Vec<String>,

    /// Words in a worship place's name that rule it out
    #[serde(default = "default_non_islamic_markers")]
    pub non_islamic_markers: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            education: default_education(),
            health: default_health(),
            food_support: default_food_support(),
            islamic_markers: default_islamic_markers(),
            non_islamic_markers: default_non_islamic_markers(),
        }
    }
}

/// Extra keywords appended to a [`KeywordTable`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordAdditions {
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub health: Vec<String>,
    #[serde(default)]
    pub food_support: Vec<String>,
    #[serde(default)]
    pub islamic_markers: Vec<String>,
    #[serde(default)]
    pub non_islamic_markers: Vec<String>,
}

fn append_unique(target: &mut Vec<String>, extra: &[String]) {
    for word in extra {
        let word = word.trim().to_lowercase();
        if !word.is_empty() && !target.iter().any(|w| w.eq_ignore_ascii_case(&word)) {
            target.push(word);
        }
    }
}

impl KeywordTable {
    /// Append extra keywords, skipping blanks and duplicates
    #[must_use]
    pub fn extended(mut self, additions: &KeywordAdditions) -> Self {
        append_unique(&mut self.education, &additions.education);
        append_unique(&mut self.health, &additions.health);
        append_unique(&mut self.food_support, &additions.food_support);
        append_unique(&mut self.islamic_markers, &additions.islamic_markers);
        append_unique(&mut self.non_islamic_markers, &additions.non_islamic_markers);
        self
    }
}

/// Case-insensitive multi-keyword matcher; an empty list never matches
#[derive(Debug, Clone)]
struct KeywordSet(Option<AhoCorasick>);

impl KeywordSet {
    fn build(words: &[String]) -> Result<Self, ApplicationError> {
        let words: Vec<&str> = words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Ok(Self(None));
        }

        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&words)
            .map(|ac| Self(Some(ac)))
            .map_err(|e| ApplicationError::Configuration(format!("invalid keyword table: {e}")))
    }

    fn matches(&self, haystack: &str) -> bool {
        self.0.as_ref().is_some_and(|ac| ac.is_match(haystack))
    }
}

/// Classifies raw elements into organizations
#[derive(Debug, Clone)]
pub struct OrgClassifier {
    table: KeywordTable,
    education: KeywordSet,
    health: KeywordSet,
    food_support: KeywordSet,
    islamic: KeywordSet,
    non_islamic: KeywordSet,
}

impl OrgClassifier {
    /// Build a classifier from a keyword table
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the keyword automatons cannot be built.
    pub fn new(table: KeywordTable) -> Result<Self, ApplicationError> {
        Ok(Self {
            education: KeywordSet::build(&table.education)?,
            health: KeywordSet::build(&table.health)?,
            food_support: KeywordSet::build(&table.food_support)?,
            islamic: KeywordSet::build(&table.islamic_markers)?,
            non_islamic: KeywordSet::build(&table.non_islamic_markers)?,
            table,
        })
    }

    /// Build a classifier with the compiled-in keyword table
    #[must_use]
    pub fn with_default_keywords() -> Self {
        #[allow(clippy::expect_used)] // Infallible with the static default lists
        Self::new(KeywordTable::default()).expect("default keyword table is valid")
    }

    /// The keyword table in use
    pub const fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// Classify one element relative to the user's position
    ///
    /// Returns `None` for elements without a usable name or coordinate and
    /// for places of worship that are not Islamic.
    pub fn classify(&self, element: &RawElement, user: &GeoLocation) -> Option<Organization> {
        let name = element.tag("name")?;
        let location = element.location?;

        if !self.passes_worship_filter(element, name) {
            trace!(id = element.id, %name, "Discarding non-Islamic place of worship");
            return None;
        }

        let category = self.category_for(element, name);
        let distance = Distance::from_meters(user.distance_meters(&location));

        let organization = Organization::new(element.id, name, location, category, distance)
            .ok()?
            .with_description(element.tag("description"))
            .with_address(assemble_address(element).as_deref())
            .with_contact(
                element.first_tag(&["phone", "contact:phone"]),
                element.first_tag(&["email", "contact:email"]),
                element.first_tag(&["website", "contact:website", "url"]),
            )
            .with_verified(element.tag_count() >= VERIFIED_MIN_TAGS);

        Some(organization)
    }

    /// Classify a batch, drop rejects and sort nearest first
    pub fn classify_all(&self, elements: &[RawElement], user: &GeoLocation) -> Vec<Organization> {
        let mut organizations: Vec<Organization> = elements
            .iter()
            .filter_map(|e| self.classify(e, user))
            .collect();
        organizations.sort_by_key(Organization::distance);
        organizations
    }

    fn passes_worship_filter(&self, element: &RawElement, name: &str) -> bool {
        if element.tag("amenity") != Some("place_of_worship") {
            return true;
        }

        if let Some(religion) = element.tag("religion") {
            if !religion.eq_ignore_ascii_case("muslim") {
                return false;
            }
        }

        if self.non_islamic.matches(name) {
            return false;
        }

        element
            .tag("religion")
            .is_some_and(|r| r.eq_ignore_ascii_case("muslim"))
            || self.islamic.matches(name)
    }

    fn category_for(&self, element: &RawElement, name: &str) -> OrgCategory {
        let text = [
            Some(name),
            element.tag("description"),
            element.tag("operator"),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        let amenity = element.tag("amenity");
        let amenity_in = |set: &[&str]| amenity.is_some_and(|a| set.contains(&a));

        if self.education.matches(&text) || amenity_in(EDUCATION_AMENITIES) {
            OrgCategory::Education
        } else if self.health.matches(&text)
            || amenity_in(HEALTH_AMENITIES)
            || element.tag("healthcare").is_some()
        {
            OrgCategory::Health
        } else if self.food_support.matches(&text)
            || amenity_in(FOOD_AMENITIES)
            || element.tag("social_facility") == Some("food_bank")
        {
            OrgCategory::FoodSupport
        } else {
            OrgCategory::Community
        }
    }
}

impl Default for OrgClassifier {
    fn default() -> Self {
        Self::with_default_keywords()
    }
}

/// Join the structured address parts, falling back to `addr:full`
fn assemble_address(element: &RawElement) -> Option<String> {
    let parts: Vec<&str> = ["addr:housenumber", "addr:street", "addr:suburb", "addr:city"]
        .iter()
        .filter_map(|key| element.tag(key))
        .collect();

    if parts.is_empty() {
        element.tag("addr:full").map(str::to_string)
    } else {
        Some(parts.join(", "))
    }
}
