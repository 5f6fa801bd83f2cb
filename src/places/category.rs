//! Category vocabulary
//!
//! App category keys follow Geoapify's dotted naming (`catering.cafe`).
//! Google Places uses a flat type list, so keys are mapped many-to-many onto
//! Google types here.

use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Every selectable category key with its display label
pub const CATEGORIES: &[(&str, &str)] = &[
    ("accommodation", "Accommodation"),
    ("accommodation.hotel", "Hotel"),
    ("accommodation.motel", "Motel"),
    ("accommodation.apartment", "Apartment"),
    ("accommodation.chalet", "Chalet"),
    ("accommodation.guest_house", "Guest House"),
    ("catering", "Dining"),
    ("catering.restaurant", "Restaurant"),
    ("catering.cafe", "Cafe"),
    ("catering.bar", "Bar"),
    ("catering.pub", "Pub"),
    ("catering.fast_food", "Fast Food"),
    ("catering.ice_cream", "Ice Cream"),
    ("catering.biergarten", "Beer Garden"),
    ("entertainment", "Entertainment"),
    ("entertainment.museum", "Museum"),
    ("entertainment.theatre", "Theatre"),
    ("entertainment.cinema", "Cinema"),
    ("entertainment.zoo", "Zoo"),
    ("entertainment.aquarium", "Aquarium"),
    ("entertainment.theme_park", "Theme Park"),
    ("entertainment.casino", "Casino"),
    ("entertainment.nightclub", "Nightclub"),
    ("tourism", "Tourism"),
    ("tourism.sights", "Sights"),
    ("tourism.attraction", "Attraction"),
    ("tourism.information", "Tourist Information"),
    ("commercial", "Commercial"),
    ("commercial.shopping_mall", "Shopping Mall"),
    ("commercial.supermarket", "Supermarket"),
    ("commercial.marketplace", "Marketplace"),
    ("commercial.department_store", "Department Store"),
    ("sport", "Sports"),
    ("sport.fitness", "Fitness"),
    ("sport.swimming", "Swimming"),
    ("sport.tennis", "Tennis"),
    ("sport.golf", "Golf"),
    ("sport.skiing", "Skiing"),
    ("natural", "Nature"),
    ("natural.beach", "Beach"),
    ("natural.park", "Park"),
    ("natural.forest", "Forest"),
    ("natural.mountain", "Mountain"),
    ("natural.lake", "Lake"),
    ("natural.river", "River"),
    ("service", "Service"),
    ("service.banking", "Banking"),
    ("service.healthcare", "Healthcare"),
    ("service.pharmacy", "Pharmacy"),
    ("service.post", "Post Office"),
    ("service.police", "Police Station"),
    ("service.fire_station", "Fire Station"),
    ("religion", "Religious Sites"),
    ("religion.christian", "Christian"),
    ("religion.buddhist", "Buddhist"),
    ("religion.hindu", "Hindu"),
    ("religion.jewish", "Jewish"),
    ("religion.muslim", "Muslim"),
    ("education", "Education"),
    ("education.school", "School"),
    ("education.university", "University"),
    ("education.college", "College"),
    ("education.kindergarten", "Kindergarten"),
    ("education.library", "Library"),
];

/// Top-level categories
pub const MAIN_CATEGORIES: &[&str] = &[
    "accommodation",
    "catering",
    "entertainment",
    "tourism",
    "commercial",
    "sport",
    "natural",
    "service",
    "religion",
    "education",
];

/// Pool drawn from when nothing is selected
pub const DEFAULT_CATEGORIES: &[&str] = &["tourism", "entertainment", "catering", "commercial"];

/// Google types searched when no key maps to anything
pub const GOOGLE_DEFAULT_TYPES: &[&str] = &["tourist_attraction", "restaurant", "lodging", "store"];

/// Display label for a category key
pub fn label(key: &str) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

/// Whether a key is part of the app vocabulary
pub fn is_known(key: &str) -> bool {
    label(key).is_some()
}

/// Google types for one category key (empty when unmapped)
fn google_types_for(key: &str) -> &'static [&'static str] {
    match key {
        "accommodation"
        | "accommodation.hotel"
        | "accommodation.motel"
        | "accommodation.apartment"
        | "accommodation.chalet"
        | "accommodation.guest_house" => &["lodging"],
        "catering" => &["restaurant", "cafe", "bar"],
        "catering.restaurant" => &["restaurant"],
        "catering.cafe" | "catering.ice_cream" => &["cafe"],
        "catering.bar" | "catering.pub" => &["bar"],
        "catering.fast_food" => &["meal_takeaway"],
        "entertainment" => &[
            "museum",
            "art_gallery",
            "movie_theater",
            "zoo",
            "aquarium",
            "amusement_park",
            "casino",
            "night_club",
        ],
        "entertainment.museum" => &["museum"],
        "entertainment.theatre" | "entertainment.cinema" => &["movie_theater"],
        "entertainment.zoo" => &["zoo"],
        "entertainment.aquarium" => &["aquarium"],
        "entertainment.theme_park" => &["amusement_park"],
        "entertainment.casino" => &["casino"],
        "entertainment.nightclub" => &["night_club"],
        "tourism" | "tourism.sights" | "tourism.attraction" | "tourism.information" => {
            &["tourist_attraction"]
        }
        "commercial" => &["shopping_mall", "store", "supermarket", "department_store"],
        "commercial.shopping_mall" | "commercial.marketplace" => &["shopping_mall"],
        "commercial.supermarket" => &["supermarket"],
        "commercial.department_store" => &["department_store"],
        "sport" => &["gym", "stadium"],
        "sport.fitness" | "sport.swimming" | "sport.tennis" | "sport.golf" => &["gym"],
        "natural" => &["park", "natural_feature"],
        "natural.park" | "natural.forest" => &["park"],
        "natural.beach" | "natural.mountain" | "natural.lake" => &["natural_feature"],
        "service" => &["bank", "hospital", "pharmacy", "post_office", "police"],
        "service.banking" => &["bank"],
        "service.healthcare" => &["hospital"],
        "service.pharmacy" => &["pharmacy"],
        "service.post" => &["post_office"],
        "service.police" => &["police"],
        "religion" => &["church", "hindu_temple", "mosque", "synagogue"],
        "religion.christian" | "religion.buddhist" => &["church"],
        "religion.hindu" => &["hindu_temple"],
        "religion.muslim" => &["mosque"],
        "religion.jewish" => &["synagogue"],
        "education" => &["school", "university", "library"],
        "education.school" => &["school"],
        "education.university" | "education.college" => &["university"],
        "education.library" => &["library"],
        _ => &[],
    }
}

/// Translate category keys to distinct Google types, first occurrence first
///
/// Returns an empty list when no key maps to anything.
pub fn google_types(categories: &[String]) -> Vec<String> {
    dedup(
        categories
            .iter()
            .flat_map(|key| google_types_for(key).iter().copied()),
    )
}

/// Keep the keys Geoapify understands, de-duplicated
pub fn geoapify_categories(categories: &[String]) -> Vec<String> {
    dedup(
        categories
            .iter()
            .map(String::as_str)
            .filter(|key| is_known(key)),
    )
}

fn dedup<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}

/// Display label for a service type or category tag
pub fn type_label(tag: &str) -> String {
    let known = match tag {
        "tourist_attraction" => Some("Tourist Attraction"),
        "restaurant" => Some("Restaurant"),
        "cafe" => Some("Cafe"),
        "bar" => Some("Bar"),
        "lodging" => Some("Hotel"),
        "museum" => Some("Museum"),
        "art_gallery" => Some("Art Gallery"),
        "movie_theater" => Some("Cinema"),
        "zoo" => Some("Zoo"),
        "aquarium" => Some("Aquarium"),
        "amusement_park" => Some("Theme Park"),
        "casino" => Some("Casino"),
        "night_club" => Some("Night Club"),
        "shopping_mall" => Some("Shopping Mall"),
        "store" => Some("Store"),
        "supermarket" => Some("Supermarket"),
        "department_store" => Some("Department Store"),
        "gym" => Some("Gym"),
        "stadium" => Some("Stadium"),
        "park" => Some("Park"),
        "natural_feature" => Some("Natural Feature"),
        "bank" => Some("Bank"),
        "hospital" => Some("Hospital"),
        "pharmacy" => Some("Pharmacy"),
        "post_office" => Some("Post Office"),
        "police" => Some("Police"),
        "church" => Some("Church"),
        "hindu_temple" => Some("Hindu Temple"),
        "mosque" => Some("Mosque"),
        "synagogue" => Some("Synagogue"),
        "school" => Some("School"),
        "university" => Some("University"),
        "library" => Some("Library"),
        "meal_takeaway" => Some("Takeaway"),
        "point_of_interest" => Some("Point of Interest"),
        other => label(other),
    };

    match known {
        Some(label) => label.to_string(),
        None => title_case(tag.rsplit('.').next().unwrap_or(tag)),
    }
}

/// Comma-separated labels for the first `max` tags
pub fn format_types(tags: &[String], max: usize) -> String {
    tags.iter()
        .take(max)
        .map(|t| type_label(t))
        .collect::<Vec<_>>()
        .join(", ")
}

fn title_case(s: &str) -> String {
    s.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Category keys chosen by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySelection {
    keys: Vec<String>,
}

impl CategorySelection {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let keys = keys
            .into_iter()
            .map(|k| {
                let k: String = k.into();
                k.trim().to_string()
            })
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The keys to search with
    ///
    /// An empty selection becomes one key drawn uniformly from
    /// [`DEFAULT_CATEGORIES`].
    pub fn resolve(&self, rng: &dyn RandomSource) -> Vec<String> {
        if !self.keys.is_empty() {
            return self.keys.clone();
        }
        let i = rng.index(DEFAULT_CATEGORIES.len()).unwrap_or(0);
        vec![DEFAULT_CATEGORIES[i].to_string()]
    }
}
