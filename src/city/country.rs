//! Popular countries offered for world discovery

/// A country with its ISO 3166-1 alpha-2 code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
}

const fn country(code: &'static str, name: &'static str) -> Country {
    Country { code, name }
}

pub const POPULAR_COUNTRIES: &[Country] = &[
    country("JP", "Japan"),
    country("US", "United States"),
    country("GB", "United Kingdom"),
    country("FR", "France"),
    country("DE", "Germany"),
    country("IT", "Italy"),
    country("ES", "Spain"),
    country("CA", "Canada"),
    country("AU", "Australia"),
    country("KR", "South Korea"),
    country("CN", "China"),
    country("TH", "Thailand"),
    country("SG", "Singapore"),
    country("BR", "Brazil"),
    country("IN", "India"),
    country("RU", "Russia"),
    country("MX", "Mexico"),
    country("TR", "Turkey"),
    country("EG", "Egypt"),
    country("ZA", "South Africa"),
];

/// Max suggestions returned by [`search`]
pub const MAX_SUGGESTIONS: usize = 8;

/// Countries whose name contains `query`, case-insensitively
pub fn search(query: &str) -> Vec<Country> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    POPULAR_COUNTRIES
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&query))
        .take(MAX_SUGGESTIONS)
        .copied()
        .collect()
}

/// Resolve an exact country name or a two-letter code
pub fn lookup(input: &str) -> Option<Country> {
    let input = input.trim();
    POPULAR_COUNTRIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(input) || c.code.eq_ignore_ascii_case(input))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_substring() {
        let names: Vec<&str> = search("united").iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["United States", "United Kingdom"]);
    }

    #[test]
    fn test_search_caps_suggestions() {
        // "a" appears in most names
        assert_eq!(search("a").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_search_empty_query() {
        assert!(search("").is_empty());
        assert!(search("   ").is_empty());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("japan").unwrap().code, "JP");
        assert_eq!(lookup("kr").unwrap().name, "South Korea");
        assert!(lookup("Atlantis").is_none());
        assert!(lookup("Jap").is_none());
    }
}
