//! Catalog Wire Types
//!
//! Typed view of the catalog API's JSON response shape. Every field the
//! upstream may omit is an `Option` with a serde default, so one absent
//! field never takes down the record (or the page) it belongs to.

use serde::Deserialize;

/// One page of catalog results
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogPage {
    /// Records on this page
    #[serde(rename = "docs", default)]
    pub records: Vec<MovieRecord>,
    /// Total matching records across all pages
    #[serde(default)]
    pub total: u64,
}

/// One catalog result (movie or series)
///
/// Transient: built per response, never persisted.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieRecord {
    /// Primary title
    pub name: Option<String>,
    /// Alternate (usually original-language) title
    #[serde(rename = "alternativeName")]
    pub alternative_name: Option<String>,
    /// Release year
    pub year: Option<i32>,
    /// Rating values, per source
    pub rating: Option<RatingInfo>,
    /// Production budget
    pub budget: Option<BudgetInfo>,
    /// Synopsis
    pub description: Option<String>,
    /// Poster image
    pub poster: Option<PosterInfo>,
}

impl MovieRecord {
    /// Best available title, if any name field is present
    pub fn title(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.alternative_name.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    /// Whether either name field equals `query`, ignoring case and
    /// surrounding whitespace
    pub fn title_matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        [self.name.as_deref(), self.alternative_name.as_deref()]
            .into_iter()
            .flatten()
            .any(|t| t.trim().to_lowercase() == needle)
    }
}

/// Rating values from the two sources the catalog reports
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RatingInfo {
    /// Primary rating source
    pub kp: Option<f64>,
    /// Secondary rating source (absent far more often than the primary)
    pub imdb: Option<f64>,
}

/// Production budget: value plus an ISO-ish currency code
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BudgetInfo {
    /// Amount in whole currency units
    pub value: Option<u64>,
    /// Currency code, e.g. "USD"
    pub currency: Option<String>,
}

/// Poster image reference
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PosterInfo {
    /// Full-size image URL
    pub url: Option<String>,
}
