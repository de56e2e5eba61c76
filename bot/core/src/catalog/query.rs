//! Search Queries and Query Builders
//!
//! [`SearchQuery`] is the engine's immutable description of one search at
//! one page. The builders map it onto the catalog's request shape: endpoint
//! path, query parameters, sort order, and the per-mode page size.
//!
//! Page sizes are a deliberate content-density choice (a name search shows
//! a single best match out of ten candidates; threshold searches stream
//! five full cards per page) and the pagination math depends on them.

/// Results fetched per page for a name search
pub const NAME_PAGE_SIZE: u32 = 10;

/// Results fetched per page for rating and budget searches
pub const FILTER_PAGE_SIZE: u32 = 5;

/// One search at one page
///
/// Immutable: requesting another page goes through [`SearchQuery::with_page`],
/// which produces a new value.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchQuery {
    /// Free-text title search
    Name {
        /// The user's query text
        text: String,
        /// Page number, 1-based
        page: u32,
    },
    /// Minimum-rating threshold search
    Rating {
        /// Inclusive lower bound, 0.0–10.0
        min: f64,
        /// Page number, 1-based
        page: u32,
    },
    /// Minimum-budget threshold search
    Budget {
        /// Inclusive lower bound in whole US dollars
        min_usd: u64,
        /// Page number, 1-based
        page: u32,
    },
}

impl SearchQuery {
    /// First-page name query
    pub fn name(text: impl Into<String>) -> Self {
        Self::Name {
            text: text.into(),
            page: 1,
        }
    }

    /// First-page rating query
    pub fn rating(min: f64) -> Self {
        Self::Rating { min, page: 1 }
    }

    /// First-page budget query
    pub fn budget(min_usd: u64) -> Self {
        Self::Budget { min_usd, page: 1 }
    }

    /// Current page number
    pub fn page(&self) -> u32 {
        match self {
            Self::Name { page, .. } | Self::Rating { page, .. } | Self::Budget { page, .. } => {
                *page
            }
        }
    }

    /// Same search at a different page
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        let mut query = self.clone();
        match &mut query {
            Self::Name { page: p, .. } | Self::Rating { page: p, .. } | Self::Budget { page: p, .. } => {
                *p = page;
            }
        }
        query
    }

    /// Fixed page size for this search mode
    pub fn page_size(&self) -> u32 {
        match self {
            Self::Name { .. } => NAME_PAGE_SIZE,
            Self::Rating { .. } | Self::Budget { .. } => FILTER_PAGE_SIZE,
        }
    }

    /// One-line description of this search for the history log
    pub fn describe(&self) -> String {
        match self {
            Self::Name { text, .. } => format!("search by name: '{text}'"),
            Self::Rating { min, .. } => format!("rating \u{2265} {min}"),
            Self::Budget { min_usd, .. } => {
                format!("budget \u{2265} ${}M", format_millions(*min_usd))
            }
        }
    }

    /// Build the catalog request for this query
    pub fn to_request(&self) -> CatalogRequest {
        match self {
            Self::Name { text, page } => CatalogRequest {
                path: "movie/search",
                params: vec![
                    ("query".into(), text.clone()),
                    ("page".into(), page.to_string()),
                    ("limit".into(), NAME_PAGE_SIZE.to_string()),
                ],
            },
            Self::Rating { min, page } => CatalogRequest {
                path: "movie",
                params: vec![
                    ("rating.kp".into(), format!("{min}-10")),
                    ("page".into(), page.to_string()),
                    ("limit".into(), FILTER_PAGE_SIZE.to_string()),
                    ("sortField".into(), "rating.kp".into()),
                    ("sortType".into(), "-1".into()),
                ],
            },
            Self::Budget { min_usd, page } => CatalogRequest {
                path: "movie",
                params: vec![
                    ("budget.value".into(), min_usd.to_string()),
                    ("page".into(), page.to_string()),
                    ("limit".into(), FILTER_PAGE_SIZE.to_string()),
                    ("sortField".into(), "budget.value".into()),
                    ("sortType".into(), "-1".into()),
                ],
            },
        }
    }
}

/// A catalog request ready for the HTTP client
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogRequest {
    /// Endpoint path relative to the API base URL
    pub path: &'static str,
    /// Query string parameters, in emission order
    pub params: Vec<(String, String)>,
}

/// Whole dollars as millions, without a trailing `.0` for round values
fn format_millions(usd: u64) -> String {
    let millions = usd as f64 / 1_000_000.0;
    if millions.fract() == 0.0 {
        format!("{}", millions as u64)
    } else {
        format!("{millions}")
    }
}
