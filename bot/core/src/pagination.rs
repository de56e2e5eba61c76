//! Pagination
//!
//! Page math plus the opaque tokens attached to navigation controls. A
//! token must round-trip deterministically: decoding it reconstructs the
//! exact [`SearchQuery`] that produced the page being viewed, so a
//! navigation action can reissue the query without consulting any dialog
//! state.
//!
//! Token format is `kind:page:param` with the parameter last, so free text
//! containing colons survives the split.

use thiserror::Error;

use crate::catalog::SearchQuery;

/// Malformed navigation token
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid page token: {reason}")]
pub struct NavigationDecodeError {
    /// What failed to parse
    pub reason: String,
}

impl NavigationDecodeError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Generic user-facing message; the token is opaque to the user
    pub fn user_message(&self) -> &'static str {
        "Could not change the page. Please run the search again."
    }
}

/// Navigation token carried by pagination controls
pub struct PageToken;

impl PageToken {
    /// Encode a query into a token
    pub fn encode(query: &SearchQuery) -> String {
        match query {
            SearchQuery::Name { text, page } => format!("name:{page}:{text}"),
            SearchQuery::Rating { min, page } => format!("rating:{page}:{min}"),
            SearchQuery::Budget { min_usd, page } => format!("budget:{page}:{min_usd}"),
        }
    }

    /// Decode a token back into the originating query
    pub fn decode(token: &str) -> Result<SearchQuery, NavigationDecodeError> {
        let mut parts = token.splitn(3, ':');
        let kind = parts.next().unwrap_or_default();
        let page: u32 = parts
            .next()
            .ok_or_else(|| NavigationDecodeError::new("missing page number"))?
            .parse()
            .map_err(|_| NavigationDecodeError::new("page is not a number"))?;
        if page == 0 {
            return Err(NavigationDecodeError::new("page numbers start at 1"));
        }
        let param = parts
            .next()
            .ok_or_else(|| NavigationDecodeError::new("missing query parameter"))?;

        match kind {
            "name" => {
                if param.trim().is_empty() {
                    return Err(NavigationDecodeError::new("empty name query"));
                }
                Ok(SearchQuery::Name {
                    text: param.to_string(),
                    page,
                })
            }
            "rating" => {
                let min: f64 = param
                    .parse()
                    .map_err(|_| NavigationDecodeError::new("rating is not a number"))?;
                Ok(SearchQuery::Rating { min, page })
            }
            "budget" => {
                let min_usd: u64 = param
                    .parse()
                    .map_err(|_| NavigationDecodeError::new("budget is not a number"))?;
                Ok(SearchQuery::Budget { min_usd, page })
            }
            other => Err(NavigationDecodeError::new(format!(
                "unknown query kind '{other}'"
            ))),
        }
    }
}

/// Navigation state for one result page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageControls {
    /// Whether a "previous" control applies
    pub has_prev: bool,
    /// Whether a "next" control applies
    pub has_next: bool,
    /// Total page count, `ceil(total / page_size)`
    pub total_pages: u32,
    /// Page currently viewed
    pub current_page: u32,
}

impl PageControls {
    /// Compute controls for one page of a result set
    pub fn paginate(total: u64, page_size: u32, current_page: u32) -> Self {
        let total_pages = (total.div_ceil(u64::from(page_size.max(1)))) as u32;
        Self {
            has_prev: current_page > 1,
            has_next: current_page < total_pages,
            total_pages,
            current_page,
        }
    }

    /// Whether controls should be shown at all
    pub fn needed(total: u64, page_size: u32) -> bool {
        total > u64::from(page_size)
    }

    /// The non-actionable `current/total` position label
    pub fn label(&self) -> String {
        format!("{}/{}", self.current_page, self.total_pages)
    }

    /// Token for the previous page, if one exists
    pub fn prev_token(&self, query: &SearchQuery) -> Option<String> {
        self.has_prev
            .then(|| PageToken::encode(&query.with_page(self.current_page - 1)))
    }

    /// Token for the next page, if one exists
    pub fn next_token(&self, query: &SearchQuery) -> Option<String> {
        self.has_next
            .then(|| PageToken::encode(&query.with_page(self.current_page + 1)))
    }
}
