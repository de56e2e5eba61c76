//! Result Renderer
//!
//! Formats one [`MovieRecord`] into a [`DisplayUnit`]: the caption text and
//! the poster URL, if there is one. Every optional field degrades to a
//! documented placeholder; a record with nothing but a title still renders.
//!
//! The secondary (IMDb) rating line is omitted entirely when absent while
//! the primary line always appears. The asymmetry is intentional: the
//! secondary source is missing far more often, and a permanent "IMDb:
//! unknown" line would be noise on most cards.

use crate::catalog::{BudgetInfo, MovieRecord};

/// Placeholder when every name field is absent
pub const TITLE_UNKNOWN: &str = "title unknown";

/// Placeholder for an absent year
pub const YEAR_UNKNOWN: &str = "year unknown";

/// Placeholder for an absent description
pub const NO_DESCRIPTION: &str = "no description available";

/// Placeholder for an absent rating or budget value
pub const VALUE_UNKNOWN: &str = "unknown";

/// One renderable result: caption plus optional poster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayUnit {
    /// Caption text (attached to the poster when one is present,
    /// sent standalone otherwise)
    pub caption: String,
    /// Poster URL, when the record carries one
    pub poster_url: Option<String>,
}

/// Render a catalog record for delivery
pub fn render(record: &MovieRecord) -> DisplayUnit {
    let title = record.title().unwrap_or(TITLE_UNKNOWN);
    let year = record
        .year
        .map_or_else(|| YEAR_UNKNOWN.to_string(), |y| y.to_string());

    let rating = record.rating.as_ref();
    let primary = rating
        .and_then(|r| r.kp)
        .map_or_else(|| VALUE_UNKNOWN.to_string(), |v| v.to_string());

    let mut caption = format!("\u{1f3ac} *{title}* ({year})\n\u{2b50} Rating: {primary}\n");
    if let Some(imdb) = rating.and_then(|r| r.imdb) {
        caption.push_str(&format!("IMDb: {imdb}\n"));
    }
    caption.push_str(&format!(
        "\u{1f4b0} Budget: {}\n\n{}",
        format_budget(record.budget.as_ref()),
        record.description.as_deref().unwrap_or(NO_DESCRIPTION),
    ));

    DisplayUnit {
        caption,
        poster_url: record
            .poster
            .as_ref()
            .and_then(|p| p.url.clone())
            .filter(|u| !u.is_empty()),
    }
}

/// Format a budget with its currency symbol and thousands separators
pub fn format_budget(budget: Option<&BudgetInfo>) -> String {
    let Some(value) = budget.and_then(|b| b.value) else {
        return VALUE_UNKNOWN.to_string();
    };
    let amount = group_thousands(value);
    match budget.and_then(|b| b.currency.as_deref()) {
        Some("USD") => format!("${amount}"),
        Some("RUB") => format!("\u{20bd}{amount}"),
        Some("EUR") => format!("\u{20ac}{amount}"),
        Some(code) if !code.is_empty() => format!("{amount} {code}"),
        _ => amount,
    }
}

/// Insert comma separators into a non-negative integer
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
