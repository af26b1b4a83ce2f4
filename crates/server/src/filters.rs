//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// First character of a value, uppercased, for avatar badges.
///
/// Usage in templates: `{{ user.email|initial }}`
#[askama::filter_fn]
pub fn initial(value: impl Display, _env: &dyn askama::Values) -> askama::Result<char> {
    Ok(value
        .to_string()
        .chars()
        .next()
        .map_or('?', |c| c.to_ascii_uppercase()))
}
