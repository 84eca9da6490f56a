//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Format a decimal amount as a rand price, e.g. `R1299.50`.
///
/// Usage in templates: `{{ order.total|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("R{value:.2}"))
}
