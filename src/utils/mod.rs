//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::Result;

/// Substitute `{name}` placeholders in a page template.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (placeholder, value)| {
            acc.replace(placeholder, value)
        })
}

/// Resolve a page path against the site base URL.
pub fn page_url(base: &Url, path: &str) -> Result<String> {
    Ok(base.join(path)?.to_string())
}
