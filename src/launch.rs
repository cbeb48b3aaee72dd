//! Opening links in the default browser.

use url::Url;

use crate::error::{Error, Result};

/// Parse a user-typed URL, tolerating a missing scheme the way browsers do:
/// `example.com/x` becomes `http://example.com/x`.
pub fn parse_user_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl(raw.to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    Url::parse(&candidate).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))
}

/// Hand a link off to the platform's default browser.
pub fn open_in_browser(raw: &str) -> Result<Url> {
    let url = parse_user_url(raw)?;
    open::that(url.as_str()).map_err(|e| Error::OpenFailed(e.to_string()))?;
    Ok(url)
}
