//! Remote URL allow-list matching.
//!
//! Patterns use filesystem glob semantics applied to the URL as if it were a
//! path: both are split on `/` (empty components are dropped, so `https://`
//! behaves like `https:/`), and a relative pattern is matched against the
//! trailing components of the URL, one glob per component. A pattern starting
//! with `/` has to match every component.
//!
//! ```
//! use edm_tools::pattern::remote_matches;
//!
//! assert!(remote_matches("git@github.com:EVerest/foo.git", "git@github.com:EVerest/*").unwrap());
//! assert!(remote_matches("https://github.com/EVerest/foo.git", "*.git").unwrap());
//! assert!(!remote_matches("https://github.com/other/foo.git", "EVerest/*").unwrap());
//! ```

use glob::Pattern;
use log::{debug, warn};

use crate::error::{Error, Result};

fn components(s: &str) -> Vec<&str> {
    s.split('/').filter(|part| !part.is_empty()).collect()
}

/// Match a remote URL against a single pattern.
pub fn remote_matches(url: &str, pattern: &str) -> Result<bool> {
    let pattern_parts = components(pattern);
    if pattern_parts.is_empty() {
        return Ok(false);
    }
    let url_parts = components(url);

    if pattern.starts_with('/')
        && (!url.starts_with('/') || url_parts.len() != pattern_parts.len())
    {
        return Ok(false);
    }
    if pattern_parts.len() > url_parts.len() {
        return Ok(false);
    }

    for (url_part, pattern_part) in url_parts.iter().rev().zip(pattern_parts.iter().rev()) {
        let glob = Pattern::new(pattern_part).map_err(Error::Glob)?;
        if !glob.matches(url_part) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns true if one of `patterns` accepts `url`.
///
/// Invalid patterns are reported and never match.
pub fn matches_any<S: AsRef<str>>(url: &str, patterns: &[S]) -> bool {
    for pattern in patterns {
        let pattern = pattern.as_ref();
        match remote_matches(url, pattern) {
            Ok(true) => {
                debug!("Pattern \"{}\" accepts string \"{}\"", pattern, url);
                return true;
            }
            Ok(false) => {}
            Err(e) => warn!("Ignoring invalid remote pattern \"{}\": {}", pattern, e),
        }
    }
    false
}
