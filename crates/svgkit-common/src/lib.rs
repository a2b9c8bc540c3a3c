//! # SvgKit Common
//!
//! Shared utilities and logging configuration for the SvgKit view component.
//!
//! ## Features
//!
//! - Logging configuration and setup
//! - Markup sniffing shared by the resolver and the fetcher

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Check whether a raw string is inline SVG markup.
///
/// The check is an exact-prefix heuristic: trimmed content starting with the
/// literal `<svg` counts as markup. It does not validate the document, so
/// malformed `<svg`-prefixed text still passes, and anything else is treated
/// as a fetchable location.
pub fn is_svg_markup(content: &str) -> bool {
    content.trim_start().starts_with("<svg")
}

/// Check whether a string parses as an absolute URL.
///
/// Source classification never consults this; it exists so embedders can
/// surface bad addresses before a fetch is issued and fails.
pub fn is_valid_location(location: &str) -> bool {
    url::Url::parse(location).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_svg_markup() {
        assert!(is_svg_markup("<svg><rect/></svg>"));
        assert!(is_svg_markup("  \n\t<svg viewBox=\"0 0 10 10\"/>"));
        // Prefix check only, not validation
        assert!(is_svg_markup("<svg this is not well formed"));
    }

    #[test]
    fn test_is_not_svg_markup() {
        assert!(!is_svg_markup("https://example.com/icon.svg"));
        assert!(!is_svg_markup("<html><body/></html>"));
        assert!(!is_svg_markup(""));
        // Must be the opening token, not merely contained
        assert!(!is_svg_markup("prefix <svg/>"));
    }

    #[test]
    fn test_is_valid_location() {
        assert!(is_valid_location("https://example.com/icon.svg"));
        assert!(is_valid_location("file:///tmp/icon.svg"));
        assert!(is_valid_location("data:image/svg+xml,%3Csvg%2F%3E"));
        assert!(!is_valid_location("not a url"));
        assert!(!is_valid_location("/relative/path.svg"));
    }
}
