//! # SvgKit View
//!
//! An async SVG view component for the SvgKit toolkit.
//!
//! This crate handles:
//! - Source classification (inline `<svg` markup vs fetchable location)
//! - Bounded markup caching shared across views
//! - Shallow presentation-attribute rewriting (fill/stroke)
//! - The Idle → Loading → Ready/Failed lifecycle with supersession-safe
//!   callbacks
//! - Render planning against a host-supplied [`RenderSurface`]
//!
//! ## Architecture
//!
//! ```text
//! SourceSpec ──resolve──▶ SvgSource
//!                           ├── Inline ────────────────▶ Ready
//!                           └── Remote ──cache?──hit──▶ Ready
//!                                          └──miss──▶ fetch ──▶ Ready/Failed
//! Ready ──plan──▶ RenderPlan ──present──▶ RenderSurface
//! ```

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod cache;
pub mod rewrite;
pub mod source;
pub mod view;

pub use cache::*;
pub use rewrite::*;
pub use source::*;
pub use view::*;

pub use svgkit_net::{FetchError, FetcherConfig, SvgFetcher};

/// Embedder-level defaults for every view wired to one cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvgKitConfig {
    /// Default fetch deadline in milliseconds.
    pub default_timeout_ms: u64,

    /// Headers sent with every remote fetch.
    pub default_headers: HashMap<String, String>,

    /// Whether fetched markup is cached.
    pub cache_enabled: bool,

    /// Maximum number of cached documents.
    pub max_cache_size: usize,
}

impl Default for SvgKitConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            default_headers: HashMap::new(),
            cache_enabled: true,
            max_cache_size: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SvgKitConfig {
    /// Build the shared cache this config describes.
    pub fn build_cache(&self) -> SharedMarkupCache {
        shared_cache(self.max_cache_size)
    }

    /// Seed props for a source with this config's defaults.
    pub fn props(&self, source: impl Into<SourceSpec>) -> SvgViewProps {
        SvgViewProps::new(source)
            .cache(self.cache_enabled)
            .timeout(Duration::from_millis(self.default_timeout_ms))
            .headers(self.default_headers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SvgKitConfig::default();
        assert_eq!(config.default_timeout_ms, 10_000);
        assert!(config.cache_enabled);
        assert_eq!(config.max_cache_size, 100);
        assert!(config.default_headers.is_empty());
    }

    #[test]
    fn test_config_seeds_props() {
        let mut config = SvgKitConfig::default();
        config.default_timeout_ms = 500;
        config.cache_enabled = false;
        config
            .default_headers
            .insert("Accept".to_string(), "image/svg+xml".to_string());

        let props = config.props("https://example.com/icon.svg");
        assert_eq!(props.timeout, Duration::from_millis(500));
        assert!(!props.cache);
        assert_eq!(
            props.headers.get("Accept").map(String::as_str),
            Some("image/svg+xml")
        );
    }

    #[test]
    fn test_config_builds_sized_cache() {
        let config = SvgKitConfig {
            max_cache_size: 2,
            ..Default::default()
        };
        let cache = config.build_cache();

        let mut guard = cache.write().unwrap();
        guard.set("a", "<svg>a</svg>");
        guard.set("b", "<svg>b</svg>");
        guard.set("c", "<svg>c</svg>");
        assert_eq!(guard.len(), 2);
    }
}
