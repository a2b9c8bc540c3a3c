//! SvgKit demo harness
//!
//! Scripted pass over the component's main scenarios: a remote document,
//! presentation overrides, inline markup, and error handling. Every
//! primitive call lands on a surface that logs what it would draw.

use svgkit_common::{init_logging, LogConfig};
use svgkit_view::{
    shared_cache, RenderSurface, SvgView, SvgViewProps, DEFAULT_CACHE_CAPACITY,
};
use tracing::{info, warn};

const SAMPLE: &str = "https://dev.w3.org/SVG/tools/svgweb/samples/svg-files/410.svg";

const INLINE_CIRCLE: &str = r##"<svg width="100" height="100" viewBox="0 0 100 100">
  <circle cx="50" cy="50" r="40" fill="#FFE66D" stroke="#FF6B6B" stroke-width="3"/>
</svg>"##;

/// Surface that logs every draw instead of rasterizing.
struct TracingSurface;

impl RenderSurface for TracingSurface {
    fn draw_markup(&mut self, xml: &str, width: f32, height: f32) {
        info!(markup_len = xml.len(), width, height, "draw markup");
    }

    fn draw_location(&mut self, location: &str, width: f32, height: f32) {
        info!(location, width, height, "draw from location");
    }

    fn draw_loading(&mut self, width: f32, height: f32) {
        info!(width, height, "draw loading indicator");
    }

    fn draw_blank(&mut self, width: f32, height: f32) {
        info!(width, height, "draw blank placeholder");
    }
}

async fn run_scenario(surface: &mut TracingSurface, name: &str, view: &SvgView) {
    info!(scenario = name, "Loading");
    view.load().await;
    view.present(surface, 375.0, 667.0);
}

#[tokio::main]
async fn main() {
    init_logging(LogConfig::default());

    let cache = shared_cache(DEFAULT_CACHE_CAPACITY);
    let mut surface = TracingSurface;

    // Basic remote document
    let basic = SvgView::with_cache(
        SvgViewProps::new(SAMPLE)
            .width(100u32)
            .height(100u32)
            .on_load(|| info!("svg loaded"))
            .on_error(|error| warn!(%error, "svg failed to load")),
        cache.clone(),
    )
    .expect("failed to create view");
    run_scenario(&mut surface, "basic", &basic).await;

    // Custom colors force the markup primitive
    let colored = SvgView::with_cache(
        SvgViewProps::new(SAMPLE)
            .width(100u32)
            .height(100u32)
            .fill("#FF6B6B")
            .stroke("#4ECDC4"),
        cache.clone(),
    )
    .expect("failed to create view");
    run_scenario(&mut surface, "custom colors", &colored).await;

    // Direct markup, no network involved
    let inline = SvgView::with_cache(
        SvgViewProps::new(INLINE_CIRCLE).width(100u32).height(100u32),
        cache.clone(),
    )
    .expect("failed to create view");
    run_scenario(&mut surface, "inline markup", &inline).await;

    // Error handling: the failure stays inside the component
    let missing = SvgView::with_cache(
        SvgViewProps::new("https://example.com/nonexistent.svg")
            .on_load(|| info!("unexpected load"))
            .on_error(|error| warn!(%error, "expected failure")),
        cache.clone(),
    )
    .expect("failed to create view");
    run_scenario(&mut surface, "error handling", &missing).await;

    let stats = cache.read().unwrap().stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        cached = stats.count,
        hit_rate = stats.hit_rate(),
        "Cache summary"
    );
}
