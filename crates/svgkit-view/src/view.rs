//! Render controller
//!
//! Drives a view through Idle → Loading → Ready/Failed and plans how
//! resolved markup is handed to the rendering collaborator.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use svgkit_net::{FetchError, FetcherConfig, SvgFetcher};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::cache::{shared_cache, SharedMarkupCache, DEFAULT_CACHE_CAPACITY};
use crate::rewrite::PresentationOverrides;
use crate::source::{SourceSpec, SvgSource};

/// Default fetch deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Requested size for one axis, numeric or symbolic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// Absolute pixels.
    Px(f32),
    /// Percentage of the container extent.
    Percent(f32),
}

impl Dimension {
    /// Parse "120", "120px" or "50%".
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(percent) = s.strip_suffix('%') {
            return percent.trim().parse().ok().map(Dimension::Percent);
        }
        let s = s.strip_suffix("px").unwrap_or(s);
        s.trim().parse().ok().map(Dimension::Px)
    }

    /// Resolve to pixels against a container extent.
    pub fn to_px(self, reference: f32) -> f32 {
        match self {
            Dimension::Px(px) => px,
            Dimension::Percent(percent) => reference * percent / 100.0,
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::Px(100.0)
    }
}

impl From<f32> for Dimension {
    fn from(px: f32) -> Self {
        Dimension::Px(px)
    }
}

impl From<u32> for Dimension {
    fn from(px: u32) -> Self {
        Dimension::Px(px as f32)
    }
}

/// Visual state of one render session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RenderState {
    /// No source processed yet.
    #[default]
    Idle,

    /// A fetch is in flight.
    Loading,

    /// Markup resolved and ready to draw.
    Ready(String),

    /// Resolution failed; the error was reported through the callback once.
    Failed(FetchError),
}

impl RenderState {
    /// Check whether markup is ready to draw.
    pub fn is_ready(&self) -> bool {
        matches!(self, RenderState::Ready(_))
    }

    /// Check whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, RenderState::Loading)
    }
}

/// Announcement that the hosting layer should schedule a re-render.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A fetch started.
    Loading,
    /// Markup became ready.
    Ready,
    /// Resolution failed.
    Failed(String),
}

/// External rendering collaborator.
///
/// The component never rasterizes markup itself; it hands resolved content
/// to whichever surface the host supplies.
pub trait RenderSurface {
    /// Draw a string of SVG markup at the given size.
    fn draw_markup(&mut self, xml: &str, width: f32, height: f32);

    /// Draw directly from an address without materializing the markup twice.
    fn draw_location(&mut self, location: &str, width: f32, height: f32);

    /// Draw the default loading indicator.
    fn draw_loading(&mut self, width: f32, height: f32);

    /// Draw an empty placeholder.
    fn draw_blank(&mut self, width: f32, height: f32);
}

/// Caller-supplied renderable drawn during the loading phase.
pub type LoadingView = Arc<dyn Fn(&mut dyn RenderSurface, f32, f32) + Send + Sync>;

/// Success callback, invoked exactly once per non-superseded resolution.
pub type LoadCallback = Arc<dyn Fn() + Send + Sync>;

/// Error callback, invoked exactly once per non-superseded failure.
pub type ErrorCallback = Arc<dyn Fn(&FetchError) + Send + Sync>;

/// What the view will draw for its current state.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    /// Empty placeholder at the requested size.
    Blank,

    /// Loading indicator, default or caller-supplied.
    Loading { custom: bool },

    /// Markup-string primitive: inline sources and overridden remote markup.
    Markup(String),

    /// Location primitive: remote source with no overrides.
    Location(String),
}

/// Inputs for one view, builder-style.
#[derive(Clone)]
pub struct SvgViewProps {
    /// Raw source: inline markup, address string, or location record.
    pub source: Option<SourceSpec>,

    /// Requested width.
    pub width: Dimension,

    /// Requested height.
    pub height: Dimension,

    /// Fill color override.
    pub fill: Option<String>,

    /// Stroke color override.
    pub stroke: Option<String>,

    /// Show a loading indicator while fetching.
    pub show_loading: bool,

    /// Caller-supplied loading renderable.
    pub loading_view: Option<LoadingView>,

    /// Callback when markup resolves successfully.
    pub on_load: Option<LoadCallback>,

    /// Callback when resolution fails.
    pub on_error: Option<ErrorCallback>,

    /// Cache fetched markup.
    pub cache: bool,

    /// Fetch deadline.
    pub timeout: Duration,

    /// Request headers for remote sources.
    pub headers: HashMap<String, String>,
}

impl Default for SvgViewProps {
    fn default() -> Self {
        Self {
            source: None,
            width: Dimension::default(),
            height: Dimension::default(),
            fill: None,
            stroke: None,
            show_loading: true,
            loading_view: None,
            on_load: None,
            on_error: None,
            cache: true,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            headers: HashMap::new(),
        }
    }
}

impl SvgViewProps {
    /// Create props for a source.
    pub fn new(source: impl Into<SourceSpec>) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }

    /// Set the requested width.
    pub fn width(mut self, width: impl Into<Dimension>) -> Self {
        self.width = width.into();
        self
    }

    /// Set the requested height.
    pub fn height(mut self, height: impl Into<Dimension>) -> Self {
        self.height = height.into();
        self
    }

    /// Set the fill color override.
    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Set the stroke color override.
    pub fn stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    /// Toggle the loading indicator.
    pub fn show_loading(mut self, show: bool) -> Self {
        self.show_loading = show;
        self
    }

    /// Set a caller-supplied loading renderable.
    pub fn loading_view(
        mut self,
        view: impl Fn(&mut dyn RenderSurface, f32, f32) + Send + Sync + 'static,
    ) -> Self {
        self.loading_view = Some(Arc::new(view));
        self
    }

    /// Set the success callback.
    pub fn on_load(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_load = Some(Arc::new(callback));
        self
    }

    /// Set the error callback.
    pub fn on_error(mut self, callback: impl Fn(&FetchError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Toggle caching of fetched markup.
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Set the fetch deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add one request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the request headers.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    fn overrides(&self) -> PresentationOverrides {
        PresentationOverrides {
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
        }
    }
}

/// A single SVG view: one render session over a shared cache.
///
/// Cloning is cheap and clones share state, so the host can poll a view
/// while a load runs elsewhere. Every `load` supersedes the previous one:
/// a superseded attempt's outcome never touches state and never fires
/// callbacks, even if its fetch completes later.
#[derive(Clone)]
pub struct SvgView {
    inner: Arc<ViewInner>,
}

struct ViewInner {
    props: RwLock<SvgViewProps>,
    state: RwLock<RenderState>,
    /// Source of the markup currently committed to `state`.
    resolved: RwLock<Option<SvgSource>>,
    /// Supersession counter; only the latest claim may commit.
    generation: AtomicU64,
    cache: SharedMarkupCache,
    fetcher: SvgFetcher,
    events: RwLock<Option<mpsc::UnboundedSender<ViewEvent>>>,
}

impl SvgView {
    /// Create a view with its own cache.
    pub fn new(props: SvgViewProps) -> Result<Self, FetchError> {
        Self::with_cache(props, shared_cache(DEFAULT_CACHE_CAPACITY))
    }

    /// Create a view over an injected shared cache.
    pub fn with_cache(props: SvgViewProps, cache: SharedMarkupCache) -> Result<Self, FetchError> {
        Ok(Self {
            inner: Arc::new(ViewInner {
                props: RwLock::new(props),
                state: RwLock::new(RenderState::Idle),
                resolved: RwLock::new(None),
                generation: AtomicU64::new(0),
                cache,
                fetcher: SvgFetcher::new(FetcherConfig::default())?,
                events: RwLock::new(None),
            }),
        })
    }

    /// Announce state changes on `tx` so the host can re-render.
    pub fn set_event_sender(&self, tx: mpsc::UnboundedSender<ViewEvent>) {
        *self.inner.events.write().unwrap() = Some(tx);
    }

    /// Replace the source. Takes effect on the next `load`.
    pub fn set_source(&self, source: impl Into<SourceSpec>) {
        self.inner.props.write().unwrap().source = Some(source.into());
    }

    /// Mutate props in place. Takes effect on the next `load`.
    pub fn update<F: FnOnce(&mut SvgViewProps)>(&self, mutate: F) {
        let mut props = self.inner.props.write().unwrap();
        mutate(&mut props);
    }

    /// Snapshot the current state.
    pub fn state(&self) -> RenderState {
        self.inner.state.read().unwrap().clone()
    }

    /// The shared cache this view reads through.
    pub fn cache(&self) -> &SharedMarkupCache {
        &self.inner.cache
    }

    /// Resolve the current source, fetching if needed.
    ///
    /// Any prior in-flight load is superseded the moment this is called;
    /// its eventual outcome is discarded. Fetch errors never escape: they
    /// become `Failed` state plus one `on_error` invocation.
    pub async fn load(&self) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (spec, prop_headers, cache_enabled, deadline) = {
            let props = self.inner.props.read().unwrap();
            (
                props.source.clone(),
                props.headers.clone(),
                props.cache,
                props.timeout,
            )
        };

        let Some(spec) = spec else {
            self.commit(generation, RenderState::Idle, None);
            return;
        };

        let source = SvgSource::resolve(&spec, &prop_headers);

        match &source {
            SvgSource::Inline(markup) => {
                debug!(markup_len = markup.len(), "Inline markup resolved");
                // Already resolved: straight to Ready, no Loading phase
                if self.commit(
                    generation,
                    RenderState::Ready(markup.clone()),
                    Some(source.clone()),
                ) {
                    self.fire_on_load();
                }
            }
            SvgSource::Remote { location, headers } => {
                if !self.commit(generation, RenderState::Loading, Some(source.clone())) {
                    return;
                }

                if cache_enabled {
                    let cached = {
                        let mut cache = self.inner.cache.write().unwrap();
                        match cache.get(location) {
                            Some(markup) => {
                                cache.record_hit();
                                Some(markup)
                            }
                            None => {
                                cache.record_miss();
                                None
                            }
                        }
                    };

                    if let Some(markup) = cached {
                        debug!(location = %location, "Markup cache hit");
                        if self.commit(
                            generation,
                            RenderState::Ready(markup),
                            Some(source.clone()),
                        ) {
                            self.fire_on_load();
                        }
                        return;
                    }
                }

                match self.inner.fetcher.fetch(location, headers, deadline).await {
                    Ok(markup) => {
                        if cache_enabled {
                            self.inner
                                .cache
                                .write()
                                .unwrap()
                                .set(location.clone(), markup.clone());
                        }
                        if self.commit(
                            generation,
                            RenderState::Ready(markup),
                            Some(source.clone()),
                        ) {
                            self.fire_on_load();
                        }
                    }
                    Err(error) => {
                        warn!(location = %location, error = %error, "Markup fetch failed");
                        if self.commit(
                            generation,
                            RenderState::Failed(error.clone()),
                            Some(source.clone()),
                        ) {
                            self.fire_on_error(&error);
                        }
                    }
                }
            }
        }
    }

    /// What the view will draw right now.
    pub fn plan(&self) -> RenderPlan {
        let props = self.inner.props.read().unwrap();
        let state = self.inner.state.read().unwrap();

        match &*state {
            RenderState::Loading if props.show_loading => RenderPlan::Loading {
                custom: props.loading_view.is_some(),
            },
            RenderState::Loading => RenderPlan::Blank,
            RenderState::Ready(markup) => {
                let overrides = props.overrides();
                let resolved = self.inner.resolved.read().unwrap();
                match &*resolved {
                    // Remote without overrides: draw from the address and
                    // skip a second copy of the markup
                    Some(SvgSource::Remote { location, .. }) if overrides.is_empty() => {
                        RenderPlan::Location(location.clone())
                    }
                    _ if overrides.is_empty() => RenderPlan::Markup(markup.clone()),
                    _ => RenderPlan::Markup(overrides.apply(markup)),
                }
            }
            RenderState::Idle | RenderState::Failed(_) => RenderPlan::Blank,
        }
    }

    /// Draw the current plan onto a surface.
    pub fn present(
        &self,
        surface: &mut dyn RenderSurface,
        container_width: f32,
        container_height: f32,
    ) {
        let (width, height, loading_view) = {
            let props = self.inner.props.read().unwrap();
            (
                props.width.to_px(container_width),
                props.height.to_px(container_height),
                props.loading_view.clone(),
            )
        };

        match self.plan() {
            RenderPlan::Blank => surface.draw_blank(width, height),
            RenderPlan::Loading { custom } => match loading_view {
                Some(view) if custom => view(surface, width, height),
                _ => surface.draw_loading(width, height),
            },
            RenderPlan::Markup(xml) => surface.draw_markup(&xml, width, height),
            RenderPlan::Location(location) => surface.draw_location(&location, width, height),
        }
    }

    /// Commit a state transition if `generation` is still current.
    ///
    /// A stale generation means this attempt was superseded; the outcome is
    /// discarded without touching state or firing events.
    fn commit(
        &self,
        generation: u64,
        state: RenderState,
        resolved: Option<SvgSource>,
    ) -> bool {
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            trace!(generation, "Discarding superseded outcome");
            return false;
        }

        let event = match &state {
            RenderState::Idle => None,
            RenderState::Loading => Some(ViewEvent::Loading),
            RenderState::Ready(_) => Some(ViewEvent::Ready),
            RenderState::Failed(error) => Some(ViewEvent::Failed(error.to_string())),
        };

        *self.inner.state.write().unwrap() = state;
        *self.inner.resolved.write().unwrap() = resolved;

        if let Some(event) = event {
            self.send_event(event);
        }
        true
    }

    fn fire_on_load(&self) {
        let callback = self.inner.props.read().unwrap().on_load.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    fn fire_on_error(&self, error: &FetchError) {
        let callback = self.inner.props.read().unwrap().on_error.clone();
        if let Some(callback) = callback {
            callback(error);
        }
    }

    fn send_event(&self, event: ViewEvent) {
        if let Some(tx) = self.inner.events.read().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MARKUP: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect/></svg>";

    /// Surface that records which primitive was invoked.
    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<String>,
    }

    impl RenderSurface for RecordingSurface {
        fn draw_markup(&mut self, xml: &str, width: f32, height: f32) {
            self.calls.push(format!("markup:{xml}:{width}x{height}"));
        }
        fn draw_location(&mut self, location: &str, width: f32, height: f32) {
            self.calls.push(format!("location:{location}:{width}x{height}"));
        }
        fn draw_loading(&mut self, width: f32, height: f32) {
            self.calls.push(format!("loading:{width}x{height}"));
        }
        fn draw_blank(&mut self, width: f32, height: f32) {
            self.calls.push(format!("blank:{width}x{height}"));
        }
    }

    fn counting_props(
        source: impl Into<SourceSpec>,
        loads: &Arc<AtomicUsize>,
        errors: &Arc<AtomicUsize>,
    ) -> SvgViewProps {
        let loads = Arc::clone(loads);
        let errors = Arc::clone(errors);
        SvgViewProps::new(source)
            .on_load(move || {
                loads.fetch_add(1, Ordering::SeqCst);
            })
            .on_error(move |_| {
                errors.fetch_add(1, Ordering::SeqCst);
            })
    }

    async fn mock_markup(server: &MockServer, route: &str, body: &str, expected: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(expected)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_inline_reaches_ready_without_network() {
        let loads = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        // No server exists; a fetch attempt could only fail
        let view = SvgView::new(counting_props(MARKUP, &loads, &errors)).unwrap();

        view.load().await;

        assert_eq!(view.state(), RenderState::Ready(MARKUP.to_string()));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_success_fires_on_load_once() {
        let server = MockServer::start().await;
        mock_markup(&server, "/icon.svg", MARKUP, 1).await;

        let loads = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let view = SvgView::new(counting_props(
            format!("{}/icon.svg", server.uri()),
            &loads,
            &errors,
        ))
        .unwrap();

        view.load().await;

        assert_eq!(view.state(), RenderState::Ready(MARKUP.to_string()));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_http_failure_fires_on_error_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let loads = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let view = SvgView::new(counting_props(server.uri(), &loads, &errors)).unwrap();

        view.load().await;

        assert!(matches!(
            view.state(),
            RenderState::Failed(FetchError::HttpStatus { .. })
        ));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_reaches_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(MARKUP)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let loads = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let deadline = Duration::from_millis(50);
        let view = SvgView::new(
            counting_props(server.uri(), &loads, &errors).timeout(deadline),
        )
        .unwrap();

        view.load().await;

        assert_eq!(view.state(), RenderState::Failed(FetchError::Timeout(deadline)));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_supersession_discards_first_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow.svg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<svg>slow</svg>")
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        mock_markup(&server, "/fast.svg", "<svg>fast</svg>", 1).await;

        let loads = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let view = SvgView::new(counting_props(
            format!("{}/slow.svg", server.uri()),
            &loads,
            &errors,
        ))
        .unwrap();

        let first = {
            let view = view.clone();
            tokio::spawn(async move { view.load().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        view.set_source(format!("{}/fast.svg", server.uri()));
        view.load().await;

        // Let the superseded fetch finish in the background
        first.await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(view.state(), RenderState::Ready("<svg>fast</svg>".to_string()));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_second_fetch() {
        let server = MockServer::start().await;
        mock_markup(&server, "/icon.svg", MARKUP, 1).await;

        let loads = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let view = SvgView::new(counting_props(
            format!("{}/icon.svg", server.uri()),
            &loads,
            &errors,
        ))
        .unwrap();

        view.load().await;
        view.load().await;

        assert_eq!(view.state(), RenderState::Ready(MARKUP.to_string()));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        let stats = view.cache().read().unwrap().stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_cache_disabled_fetches_every_time() {
        let server = MockServer::start().await;
        mock_markup(&server, "/icon.svg", MARKUP, 2).await;

        let loads = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let view = SvgView::new(
            counting_props(format!("{}/icon.svg", server.uri()), &loads, &errors).cache(false),
        )
        .unwrap();

        view.load().await;
        view.load().await;

        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert!(view.cache().read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cache_shared_across_views() {
        let server = MockServer::start().await;
        mock_markup(&server, "/icon.svg", MARKUP, 1).await;

        let cache = shared_cache(DEFAULT_CACHE_CAPACITY);
        let location = format!("{}/icon.svg", server.uri());

        let first = SvgView::with_cache(SvgViewProps::new(location.as_str()), cache.clone()).unwrap();
        first.load().await;

        let second = SvgView::with_cache(SvgViewProps::new(location.as_str()), cache).unwrap();
        second.load().await;

        assert_eq!(second.state(), RenderState::Ready(MARKUP.to_string()));
    }

    #[tokio::test]
    async fn test_inline_markup_never_cached() {
        let view = SvgView::new(SvgViewProps::new(MARKUP)).unwrap();
        view.load().await;

        assert!(view.state().is_ready());
        assert!(view.cache().read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_plan_remote_without_overrides_uses_location() {
        let server = MockServer::start().await;
        mock_markup(&server, "/icon.svg", MARKUP, 1).await;
        let location = format!("{}/icon.svg", server.uri());

        let view = SvgView::new(SvgViewProps::new(location.as_str())).unwrap();
        view.load().await;

        assert_eq!(view.plan(), RenderPlan::Location(location));
    }

    #[tokio::test]
    async fn test_plan_remote_with_fill_rewrites_markup() {
        let server = MockServer::start().await;
        mock_markup(&server, "/icon.svg", "<svg><rect/></svg>", 1).await;

        let view = SvgView::new(
            SvgViewProps::new(format!("{}/icon.svg", server.uri())).fill("#F00"),
        )
        .unwrap();
        view.load().await;

        assert_eq!(
            view.plan(),
            RenderPlan::Markup("<svg fill=\"#F00\"><rect/></svg>".to_string())
        );
    }

    #[tokio::test]
    async fn test_plan_inline_uses_markup_primitive() {
        let view = SvgView::new(SvgViewProps::new(MARKUP)).unwrap();
        view.load().await;

        assert_eq!(view.plan(), RenderPlan::Markup(MARKUP.to_string()));
    }

    #[tokio::test]
    async fn test_plan_while_loading_respects_show_loading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(MARKUP)
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let shown = SvgView::new(SvgViewProps::new(server.uri())).unwrap();
        let hidden = SvgView::new(SvgViewProps::new(server.uri()).show_loading(false)).unwrap();

        let shown_task = {
            let view = shown.clone();
            tokio::spawn(async move { view.load().await })
        };
        let hidden_task = {
            let view = hidden.clone();
            tokio::spawn(async move { view.load().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(shown.state().is_loading());
        assert_eq!(shown.plan(), RenderPlan::Loading { custom: false });
        assert_eq!(hidden.plan(), RenderPlan::Blank);

        shown_task.await.unwrap();
        hidden_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_plan_idle_and_failed_are_blank() {
        let view = SvgView::new(SvgViewProps::default()).unwrap();
        assert_eq!(view.plan(), RenderPlan::Blank);

        let failing = SvgView::new(
            SvgViewProps::new("http://127.0.0.1:9/icon.svg").timeout(Duration::from_millis(200)),
        )
        .unwrap();
        failing.load().await;

        assert!(matches!(failing.state(), RenderState::Failed(_)));
        assert_eq!(failing.plan(), RenderPlan::Blank);
    }

    #[tokio::test]
    async fn test_present_dispatches_markup() {
        let view = SvgView::new(SvgViewProps::new(MARKUP).width(50u32).height(25u32)).unwrap();
        view.load().await;

        let mut surface = RecordingSurface::default();
        view.present(&mut surface, 200.0, 200.0);

        assert_eq!(surface.calls, vec![format!("markup:{MARKUP}:50x25")]);
    }

    #[tokio::test]
    async fn test_present_uses_custom_loading_view() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(MARKUP)
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let view = SvgView::new(
            SvgViewProps::new(server.uri())
                .loading_view(|surface, width, height| surface.draw_markup("custom", width, height)),
        )
        .unwrap();

        let task = {
            let view = view.clone();
            tokio::spawn(async move { view.load().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut surface = RecordingSurface::default();
        view.present(&mut surface, 200.0, 200.0);
        assert_eq!(surface.calls, vec!["markup:custom:100x100".to_string()]);

        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_events_announce_transitions() {
        let server = MockServer::start().await;
        mock_markup(&server, "/icon.svg", MARKUP, 1).await;

        let view = SvgView::new(SvgViewProps::new(format!("{}/icon.svg", server.uri()))).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        view.set_event_sender(tx);

        view.load().await;

        assert_eq!(rx.recv().await, Some(ViewEvent::Loading));
        assert_eq!(rx.recv().await, Some(ViewEvent::Ready));
    }

    #[tokio::test]
    async fn test_update_props_affects_next_plan() {
        let view = SvgView::new(SvgViewProps::new("<svg><rect/></svg>")).unwrap();
        view.load().await;
        assert_eq!(
            view.plan(),
            RenderPlan::Markup("<svg><rect/></svg>".to_string())
        );

        // Overrides are derived at plan time, never stored in the state
        view.update(|props| props.fill = Some("#F00".to_string()));
        assert_eq!(
            view.plan(),
            RenderPlan::Markup("<svg fill=\"#F00\"><rect/></svg>".to_string())
        );
    }

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(Dimension::parse("120"), Some(Dimension::Px(120.0)));
        assert_eq!(Dimension::parse("120px"), Some(Dimension::Px(120.0)));
        assert_eq!(Dimension::parse("50%"), Some(Dimension::Percent(50.0)));
        assert_eq!(Dimension::parse("not a size"), None);
    }

    #[test]
    fn test_dimension_to_px() {
        assert_eq!(Dimension::Px(120.0).to_px(1000.0), 120.0);
        assert_eq!(Dimension::Percent(50.0).to_px(400.0), 200.0);
    }

    #[test]
    fn test_props_defaults() {
        let props = SvgViewProps::default();
        assert!(props.show_loading);
        assert!(props.cache);
        assert_eq!(props.timeout, Duration::from_millis(10_000));
        assert_eq!(props.width, Dimension::Px(100.0));
        assert_eq!(props.height, Dimension::Px(100.0));
    }
}
