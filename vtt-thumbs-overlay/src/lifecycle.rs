//! Overlay lifecycle: loading, pointer wiring and teardown

use crate::{
    CueFetcher, FetchRequest, Generation, HostPlayer, ImagePrefetchCache, ListenerId, OverlayDom,
    OverlayOptions, Placement, PointerEventKind, PositioningEngine, Subscription,
};
use std::sync::Arc;
use tracing::{debug, info, trace};
use vtt_thumbs_core::{resolve, CueFileParser, ParserOptions, StyleToken, ThumbnailTimeline};

/// Where the overlay is in its load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// No source is configured, or the overlay was detached
    Idle,
    /// A cue file fetch of the given generation is in flight
    Loading(Generation),
    /// The timeline is loaded and listeners are attached
    Ready,
}

/// Everything the overlay sets up for one loaded source
#[derive(Debug, Default)]
pub struct OverlayState {
    timeline: Option<ThumbnailTimeline>,
    engine: PositioningEngine,
    bar_listeners: Option<Subscription>,
    move_listener: Option<Subscription>,
    overlay_appended: bool,
    tooltip_hidden: bool,
    visible: bool,
}

impl OverlayState {
    pub fn active_timeline(&self) -> Option<&ThumbnailTimeline> {
        self.timeline.as_ref()
    }

    pub fn last_applied_style(&self) -> Option<StyleToken> {
        self.engine.last_applied()
    }

    pub fn listeners_attached(&self) -> bool {
        self.bar_listeners.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Seek-bar thumbnail overlay bound to one host player.
///
/// All methods run on the host's event loop. The host forwards fetch
/// completions and pointer events; the overlay drives the DOM in return.
pub struct ThumbnailOverlay<H, D, F> {
    host: H,
    dom: D,
    fetcher: F,
    options: OverlayOptions,
    prefetch: Arc<ImagePrefetchCache>,
    phase: LifecyclePhase,
    generation: Generation,
    state: OverlayState,
}

impl<H: HostPlayer, D: OverlayDom, F: CueFetcher> ThumbnailOverlay<H, D, F> {
    /// Creates an overlay using the process-wide prefetch cache and starts
    /// loading `options.src` if it is set
    pub fn new(host: H, dom: D, fetcher: F, options: OverlayOptions) -> Self {
        Self::with_prefetch_cache(host, dom, fetcher, options, ImagePrefetchCache::shared())
    }

    /// Creates an overlay that prefetches through the given cache
    pub fn with_prefetch_cache(
        host: H,
        dom: D,
        fetcher: F,
        options: OverlayOptions,
        prefetch: Arc<ImagePrefetchCache>,
    ) -> Self {
        let mut overlay = Self {
            host,
            dom,
            fetcher,
            options,
            prefetch,
            phase: LifecyclePhase::Idle,
            generation: Generation::default(),
            state: OverlayState::default(),
        };
        overlay.initialize();
        overlay
    }

    /// Switches to a new cue file, discarding everything set up for the old one
    pub fn set_source(&mut self, src: impl Into<String>) {
        self.reset();
        self.options.src = Some(src.into());
        self.initialize();
    }

    /// Tears down the overlay node and listeners. Calling it again is a no-op.
    pub fn detach(&mut self) {
        self.reset();
    }

    /// Delivers the text of a fetched cue file.
    ///
    /// Results of any generation other than the one currently loading are
    /// ignored. Returns whether the result was applied.
    pub fn on_cue_file_loaded(&mut self, generation: Generation, text: &str) -> bool {
        if self.phase != LifecyclePhase::Loading(generation) {
            debug!(
                "Ignoring cue file of generation {} while {:?}",
                generation.get(),
                self.phase
            );
            return false;
        }

        let src = self.options.src.as_deref().unwrap_or_default();
        let page_base = self.host.location().base_url();
        let parser = CueFileParser::new(
            ParserOptions::for_source(src, &page_base).with_thumbnail_size(
                self.options.thumbnail_width.clone(),
                self.options.thumbnail_height.clone(),
            ),
        );
        let timeline = ThumbnailTimeline::parse(&parser, text);
        info!("Loaded {} thumbnail cues from {}", timeline.len(), src);

        self.state.timeline = Some(timeline);
        self.setup_thumbnail_element();
        self.phase = LifecyclePhase::Ready;
        true
    }

    /// Handles an event from a listener registered through [`HostPlayer::add_listener`].
    ///
    /// `pointer_fraction` is the pointer position relative to the bar width;
    /// it is only read for move events. Events of listeners that were
    /// already removed are ignored.
    pub fn handle_pointer_event(&mut self, listener: ListenerId, pointer_fraction: f64) {
        let kind = self
            .state
            .bar_listeners
            .as_ref()
            .and_then(|subscription| subscription.kind_of(listener))
            .or_else(|| {
                self.state
                    .move_listener
                    .as_ref()
                    .and_then(|subscription| subscription.kind_of(listener))
            });

        match kind {
            Some(PointerEventKind::Enter) => self.on_bar_enter(),
            Some(PointerEventKind::Leave) => self.on_bar_leave(),
            Some(PointerEventKind::Move) => self.on_bar_move(pointer_fraction),
            None => trace!("Ignoring event of stale listener {:?}", listener),
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }

    fn initialize(&mut self) {
        let src = match self.options.source() {
            Ok(src) => src,
            Err(e) => {
                debug!("Thumbnails inactive: {}", e);
                return;
            }
        };

        let url = resolve(src, &self.host.location().base_url());
        self.generation = self.generation.next();
        self.phase = LifecyclePhase::Loading(self.generation);

        info!("Fetching thumbnail cues from {}", url);
        self.fetcher.fetch_text(FetchRequest {
            url,
            generation: self.generation,
        });
    }

    fn setup_thumbnail_element(&mut self) {
        self.dom.append_overlay();
        self.state.overlay_appended = true;

        if !self.options.show_timestamp {
            self.host.set_time_tooltip_visible(false);
            self.state.tooltip_hidden = true;
        }

        self.state.bar_listeners = Some(Subscription::attach(
            &mut self.host,
            &[PointerEventKind::Enter, PointerEventKind::Leave],
        ));
    }

    fn on_bar_enter(&mut self) {
        if self.state.move_listener.is_none() {
            self.state.move_listener =
                Some(Subscription::attach(&mut self.host, &[PointerEventKind::Move]));
        }
        self.set_visible(true);
    }

    fn on_bar_leave(&mut self) {
        if let Some(subscription) = self.state.move_listener.take() {
            subscription.detach(&mut self.host);
        }
        self.set_visible(false);
    }

    fn on_bar_move(&mut self, pointer_fraction: f64) {
        let bar_width = self.host.progress_bar_width();
        let duration = self.host.duration();
        let Some(timeline) = self.state.timeline.as_ref() else {
            return;
        };

        match self
            .state
            .engine
            .compute_style(pointer_fraction, bar_width, duration, timeline)
        {
            Placement::Hide => {
                self.dom.set_visible(false);
                self.state.visible = false;
            }
            Placement::Show { cue, left, style } => {
                if let Some(sprite) = &cue.sprite {
                    let dom = &self.dom;
                    self.prefetch
                        .touch(&sprite.image_url, |url| dom.prefetch_image(url));
                }
                if let Some(left) = left {
                    self.dom.set_left(left);
                }
                if let Some(style) = &style {
                    self.dom.apply_style(style);
                }
            }
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.dom.set_visible(visible);
        self.state.visible = visible;
    }

    fn reset(&mut self) {
        if self.phase != LifecyclePhase::Idle {
            info!("Resetting thumbnails from {:?}", self.phase);
        }

        let state = std::mem::take(&mut self.state);
        if let Some(subscription) = state.move_listener {
            subscription.detach(&mut self.host);
        }
        if let Some(subscription) = state.bar_listeners {
            subscription.detach(&mut self.host);
        }
        if state.overlay_appended {
            self.dom.remove_overlay();
        }
        if state.tooltip_hidden {
            self.host.set_time_tooltip_visible(true);
        }

        self.phase = LifecyclePhase::Idle;
    }
}
