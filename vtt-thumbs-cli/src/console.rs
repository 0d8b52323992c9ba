//! Headless host that prints every overlay operation

use std::collections::{HashMap, VecDeque};
use vtt_thumbs_core::DocumentLocation;
use vtt_thumbs_overlay::{
    CueFetcher, FetchRequest, HostPlayer, ListenerId, OverlayDom, PointerEventKind,
    ThumbnailStyle,
};

/// Player with a fixed duration and progress bar width
pub struct ConsoleHost {
    duration: f64,
    bar_width: f64,
    location: DocumentLocation,
    listeners: HashMap<ListenerId, PointerEventKind>,
    next_listener: u64,
}

impl ConsoleHost {
    pub fn new(duration: f64, bar_width: f64, location: DocumentLocation) -> Self {
        Self {
            duration,
            bar_width,
            location,
            listeners: HashMap::new(),
            next_listener: 0,
        }
    }

    /// Currently registered listener of the given kind
    pub fn listener(&self, kind: PointerEventKind) -> Option<ListenerId> {
        self.listeners
            .iter()
            .find(|(_, registered)| **registered == kind)
            .map(|(id, _)| *id)
    }
}

impl HostPlayer for ConsoleHost {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn location(&self) -> DocumentLocation {
        self.location.clone()
    }

    fn progress_bar_width(&self) -> f64 {
        self.bar_width
    }

    fn add_listener(&mut self, kind: PointerEventKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, kind);
        println!("  listen   {:?} #{}", kind, id.0);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if let Some(kind) = self.listeners.remove(&id) {
            println!("  unlisten {:?} #{}", kind, id.0);
        }
    }

    fn set_time_tooltip_visible(&mut self, visible: bool) {
        println!("  tooltip  {}", if visible { "shown" } else { "hidden" });
    }
}

/// Overlay node that only reports what would change
pub struct ConsoleDom;

impl OverlayDom for ConsoleDom {
    fn append_overlay(&mut self) {
        println!("  append   overlay");
    }

    fn remove_overlay(&mut self) {
        println!("  remove   overlay");
    }

    fn set_visible(&mut self, visible: bool) {
        println!("  visible  {}", visible);
    }

    fn set_left(&mut self, px: f64) {
        println!("  left     {}px", px);
    }

    fn apply_style(&mut self, style: &ThumbnailStyle) {
        for (name, value) in style.properties() {
            println!("  style    {}: {}", name, value);
        }
    }

    fn prefetch_image(&self, url: &str) {
        println!("  prefetch {}", url);
    }
}

/// Queues fetch requests for the caller to complete from disk
#[derive(Default)]
pub struct QueuedFetcher {
    pending: VecDeque<FetchRequest>,
}

impl QueuedFetcher {
    pub fn next_request(&mut self) -> Option<FetchRequest> {
        self.pending.pop_front()
    }
}

impl CueFetcher for QueuedFetcher {
    fn fetch_text(&mut self, request: FetchRequest) {
        println!("  fetch    {} (generation {})", request.url, request.generation.get());
        self.pending.push_back(request);
    }
}
