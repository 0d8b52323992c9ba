//! Interfaces of the collaborators the overlay is embedded in
//!
//! The overlay never touches a player, a document or the network directly.
//! A host implements these traits and forwards events back into
//! [`ThumbnailOverlay`](crate::ThumbnailOverlay).

use crate::ThumbnailStyle;
use vtt_thumbs_core::DocumentLocation;

/// Pointer events the overlay listens for on the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Enter,
    Leave,
    Move,
}

/// Handle of one registered progress-bar listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The video player the overlay is attached to
pub trait HostPlayer {
    /// Current media duration in seconds
    fn duration(&self) -> f64;

    /// Location of the page hosting the player
    fn location(&self) -> DocumentLocation;

    /// Rendered width of the progress bar in pixels
    fn progress_bar_width(&self) -> f64;

    /// Registers a listener on the progress bar.
    ///
    /// The host reports each matching event through
    /// [`ThumbnailOverlay::handle_pointer_event`](crate::ThumbnailOverlay::handle_pointer_event)
    /// with the pointer position as a fraction of the bar width.
    fn add_listener(&mut self, kind: PointerEventKind) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);

    /// Shows or hides the player's native time tooltip
    fn set_time_tooltip_visible(&mut self, visible: bool);
}

/// The single overlay node appended to the progress bar
pub trait OverlayDom {
    fn append_overlay(&mut self);
    fn remove_overlay(&mut self);
    fn set_visible(&mut self, visible: bool);
    /// Sets the left offset of the overlay, in pixels from the bar's left edge
    fn set_left(&mut self, px: f64);
    fn apply_style(&mut self, style: &ThumbnailStyle);
    /// Starts a fire-and-forget load of an image
    fn prefetch_image(&self, url: &str);
}

/// Load cycle tag; results of older cycles are discarded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A cue file fetch issued by the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub generation: Generation,
}

/// Transport used to load cue files.
///
/// Completion is reported through
/// [`ThumbnailOverlay::on_cue_file_loaded`](crate::ThumbnailOverlay::on_cue_file_loaded)
/// with the request's generation. A failed fetch is simply never reported.
pub trait CueFetcher {
    fn fetch_text(&mut self, request: FetchRequest);
}

/// Listeners registered together and removed with a single call
#[derive(Debug, Default)]
pub struct Subscription {
    listeners: Vec<(PointerEventKind, ListenerId)>,
}

impl Subscription {
    /// Registers one listener per kind
    pub fn attach<H: HostPlayer + ?Sized>(host: &mut H, kinds: &[PointerEventKind]) -> Self {
        let listeners = kinds
            .iter()
            .map(|&kind| (kind, host.add_listener(kind)))
            .collect();
        Self { listeners }
    }

    /// Kind of the listener with the given id, if it belongs to this subscription
    pub fn kind_of(&self, id: ListenerId) -> Option<PointerEventKind> {
        self.listeners
            .iter()
            .find(|(_, listener)| *listener == id)
            .map(|(kind, _)| *kind)
    }

    /// Removes every listener of this subscription
    pub fn detach<H: HostPlayer + ?Sized>(self, host: &mut H) {
        for (_, id) in self.listeners {
            host.remove_listener(id);
        }
    }
}
