//! VTT Thumbs Overlay Library
//!
//! This library positions a preview thumbnail over a player's progress bar
//! and manages its lifecycle across source changes. The player, its DOM and
//! the network are reached through the traits in [`host`].

pub mod config;
pub mod host;
pub mod lifecycle;
pub mod positioning;
pub mod prefetch;

pub use config::OverlayOptions;
pub use host::{
    CueFetcher, FetchRequest, Generation, HostPlayer, ListenerId, OverlayDom, PointerEventKind,
    Subscription,
};
pub use lifecycle::{LifecyclePhase, OverlayState, ThumbnailOverlay};
pub use positioning::{thumbnail_left, Placement, PositioningEngine, ThumbnailStyle};
pub use prefetch::ImagePrefetchCache;

/// Result type for vtt-thumbs-overlay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vtt-thumbs-overlay operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("VTT thumbs core error: {0}")]
    Core(#[from] vtt_thumbs_core::Error),

    #[error("No cue file source configured")]
    ConfigurationMissing,

    #[cfg(feature = "serde")]
    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),
}
