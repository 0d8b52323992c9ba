//! VTT Thumbs Core Library
//!
//! This library provides the data structures and the timed-text parsing used
//! to drive seek-bar preview thumbnails: a cue file maps playback time ranges
//! to rectangles inside one or more sprite sheet images.

pub mod cue;
pub mod parser;
pub mod sprite;
pub mod timeline;
pub mod url;

pub use cue::{SpriteRect, SpriteRef, StyleToken, ThumbnailCue};
pub use parser::{leading_integer, seconds_from_timestamp, CueFileParser, ParserOptions};
pub use sprite::parse_sprite_ref;
pub use timeline::ThumbnailTimeline;
pub use url::{directory_of, resolve, DocumentLocation};

/// Result type for vtt-thumbs-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vtt-thumbs-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed cue block: {0}")]
    MalformedCueBlock(String),

    #[error("Malformed sprite reference: {0}")]
    MalformedSpriteRef(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
