//! Cue and sprite reference data structures

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::Serialize;

static NEXT_STYLE_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identity of the style computed for one parsed cue.
///
/// Every cue gets a fresh token when it is parsed, so two cues with identical
/// sprite rectangles still compare as different styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StyleToken(u64);

impl StyleToken {
    /// Allocates a token that has never been handed out before
    pub fn fresh() -> Self {
        Self(NEXT_STYLE_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw token value
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Pixel rectangle of one frame inside a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl SpriteRect {
    /// Creates a new sprite rectangle
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// A sprite image URL plus the rectangle of the frame inside it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpriteRef {
    /// Image URL, resolved against the cue file's location when parsed
    pub image_url: String,
    /// Frame rectangle inside the image
    pub rect: SpriteRect,
    /// CSS width of the thumbnail (defaults to `{w}px`)
    pub display_width: String,
    /// CSS height of the thumbnail (defaults to `{h}px`)
    pub display_height: String,
}

impl SpriteRef {
    /// Creates a sprite reference displayed at its own pixel size
    pub fn new(image_url: impl Into<String>, rect: SpriteRect) -> Self {
        Self {
            image_url: image_url.into(),
            rect,
            display_width: format!("{}px", rect.w),
            display_height: format!("{}px", rect.h),
        }
    }

    /// Replaces the display size with configured CSS lengths, where given
    pub fn with_display_size(mut self, width: Option<&str>, height: Option<&str>) -> Self {
        if let Some(width) = width {
            self.display_width = width.to_string();
        }
        if let Some(height) = height {
            self.display_height = height.to_string();
        }
        self
    }
}

/// One timed entry of a thumbnail track
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ThumbnailCue {
    /// Start time in seconds (inclusive)
    pub start: f64,
    /// End time in seconds (exclusive)
    pub end: f64,
    /// Frame to show, `None` when the cue has no usable payload
    pub sprite: Option<SpriteRef>,
    /// Identity of this cue's style
    pub style: StyleToken,
}

impl ThumbnailCue {
    /// Creates a new cue with a fresh style token
    pub fn new(start: f64, end: f64, sprite: Option<SpriteRef>) -> Self {
        Self {
            start,
            end,
            sprite,
            style: StyleToken::fresh(),
        }
    }

    /// Checks if this cue covers the given time
    pub fn is_active(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Returns the duration of this cue in seconds
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}
