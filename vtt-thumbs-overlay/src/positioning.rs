//! Thumbnail placement over the progress bar

use tracing::trace;
use vtt_thumbs_core::{leading_integer, SpriteRef, StyleToken, ThumbnailCue, ThumbnailTimeline};

/// CSS properties that select one sprite frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailStyle {
    /// Identity of the cue this style was computed for
    pub token: StyleToken,
    pub background_image: String,
    pub background_position: String,
    pub background_size: String,
    pub width: String,
    pub height: String,
}

impl ThumbnailStyle {
    /// Builds the style for a cue's sprite
    pub fn for_sprite(token: StyleToken, sprite: &SpriteRef) -> Self {
        let rect = sprite.rect;
        Self {
            token,
            background_image: format!("url({})", sprite.image_url),
            background_position: format!("-{}px -{}px", rect.x, rect.y),
            background_size: format!("{}px {}px", rect.w, rect.h),
            width: sprite.display_width.clone(),
            height: sprite.display_height.clone(),
        }
    }

    /// Property name and value pairs, using CSS property names
    pub fn properties(&self) -> [(&'static str, &str); 5] {
        [
            ("background-image", &self.background_image),
            ("background-position", &self.background_position),
            ("background-size", &self.background_size),
            ("width", &self.width),
            ("height", &self.height),
        ]
    }
}

/// Outcome of placing the thumbnail for one pointer position
#[derive(Debug, Clone, PartialEq)]
pub enum Placement<'t> {
    /// No cue covers the pointed time
    Hide,
    Show {
        cue: &'t ThumbnailCue,
        /// Left offset in pixels; `None` when the thumbnail width is unknown
        left: Option<f64>,
        /// Style to apply; `None` when the cue's style is already applied
        /// or the cue has no sprite
        style: Option<ThumbnailStyle>,
    },
}

/// Computes left offset and style updates, suppressing redundant style changes
#[derive(Debug, Default)]
pub struct PositioningEngine {
    last_applied: Option<StyleToken>,
}

impl PositioningEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the thumbnail for a pointer at `pointer_fraction` of the bar.
    ///
    /// The left offset is produced on every call. The style is produced only
    /// when the matched cue differs from the one whose style was last applied.
    pub fn compute_style<'t>(
        &mut self,
        pointer_fraction: f64,
        bar_width: f64,
        duration: f64,
        timeline: &'t ThumbnailTimeline,
    ) -> Placement<'t> {
        let time = pointer_fraction * duration;
        let Some(cue) = timeline.lookup(time) else {
            trace!("No thumbnail at {:.3}s", time);
            return Placement::Hide;
        };

        let x_pos = pointer_fraction * bar_width;
        let left = cue
            .sprite
            .as_ref()
            .and_then(|sprite| leading_integer(&sprite.display_width))
            .and_then(|thumb_width| thumbnail_left(x_pos, bar_width, thumb_width));

        let style = if self.last_applied == Some(cue.style) {
            None
        } else {
            self.last_applied = Some(cue.style);
            cue.sprite
                .as_ref()
                .map(|sprite| ThumbnailStyle::for_sprite(cue.style, sprite))
        };

        trace!("Thumbnail at {:.3}s, left {:?}", time, left);
        Placement::Show { cue, left, style }
    }

    /// Token of the style applied last
    pub fn last_applied(&self) -> Option<StyleToken> {
        self.last_applied
    }

    /// Forgets the applied style so the next placement restyles
    pub fn reset(&mut self) {
        self.last_applied = None;
    }
}

/// Left offset of a thumbnail centered on `x_pos`, kept inside the bar.
///
/// A thumbnail wider than the bar is centered on the bar instead, which
/// gives a negative offset.
pub fn thumbnail_left(x_pos: f64, bar_width: f64, thumb_width: i64) -> Option<f64> {
    let width = thumb_width as f64;
    let half = (thumb_width >> 1) as f64;
    let margin_right = bar_width - (x_pos + half);
    let margin_left = x_pos - half;

    if bar_width < width {
        Some(-(width - bar_width) / 2.0)
    } else if margin_left > 0.0 && margin_right > 0.0 {
        Some(x_pos - half)
    } else if margin_left <= 0.0 {
        Some(0.0)
    } else if margin_right <= 0.0 {
        Some(bar_width - width)
    } else {
        None
    }
}
