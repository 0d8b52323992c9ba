//! Ordered cue sequence of one loaded thumbnail track

use crate::{CueFileParser, ThumbnailCue};

/// Cues of one track, in the order they appeared in the cue file
#[derive(Debug, Clone, Default)]
pub struct ThumbnailTimeline {
    cues: Vec<ThumbnailCue>,
}

impl ThumbnailTimeline {
    /// Creates a timeline from already ordered cues
    pub fn new(cues: Vec<ThumbnailCue>) -> Self {
        Self { cues }
    }

    /// Parses a cue file into a timeline
    pub fn parse(parser: &CueFileParser, raw: &str) -> Self {
        Self::new(parser.parse(raw))
    }

    /// Gets the first cue, in file order, whose half-open range covers `time`
    pub fn lookup(&self, time: f64) -> Option<&ThumbnailCue> {
        self.cues.iter().find(|cue| cue.is_active(time))
    }

    /// All cues in file order
    pub fn cues(&self) -> &[ThumbnailCue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// End of the last cue, in seconds
    pub fn end(&self) -> Option<f64> {
        self.cues.last().map(|cue| cue.end)
    }

    /// Serializes the cues as pretty-printed JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&self.cues)?)
    }
}
