//! Overlay configuration

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Options recognized by the thumbnail overlay.
///
/// Field names follow the host player's camelCase option keys when read
/// from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct OverlayOptions {
    /// URL of the cue file; the overlay stays inactive without it
    pub src: Option<String>,
    /// Keep the host's own time tooltip while thumbnails are shown
    pub show_timestamp: bool,
    /// CSS width override, defaults to the sprite rectangle's width
    pub thumbnail_width: Option<String>,
    /// CSS height override, defaults to the sprite rectangle's height
    pub thumbnail_height: Option<String>,
}

impl OverlayOptions {
    /// Creates options for the given cue file
    pub fn with_source(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::default()
        }
    }

    /// Returns the configured cue file source, if it is set and not empty
    pub fn source(&self) -> Result<&str> {
        match self.src.as_deref() {
            Some(src) if !src.trim().is_empty() => Ok(src),
            _ => Err(Error::ConfigurationMissing),
        }
    }

    /// Reads options from the host's JSON configuration object
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source() {
        assert!(matches!(
            OverlayOptions::default().source(),
            Err(Error::ConfigurationMissing)
        ));
        assert!(matches!(
            OverlayOptions::with_source("").source(),
            Err(Error::ConfigurationMissing)
        ));
        assert_eq!(OverlayOptions::with_source("t.vtt").source().unwrap(), "t.vtt");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let options = OverlayOptions::from_json(
            r#"{"src": "thumbs.vtt", "showTimestamp": true, "thumbnailWidth": "120px"}"#,
        )
        .unwrap();

        assert_eq!(options.src.as_deref(), Some("thumbs.vtt"));
        assert!(options.show_timestamp);
        assert_eq!(options.thumbnail_width.as_deref(), Some("120px"));
        assert!(options.thumbnail_height.is_none());

        assert_eq!(OverlayOptions::from_json("{}").unwrap(), OverlayOptions::default());
        assert!(OverlayOptions::from_json("[1]").is_err());
    }
}
