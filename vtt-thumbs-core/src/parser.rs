//! Timed-text cue file parsing

use crate::{parse_sprite_ref, resolve, url, Error, Result, SpriteRef, ThumbnailCue};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static TIMING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[0-9]{2}:)?(?:[0-9]{2}:)?[0-9]{2}(?:.[0-9]{3})? *--> *(?:[0-9]{2}:)?(?:[0-9]{2}:)?[0-9]{2}(?:.[0-9]{3})?",
    )
    .expect("valid timing pattern")
});

static ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *--> *").expect("valid arrow pattern"));

/// Context needed to turn sprite payloads into fully qualified references
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Base that sprite image URLs are resolved against
    pub sprite_base: String,
    /// CSS width override for every thumbnail
    pub thumbnail_width: Option<String>,
    /// CSS height override for every thumbnail
    pub thumbnail_height: Option<String>,
}

impl ParserOptions {
    /// Builds options for a cue file at `src` loaded from a page at `page_base`.
    ///
    /// Sprite references are relative to the cue file, so an absolute `src`
    /// provides its own directory and a relative one is appended to the page base.
    pub fn for_source(src: &str, page_base: &str) -> Self {
        let sprite_base = if src.contains("//") {
            url::directory_of(src).to_string()
        } else {
            format!("{}{}", page_base, url::directory_of(src))
        };

        Self {
            sprite_base,
            ..Self::default()
        }
    }

    /// Sets the CSS size overrides
    pub fn with_thumbnail_size(mut self, width: Option<String>, height: Option<String>) -> Self {
        self.thumbnail_width = width;
        self.thumbnail_height = height;
        self
    }
}

/// Turns raw cue file text into an ordered list of thumbnail cues
#[derive(Debug, Clone, Default)]
pub struct CueFileParser {
    options: ParserOptions,
}

impl CueFileParser {
    /// Creates a new parser
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parses a cue file.
    ///
    /// Never fails: blocks without a timing line are skipped and cues whose
    /// payload is not a valid sprite reference are kept with no sprite.
    pub fn parse(&self, raw: &str) -> Vec<ThumbnailCue> {
        let normalized = raw.replace("\r\n", "\n");
        let mut cues = Vec::new();

        for block in normalized.split("\n\n") {
            match self.parse_block(block) {
                Ok(cue) => cues.push(cue),
                Err(e) => debug!("Skipping cue block: {}", e),
            }
        }

        debug!("Parsed {} cues", cues.len());
        cues
    }

    fn parse_block(&self, block: &str) -> Result<ThumbnailCue> {
        let mut lines = block
            .split(['\n', '\r'])
            .skip_while(|line| line.trim().is_empty());

        let timing = lines
            .next()
            .filter(|line| TIMING_LINE.is_match(line))
            .ok_or_else(|| Error::MalformedCueBlock(first_line(block).to_string()))?;
        let payload = lines
            .next()
            .ok_or_else(|| Error::MalformedCueBlock(format!("no payload after {:?}", timing)))?;

        let mut endpoints = ARROW.splitn(timing, 2);
        let start = seconds_from_timestamp(endpoints.next().unwrap_or_default())?;
        // Cue settings may follow the end timestamp
        let end = endpoints
            .next()
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap_or_default();
        let end = seconds_from_timestamp(end)?;
        if start >= end {
            return Err(Error::MalformedCueBlock(format!(
                "empty time range in {:?}",
                timing
            )));
        }

        let sprite = match parse_sprite_ref(Some(payload)) {
            Ok(sprite) => sprite.map(|sprite| {
                let image_url = resolve(&sprite.image_url, &self.options.sprite_base);
                SpriteRef { image_url, ..sprite }.with_display_size(
                    self.options.thumbnail_width.as_deref(),
                    self.options.thumbnail_height.as_deref(),
                )
            }),
            Err(e) => {
                debug!("Cue at {}s has no sprite: {}", start, e);
                None
            }
        };

        Ok(ThumbnailCue::new(start, end, sprite))
    }
}

fn first_line(block: &str) -> &str {
    block.trim_start().lines().next().unwrap_or_default()
}

/// Converts `[[HH:]MM:]SS[.mmm]` to seconds.
///
/// Each colon-separated group is read as its leading integer, so the
/// fractional part of the seconds group is dropped: `"00:01:30.500"` is 90.
pub fn seconds_from_timestamp(timestamp: &str) -> Result<f64> {
    let mut seconds = 0i64;
    let mut multiplier = 1i64;

    let invalid = || Error::InvalidTimestamp(timestamp.to_string());

    for (i, part) in timestamp.split(':').rev().enumerate() {
        if i > 0 {
            multiplier = multiplier.checked_mul(60).ok_or_else(invalid)?;
        }
        let value = leading_integer(part).ok_or_else(invalid)?;
        seconds = value
            .checked_mul(multiplier)
            .and_then(|scaled| seconds.checked_add(scaled))
            .ok_or_else(invalid)?;
    }

    Ok(seconds as f64)
}

/// Reads the integer at the start of `text`, after optional whitespace and sign.
///
/// `"120px"` gives 120, `"05.000 align:start"` gives 5, `"auto"` gives `None`.
pub fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpriteRect;

    const TWO_CUES: &str = "00:00:00.000 --> 00:00:05.000\na.jpg#xywh=0,0,100,80\n\n00:00:05.000 --> 00:00:10.000\nb.jpg#xywh=100,0,100,80";

    #[test]
    fn test_parse_two_cues() {
        let cues = CueFileParser::default().parse(TWO_CUES);

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].start, 0.0);
        assert_eq!(cues[0].end, 5.0);
        assert_eq!(cues[1].start, 5.0);
        assert_eq!(cues[1].end, 10.0);

        let a = cues[0].sprite.as_ref().unwrap();
        assert_eq!(a.image_url, "a.jpg");
        assert_eq!(a.rect, SpriteRect::new(0, 0, 100, 80));
        let b = cues[1].sprite.as_ref().unwrap();
        assert_eq!(b.image_url, "b.jpg");
        assert_eq!(b.rect, SpriteRect::new(100, 0, 100, 80));
    }

    #[test]
    fn test_header_and_crlf() {
        let raw = "WEBVTT\r\n\r\n00:01.000 --> 00:02.000\r\na.jpg#xywh=0,0,10,10\r\n\r\nNOTE just a note\r\n";
        let cues = CueFileParser::default().parse(raw);

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 1.0);
        assert_eq!(cues[0].end, 2.0);
    }

    #[test]
    fn test_extra_blank_lines_before_timing() {
        let raw = "WEBVTT\n\n\n00:01.000 --> 00:02.000\na.jpg#xywh=0,0,10,10\n";
        let cues = CueFileParser::default().parse(raw);
        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn test_block_without_payload_is_skipped() {
        let raw = "00:00.000 --> 00:05.000";
        assert!(CueFileParser::default().parse(raw).is_empty());
    }

    #[test]
    fn test_malformed_sprite_keeps_cue() {
        let raw = "00:00.000 --> 00:05.000\na.jpg#xywh=0,0\n\n00:05.000 --> 00:10.000\n";
        let cues = CueFileParser::default().parse(raw);

        assert_eq!(cues.len(), 2);
        assert!(cues[0].sprite.is_none());
        assert!(cues[1].sprite.is_none());
    }

    #[test]
    fn test_no_cues() {
        assert!(CueFileParser::default().parse("WEBVTT\n\nnothing here").is_empty());
        assert!(CueFileParser::default().parse("").is_empty());
    }

    #[test]
    fn test_parse_order_is_kept() {
        let raw = "00:10.000 --> 00:20.000\nb.jpg#xywh=0,0,1,1\n\n00:00.000 --> 00:10.000\na.jpg#xywh=0,0,1,1";
        let cues = CueFileParser::default().parse(raw);
        assert_eq!(cues[0].start, 10.0);
        assert_eq!(cues[1].start, 0.0);
    }

    #[test]
    fn test_timestamps_truncate_fractions() {
        assert_eq!(seconds_from_timestamp("00:01:30.500").unwrap(), 90.0);
        assert_eq!(seconds_from_timestamp("01:02:03.999").unwrap(), 3723.0);
        assert_eq!(seconds_from_timestamp("02:03.250").unwrap(), 123.0);
        assert_eq!(seconds_from_timestamp("07.900").unwrap(), 7.0);
        assert_eq!(seconds_from_timestamp("05.000 align:start").unwrap(), 5.0);
        assert!(seconds_from_timestamp("aa:00").is_err());
    }

    #[test]
    fn test_timestamp_overflow_is_an_error() {
        let many_groups = vec!["01"; 12].join(":");
        assert!(matches!(
            seconds_from_timestamp(&many_groups),
            Err(Error::InvalidTimestamp(_))
        ));
        assert!(seconds_from_timestamp("999999999999999999:00").is_err());
        assert!(seconds_from_timestamp("9223372036854775807").is_ok());
    }

    #[test]
    fn test_timing_line_with_cue_settings() {
        let raw = "WEBVTT\n\n00:00.000 --> 00:05.000 align:start\na.jpg#xywh=0,0,10,10";
        let cues = CueFileParser::default().parse(raw);

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 0.0);
        assert_eq!(cues[0].end, 5.0);
        assert!(cues[0].sprite.is_some());
    }

    #[test]
    fn test_comma_fraction_separator() {
        let raw = "WEBVTT\n\n00:01,000 --> 00:05,500\na.jpg#xywh=0,0,10,10";
        let cues = CueFileParser::default().parse(raw);

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 1.0);
        assert_eq!(cues[0].end, 5.0);
    }

    #[test]
    fn test_sub_second_cue_collapses() {
        let raw = "00:00.100 --> 00:00.900\na.jpg#xywh=0,0,1,1";
        assert!(CueFileParser::default().parse(raw).is_empty());
    }

    #[test]
    fn test_sprites_resolve_against_cue_file() {
        let options = ParserOptions::for_source("https://cdn.x.com/thumbs/t.vtt", "https://x.com/");
        assert_eq!(options.sprite_base, "https://cdn.x.com/thumbs/");

        let options = ParserOptions::for_source("thumbs/t.vtt", "https://x.com/watch/")
            .with_thumbnail_size(Some("120px".to_string()), None);
        let cues = CueFileParser::new(options).parse("00:00.000 --> 00:05.000\nsprite.jpg#xywh=0,0,160,90");
        let sprite = cues[0].sprite.as_ref().unwrap();

        assert_eq!(sprite.image_url, "https://x.com/watch/thumbs/sprite.jpg");
        assert_eq!(sprite.display_width, "120px");
        assert_eq!(sprite.display_height, "90px");
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("120px"), Some(120));
        assert_eq!(leading_integer("  -4em"), Some(-4));
        assert_eq!(leading_integer("50%"), Some(50));
        assert_eq!(leading_integer("auto"), None);
        assert_eq!(leading_integer(""), None);
    }
}
