//! Parsing of `IMAGE_URL#xywh=X,Y,W,H` cue payloads

use crate::{Error, Result, SpriteRect, SpriteRef};
use regex::Regex;
use std::sync::LazyLock;

static XYWH_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)#xywh=").expect("valid marker pattern"));

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digit pattern"));

/// Parses the payload line of a cue into a sprite reference.
///
/// An absent or empty line yields `Ok(None)`. The image URL is returned as
/// written; resolving it is up to the caller. Any non-digit separator between
/// the four coordinates is accepted, extra numbers are ignored.
pub fn parse_sprite_ref(payload: Option<&str>) -> Result<Option<SpriteRef>> {
    let line = match payload {
        Some(line) if !line.is_empty() => line,
        _ => return Ok(None),
    };

    let mut parts = XYWH_MARKER.splitn(line, 2);
    let image_url = parts.next().unwrap_or_default();
    let coords = parts
        .next()
        .ok_or_else(|| Error::MalformedSpriteRef(format!("missing #xywh= in {:?}", line)))?;

    let mut values = [0u32; 4];
    let mut runs = DIGIT_RUN.find_iter(coords);
    for value in values.iter_mut() {
        let run = runs.next().ok_or_else(|| {
            Error::MalformedSpriteRef(format!("expected 4 coordinates in {:?}", coords))
        })?;
        *value = run.as_str().parse().map_err(|_| {
            Error::MalformedSpriteRef(format!("coordinate out of range: {}", run.as_str()))
        })?;
    }

    let [x, y, w, h] = values;
    Ok(Some(SpriteRef::new(image_url, SpriteRect::new(x, y, w, h))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sprite_ref() {
        let sprite = parse_sprite_ref(Some("sprites/a.jpg#xywh=100,0,160,90"))
            .unwrap()
            .unwrap();
        assert_eq!(sprite.image_url, "sprites/a.jpg");
        assert_eq!(sprite.rect, SpriteRect::new(100, 0, 160, 90));
        assert_eq!(sprite.display_width, "160px");
        assert_eq!(sprite.display_height, "90px");
    }

    #[test]
    fn test_any_separator_between_coordinates() {
        let sprite = parse_sprite_ref(Some("a.jpg#XYWH=1 x 2;3/4,99"))
            .unwrap()
            .unwrap();
        assert_eq!(sprite.rect, SpriteRect::new(1, 2, 3, 4));
    }

    #[test]
    fn test_absent_payload_is_empty_sprite() {
        assert!(parse_sprite_ref(None).unwrap().is_none());
        assert!(parse_sprite_ref(Some("")).unwrap().is_none());
    }

    #[test]
    fn test_malformed_sprite_refs() {
        assert!(matches!(
            parse_sprite_ref(Some("a.jpg#xywh=0,0,100")),
            Err(Error::MalformedSpriteRef(_))
        ));
        assert!(matches!(
            parse_sprite_ref(Some("a.jpg")),
            Err(Error::MalformedSpriteRef(_))
        ));
        assert!(matches!(
            parse_sprite_ref(Some("a.jpg#xywh=0,0,99999999999,1")),
            Err(Error::MalformedSpriteRef(_))
        ));
    }
}
