use crate::utils::is_truthy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of media attached to an entry
///
/// Lowercase on the wire. The upstream API emits `image`, `video` and `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Image,
    Video,
    /// Interactive or embedded content without a direct media URL
    Other,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Other => "other",
        }
    }

    /// Exact wire value; `None` for anything the upstream may add later
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            "other" => Some(MediaType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media recovered from the APOD web page when the API response has none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMedia {
    pub media_type: MediaType,
    /// Always absolute
    pub url: String,
}

/// One day's entry as returned to the client
///
/// Holds the upstream JSON object as-is. Only `apply_extraction` writes to it,
/// so a payload that needs no extraction is serialized back byte-for-byte in
/// content: nulls, missing keys and unknown `media_type` values included.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaEntry {
    fields: Map<String, Value>,
}

impl MediaEntry {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// YYYY-MM-DD
    pub fn date(&self) -> Option<&str> {
        self.str_field("date")
    }

    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }

    /// `media_type` exactly as the upstream sent it
    pub fn raw_media_type(&self) -> Option<&str> {
        self.str_field("media_type")
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.raw_media_type().and_then(MediaType::parse)
    }

    pub fn extracted_from_page(&self) -> bool {
        self.fields.get("extracted_from_page").and_then(Value::as_bool) == Some(true)
    }

    /// Whether the upstream payload lacks a usable direct media URL
    ///
    /// `other` always does. Any other present `media_type` does when `url` is
    /// missing, null or empty. No `media_type` at all never does.
    pub fn needs_extraction(&self) -> bool {
        let has_url = self.fields.get("url").is_some_and(is_truthy);

        match self.fields.get("media_type") {
            Some(Value::String(s)) if s == "other" => true,
            Some(media_type) if is_truthy(media_type) => !has_url,
            _ => false,
        }
    }

    /// Overwrite the media fields with what was found on the web page
    pub fn apply_extraction(&mut self, media: ExtractedMedia) {
        self.fields
            .insert("media_type".to_string(), Value::from(media.media_type.as_str()));
        self.fields.insert("url".to_string(), Value::from(media.url));
        self.fields.insert("extracted_from_page".to_string(), Value::Bool(true));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> MediaEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_media_type_wire_format() {
        assert_eq!(MediaType::Video.to_string(), "video");
        assert_eq!(MediaType::parse("image"), Some(MediaType::Image));
        assert_eq!(MediaType::parse("interactive"), None);
        assert_eq!(MediaType::parse("Image"), None);
    }

    #[test]
    fn test_needs_extraction() {
        assert!(entry(json!({"media_type": "other"})).needs_extraction());
        assert!(entry(json!({"media_type": "other", "url": "https://x/y.html"})).needs_extraction());
        assert!(entry(json!({"media_type": "video"})).needs_extraction());
        assert!(entry(json!({"media_type": "image", "url": null})).needs_extraction());
        assert!(entry(json!({"media_type": "video", "url": ""})).needs_extraction());
        assert!(entry(json!({"media_type": "interactive"})).needs_extraction());

        assert!(!entry(json!({"media_type": "image", "url": "https://x/y.jpg"})).needs_extraction());
        assert!(!entry(json!({"media_type": "video", "url": "https://youtube.com/embed/x"})).needs_extraction());
        assert!(!entry(json!({"media_type": "interactive", "url": "https://x/app.html"})).needs_extraction());
        assert!(!entry(json!({"media_type": "", "url": ""})).needs_extraction());
        assert!(!entry(json!({"title": "no media at all"})).needs_extraction());
    }

    #[test]
    fn test_apply_extraction() {
        let mut e = entry(json!({"date": "2024-07-04", "media_type": "other", "url": "https://x/page.html"}));
        e.apply_extraction(ExtractedMedia {
            media_type: MediaType::Video,
            url: "https://apod.nasa.gov/apod/image/2407/clip.mp4".to_string(),
        });

        assert_eq!(e.media_type(), Some(MediaType::Video));
        assert_eq!(e.url(), Some("https://apod.nasa.gov/apod/image/2407/clip.mp4"));
        assert!(e.extracted_from_page());
        assert_eq!(
            serde_json::to_value(&e).unwrap(),
            json!({
                "date": "2024-07-04",
                "media_type": "video",
                "url": "https://apod.nasa.gov/apod/image/2407/clip.mp4",
                "extracted_from_page": true
            })
        );
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let upstream = json!({
            "title": "Comet",
            "date": "2024-07-04",
            "explanation": "A comet.",
            "media_type": "image",
            "url": "https://apod.nasa.gov/apod/image/2407/comet.jpg",
            "service_version": "v1",
            "thumbnail_url": null
        });

        let e = entry(upstream.clone());
        assert_eq!(e.get("service_version"), Some(&json!("v1")));
        assert_eq!(serde_json::to_value(&e).unwrap(), upstream);
    }

    #[test]
    fn test_null_missing_and_unknown_values_are_not_rewritten() {
        let upstream = json!({
            "title": null,
            "date": "2024-07-04",
            "media_type": "interactive",
            "url": "https://apod.nasa.gov/apod/ap240704.html",
            "copyright": 42
        });

        let e = entry(upstream.clone());
        assert_eq!(e.title(), None);
        assert_eq!(e.raw_media_type(), Some("interactive"));
        assert_eq!(e.media_type(), None);
        assert!(!e.extracted_from_page());

        let out = serde_json::to_value(&e).unwrap();
        assert_eq!(out, upstream);
        assert!(out.get("explanation").is_none());
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(serde_json::from_value::<MediaEntry>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<MediaEntry>(json!("entry")).is_err());
    }
}
