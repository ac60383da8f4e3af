//! Media metadata returned by the third-party lookup service.
//!
//! Upstream payloads are loosely typed: any field may be missing, and
//! durations or sizes arrive either as numbers or as preformatted strings.
//! These types absorb that variance so callers only ever see `Option`s.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Description of a single media item and its downloadable formats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MediaInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,

    #[serde(default, alias = "picture", deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,

    /// Duration as reported upstream (seconds or `mm:ss`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub quality: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub size: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    /// Upstream's own name for the source platform, if any.
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,

    #[serde(default, alias = "links", alias = "medias", deserialize_with = "lenient_formats")]
    pub formats: Vec<MediaFormat>,
}

impl MediaInfo {
    /// Whether the payload carries anything worth showing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.thumbnail.is_none() && self.formats.is_empty()
    }
}

/// One downloadable rendition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MediaFormat {
    #[serde(alias = "link")]
    pub url: String,

    #[serde(default, alias = "label", deserialize_with = "lenient_string")]
    pub quality: Option<String>,

    #[serde(default, alias = "extension", deserialize_with = "lenient_string")]
    pub ext: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub size: Option<String>,
}

/// Strings, numbers and booleans become strings; null, empty strings and
/// composite values become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| scalar_to_string(&v)))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Keeps only entries with an http(s) `url`; everything else is dropped
/// rather than failing the whole payload.
fn lenient_formats<'de, D>(deserializer: D) -> Result<Vec<MediaFormat>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<MediaFormat>(item).ok())
        .filter(|f| f.url.starts_with("https://") || f.url.starts_with("http://"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_payload() {
        let info: MediaInfo = serde_json::from_value(json!({
            "title": "Cat video",
            "thumbnail": "https://i.ytimg.com/vi/x/hq.jpg",
            "duration": "3:21",
            "quality": "720p",
            "size": "12 MB",
            "formats": [
                {"url": "https://cdn.example.com/a.mp4", "quality": "720p", "ext": "mp4"},
                {"url": "https://cdn.example.com/a.m4a", "quality": "audio", "ext": "m4a"}
            ]
        }))
        .unwrap();

        assert_eq!(info.title.as_deref(), Some("Cat video"));
        assert_eq!(info.duration.as_deref(), Some("3:21"));
        assert_eq!(info.formats.len(), 2);
        assert_eq!(info.formats[1].ext.as_deref(), Some("m4a"));
        assert!(!info.is_empty());
    }

    #[test]
    fn test_missing_fields_are_none() {
        let info: MediaInfo = serde_json::from_value(json!({"title": "Only title"})).unwrap();
        assert_eq!(info.title.as_deref(), Some("Only title"));
        assert!(info.thumbnail.is_none());
        assert!(info.duration.is_none());
        assert!(info.formats.is_empty());

        let empty: MediaInfo = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_numeric_and_null_scalars() {
        let info: MediaInfo = serde_json::from_value(json!({
            "title": null,
            "duration": 201,
            "size": 1048576,
            "quality": "  ",
            "description": {"nested": true}
        }))
        .unwrap();

        assert!(info.title.is_none());
        assert_eq!(info.duration.as_deref(), Some("201"));
        assert_eq!(info.size.as_deref(), Some("1048576"));
        assert!(info.quality.is_none());
        assert!(info.description.is_none());
    }

    #[test]
    fn test_format_aliases_and_filtering() {
        let info: MediaInfo = serde_json::from_value(json!({
            "picture": "https://img.example.com/t.jpg",
            "links": [
                {"link": "https://cdn.example.com/hd.mp4", "label": "HD", "extension": "mp4"},
                {"link": "javascript:alert(1)", "label": "evil"},
                {"label": "no url"},
                "not an object"
            ]
        }))
        .unwrap();

        assert_eq!(info.thumbnail.as_deref(), Some("https://img.example.com/t.jpg"));
        assert_eq!(info.formats.len(), 1);
        assert_eq!(info.formats[0].url, "https://cdn.example.com/hd.mp4");
        assert_eq!(info.formats[0].quality.as_deref(), Some("HD"));
    }

    #[test]
    fn test_formats_not_an_array() {
        let info: MediaInfo =
            serde_json::from_value(json!({"title": "x", "formats": "none"})).unwrap();
        assert!(info.formats.is_empty());
    }
}
